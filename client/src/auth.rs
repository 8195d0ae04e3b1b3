use tracing::{info, warn};
use types::auth::{Credentials, LOGIN_PATH, PROFILE_PATH, Profile, TokenPair, TokenResponse};

use crate::http::{ApiRequest, AuthenticatedClient, ResponseExt, Result};

impl AuthenticatedClient {
    /// Exchange credentials for a token pair, then load the matching profile.
    pub async fn login(&self, credentials: &Credentials) -> Result<Profile> {
        credentials.validate()?;

        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?;
        let tokens: TokenPair = self
            .send_unauthenticated(&request)
            .await?
            .try_json::<TokenResponse>()
            .await?
            .into();
        self.session().set_tokens(tokens).await?;

        match self.profile().await {
            Ok(profile) => {
                info!(user_id = %profile.id, "signed in");
                Ok(profile)
            }
            Err(error) => {
                warn!(%error, "could not load profile after login");
                self.session().clear().await?;
                Err(error)
            }
        }
    }

    /// Fetch the signed-in profile and remember it in the session.
    pub async fn profile(&self) -> Result<Profile> {
        let profile: Profile = self.send_json(ApiRequest::get(PROFILE_PATH)).await?;
        self.session().set_user(profile.clone()).await?;
        Ok(profile)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session().clear().await?;
        info!("signed out");
        Ok(())
    }
}
