use types::user::{CreateUser, USERS_PATH, UpdateUser, User, UserId};

use crate::http::{ApiRequest, AuthenticatedClient, Result};

impl AuthenticatedClient {
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.send_json(ApiRequest::get(USERS_PATH)).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.send_json(ApiRequest::get(id.path())).await
    }

    pub async fn create_user(&self, input: &CreateUser) -> Result<User> {
        input.validate()?;
        self.send_json(ApiRequest::post(USERS_PATH).json(input)?)
            .await
    }

    pub async fn update_user(&self, id: UserId, input: &UpdateUser) -> Result<User> {
        input.validate()?;
        self.send_json(ApiRequest::put(id.path()).json(input)?)
            .await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        // The API answers with a bare `true`; only the status matters.
        self.send(ApiRequest::delete(id.path())).await?;
        Ok(())
    }
}
