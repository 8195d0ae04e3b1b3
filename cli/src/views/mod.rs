use client::ClientError;

mod profile;
pub use profile::profile;

mod users;
pub use users::{user, users_table};

/// How a failed command is reported on stderr.
pub fn error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ClientError>() {
        Some(ClientError::NotSignedIn) => "Not signed in. Run `admin login` first.".to_string(),
        Some(error @ (ClientError::RefreshFailed(_) | ClientError::SessionExpired)) => {
            format!("{error}\nYour session has ended. Sign in again with `admin login`.")
        }
        Some(ClientError::Validation(errors)) => {
            let mut out = String::from("Invalid input:");
            for field in errors.iter() {
                out.push_str(&format!("\n  {}: {}", field.field, field.message));
            }
            out
        }
        _ => format!("Error: {error:#}"),
    }
}
