pub mod auth;
mod error;
mod page;
mod secret_string;
mod session;
pub mod user;
pub mod validation;

pub use error::{Error, Result};
pub use page::{Page, USERS_PER_PAGE};
pub use session::{Session, decode_session, encode_session};

#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;

/// Build an [`Error`] from a format string, like `anyhow!`.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}
