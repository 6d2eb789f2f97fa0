//! Command implementations.

pub mod reports;
pub mod session;
pub mod stock;

use jfa_backend::ApiError;
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither a token nor an email/password pair was given.
    #[error("Set JFA_API_TOKEN, or JFA_API_EMAIL and JFA_API_PASSWORD")]
    MissingCredentials,

    /// The credentials belong to a non-admin account.
    #[error("Account {0} is not an administrator")]
    NotAdmin(String),

    /// `JFA_API_URL` is not a URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Output file could not be written.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Printable report failed to render.
    #[error("Failed to render report: {0}")]
    Render(String),
}
