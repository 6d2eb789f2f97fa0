//! API connection for commands.
//!
//! A token from the environment is used as is. Otherwise the command logs in
//! with the admin credentials; the token lives only for this process.

use jfa_backend::{Api, ApiClient, ApiConfig, BearerToken};
use secrecy::SecretString;
use url::Url;

use super::CliError;
use crate::Connection;

/// An authenticated API client.
pub struct Session {
    client: ApiClient,
    token: BearerToken,
}

impl Session {
    /// API handle carrying the session token.
    #[must_use]
    pub fn api(&self) -> Api<'_> {
        self.client.with_token(Some(&self.token))
    }
}

/// Build the client and obtain a token.
///
/// # Errors
///
/// Returns an error when no credentials are configured, the login is
/// rejected, or the account is not an administrator.
pub async fn connect(connection: &Connection) -> Result<Session, CliError> {
    let config = ApiConfig {
        base_url: Url::parse(&connection.api_url)?,
        ..ApiConfig::default()
    };
    let client = ApiClient::new(&config)?;

    if let Some(token) = connection.token.as_deref().filter(|t| !t.trim().is_empty()) {
        tracing::debug!("Using token from environment");
        return Ok(Session {
            token: BearerToken::new(token.trim()),
            client,
        });
    }

    let (Some(email), Some(password)) = (&connection.email, &connection.password) else {
        return Err(CliError::MissingCredentials);
    };

    let password = SecretString::from(password.clone());
    let login = client.anonymous().login(email.trim(), &password).await?;
    if !login.user.role.is_admin() {
        return Err(CliError::NotAdmin(login.user.email));
    }

    tracing::info!(user_id = %login.user.id, "Logged in");
    Ok(Session {
        token: login.token,
        client,
    })
}
