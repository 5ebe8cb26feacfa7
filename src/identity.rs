//! The third-party identity provider, modelled as an injected capability:
//! "authenticate a user, return their identity". Handlers never talk OAuth
//! directly, and tests swap in a stub.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Managed-state handle to whichever provider implementation is configured.
pub type Provider = Box<dyn IdentityProvider>;

/// A verified identity returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider rejected the authorization code")]
    Rejected,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Capability to exchange an authorization code for a verified identity.
#[rocket::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError>;
}

/// OAuth2 authorization-code client for the real provider.
pub struct OauthIdentityProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    userinfo_url: String,
}

impl OauthIdentityProvider {
    pub fn new(
        client_id: String,
        client_secret: String,
        token_url: String,
        userinfo_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            token_url,
            userinfo_url,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[rocket::async_trait]
impl IdentityProvider for OauthIdentityProvider {
    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IdentityError::Rejected);
        }
        let token: TokenResponse = response.json().await?;
        debug!("Exchanged authorization code, fetching user info");

        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IdentityError::Rejected);
        }
        Ok(response.json().await?)
    }
}

/// Provider used by local tests: accepts any non-empty code and derives the
/// identity from it.
#[cfg(test)]
pub struct StubIdentityProvider;

#[cfg(test)]
#[rocket::async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError> {
        if code.is_empty() {
            return Err(IdentityError::Rejected);
        }
        Ok(UserProfile {
            name: format!("Test User {code}"),
            email: format!("{code}@example.com"),
        })
    }
}
