//! The narrow interface the rest of the app sees of an identity provider

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::UserProfile;

/// Bearer token; `Debug` never prints the secret
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the consent flow and return an access token
    async fn request_token(&self) -> Result<AccessToken>;

    /// Look up the signed-in user's basic profile
    async fn fetch_profile(&self, token: &AccessToken) -> Result<UserProfile>;

    /// Ask the provider to forget the grant
    async fn revoke(&self, token: &AccessToken) -> Result<()>;
}
