//! Dashboard authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// HS256 JWT settings for dashboard tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret
    pub jwt_secret: Secret<String>,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Clock skew tolerated on `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Secret::new(jwt_secret.into()),
            issuer: default_issuer(),
            leeway_secs: default_leeway(),
        }
    }

    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 characters.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "hospitality-bot".to_string()
}

fn default_leeway() -> u64 {
    30
}
