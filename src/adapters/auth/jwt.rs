//! HS256 JWT validation for dashboard tokens.
//!
//! Tokens are issued by the account service with a shared secret. Required
//! claims: `sub`, `business_id`, `role`, `iss`, `exp`.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, Timestamp, UserId};
use crate::ports::SessionValidator;

/// Claims carried by a dashboard token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardClaims {
    pub sub: String,
    #[serde(default)]
    pub business_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Validates dashboard tokens signed with the configured shared secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    issuer: String,
    leeway_secs: u64,
}

impl JwtSessionValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            leeway_secs: config.leeway_secs,
        }
    }

    /// Signs a token for `user`, valid for `ttl_secs`.
    pub fn issue(&self, user: &AuthenticatedUser, ttl_secs: u64) -> Result<String, AuthError> {
        let now = Timestamp::now().as_unix_secs();
        let claims = DashboardClaims {
            sub: user.id.to_string(),
            business_id: Some(user.business_id.to_string()),
            role: Some(role_claim(user.role).to_string()),
            iss: self.issuer.clone(),
            exp: now + ttl_secs,
            iat: Some(now),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ServiceUnavailable(format!("token signing failed: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<DashboardClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway_secs;

        decode::<DashboardClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })
    }
}

fn role_claim(role: Role) -> &'static str {
    match role {
        Role::Owner => "owner",
        Role::Staff => "staff",
        Role::SuperAdmin => "super_admin",
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        let id = UserId::new(claims.sub).map_err(|_| AuthError::MissingClaim("sub"))?;
        let business_id = claims
            .business_id
            .as_deref()
            .ok_or(AuthError::MissingClaim("business_id"))?
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;
        let role = claims
            .role
            .as_deref()
            .ok_or(AuthError::MissingClaim("role"))
            .and_then(|r| Role::parse(r).ok_or(AuthError::InvalidToken))?;

        Ok(AuthenticatedUser::new(id, business_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::BusinessId;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(&AuthConfig::new(SECRET))
    }

    fn owner() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap(), BusinessId::new(), Role::Owner)
    }

    fn sign(claims: &DashboardClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset: i64) -> DashboardClaims {
        let now = Timestamp::now().as_unix_secs() as i64;
        DashboardClaims {
            sub: "user-1".to_string(),
            business_id: Some(BusinessId::new().to_string()),
            role: Some("staff".to_string()),
            iss: "hospitality-bot".to_string(),
            exp: (now + exp_offset) as u64,
            iat: None,
        }
    }

    #[tokio::test]
    async fn issued_token_roundtrips() {
        let validator = validator();
        let user = owner();
        let token = validator.issue(&user, 3600).unwrap();

        let validated = validator.validate(&token).await.unwrap();
        assert_eq!(validated, user);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = sign(&claims(-3600), SECRET);
        assert_eq!(validator().validate(&token).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let token = sign(&claims(3600), "another-secret-that-is-also-long-enough");
        assert_eq!(validator().validate(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let mut c = claims(3600);
        c.iss = "someone-else".to_string();
        assert_eq!(
            validator().validate(&sign(&c, SECRET)).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn missing_business_claim_is_reported() {
        let mut c = claims(3600);
        c.business_id = None;
        assert_eq!(
            validator().validate(&sign(&c, SECRET)).await,
            Err(AuthError::MissingClaim("business_id"))
        );
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            validator().validate("not.a.token").await,
            Err(AuthError::InvalidToken)
        );
    }
}
