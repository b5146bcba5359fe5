//! Mock session validator for tests.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_owner("owner-token", business_id);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, BusinessId, Role, UserId};
use crate::ports::SessionValidator;

/// Maps fixed tokens to users. Unknown tokens are `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), user);
        }
        self
    }

    /// Registers `token` for an owner of `business_id`.
    pub fn with_owner(self, token: impl Into<String>, business_id: BusinessId) -> Self {
        let token = token.into();
        let user = match UserId::new(format!("owner-{}", token)) {
            Ok(id) => AuthenticatedUser::new(id, business_id, Role::Owner),
            Err(_) => return self,
        };
        self.with_user(token, user)
    }

    /// Every validation fails with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        if let Ok(mut forced) = self.force_error.write() {
            *forced = Some(error);
        }
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().ok().and_then(|e| e.clone()) {
            return Err(error);
        }

        self.tokens
            .read()
            .ok()
            .and_then(|tokens| tokens.get(token).cloned())
            .ok_or(AuthError::InvalidToken)
    }
}
