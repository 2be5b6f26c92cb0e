//! Authentication seam
//!
//! A session signs in with a custom token when one is supplied and falls
//! back to an anonymous identity if that fails.

use crate::error::AuthError;
use async_trait::async_trait;
use mq_progress::UserId;
use std::collections::HashMap;
use tracing::{info, warn};
use ulid::Ulid;

/// Identity provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange a custom token for an identity
    async fn sign_in_with_token(&self, token: &str) -> Result<UserId, AuthError>;

    /// Create a fresh anonymous identity
    async fn sign_in_anonymously(&self) -> Result<UserId, AuthError>;
}

/// Token first, then anonymous
pub async fn sign_in(auth: &dyn AuthProvider, token: Option<&str>) -> Result<UserId, AuthError> {
    if let Some(token) = token {
        match auth.sign_in_with_token(token).await {
            Ok(user) => {
                info!(%user, "signed in with token");
                return Ok(user);
            }
            Err(err) => warn!(error = %err, "token sign-in failed, falling back to anonymous"),
        }
    }
    let user = auth.sign_in_anonymously().await?;
    info!(%user, "signed in anonymously");
    Ok(user)
}

/// Provider backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct LocalAuth {
    tokens: HashMap<String, UserId>,
    allow_anonymous: bool,
}

impl LocalAuth {
    /// Provider that accepts anonymous sign-in
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            allow_anonymous: true,
        }
    }

    /// Accept `token` as `user`
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, user: UserId) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Refuse anonymous sign-in
    #[must_use]
    pub fn without_anonymous(mut self) -> Self {
        self.allow_anonymous = false;
        self
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn sign_in_with_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::Rejected("unknown token".into()))
    }

    async fn sign_in_anonymously(&self) -> Result<UserId, AuthError> {
        if !self.allow_anonymous {
            return Err(AuthError::Rejected("anonymous sign-in disabled".into()));
        }
        Ok(UserId::new(format!("anon-{}", Ulid::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_wins() {
        let auth = LocalAuth::new().with_token("t1", UserId::new("alice"));
        assert_eq!(sign_in(&auth, Some("t1")).await.unwrap(), UserId::new("alice"));
    }

    #[tokio::test]
    async fn bad_token_falls_back_to_anonymous() {
        let auth = LocalAuth::new();
        let user = sign_in(&auth, Some("nope")).await.unwrap();
        assert!(user.0.starts_with("anon-"));
    }

    #[tokio::test]
    async fn both_failing_reports_the_anonymous_error() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in_with_token()
            .returning(|_| Err(AuthError::Unavailable("offline".into())));
        auth.expect_sign_in_anonymously()
            .times(1)
            .returning(|| Err(AuthError::Unavailable("offline".into())));
        let err = sign_in(&auth, Some("t")).await.unwrap_err();
        assert_eq!(err, AuthError::Unavailable("offline".into()));
    }

    #[tokio::test]
    async fn no_token_skips_token_sign_in() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in_with_token().never();
        auth.expect_sign_in_anonymously()
            .returning(|| Ok(UserId::new("anon-1")));
        assert_eq!(sign_in(&auth, None).await.unwrap(), UserId::new("anon-1"));
    }
}
