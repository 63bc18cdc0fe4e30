//! Driven port for token issuance.
//!
//! Login is the only place an [`AuthContext`] is created; the caller stores
//! it in its [`Session`](crate::domain::Session).

use async_trait::async_trait;

use super::define_backend_error;
use crate::domain::{AccessToken, AuthContext, LoginCredentials, User};

define_backend_error! {
    /// Errors surfaced by the login endpoint.
    pub enum AuthApiError => "login"
}

/// Port for exchanging credentials for a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthContext, AuthApiError>;
}

/// Fixture authenticator accepting one user with a fixed password.
#[derive(Debug, Clone)]
pub struct FixtureAuthApi {
    pub user: User,
    pub password: String,
}

#[async_trait]
impl AuthApi for FixtureAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthContext, AuthApiError> {
        let email_matches = credentials.email() == self.user.email().as_ref();
        if !email_matches || credentials.password() != self.password {
            return Err(AuthApiError::unauthorized("Credenciales inválidas"));
        }
        let token = AccessToken::new(format!("fixture-{}", self.user.id()))
            .ok_or_else(|| AuthApiError::decode("empty fixture token"))?;
        Ok(AuthContext::new(token, self.user.clone()))
    }
}
