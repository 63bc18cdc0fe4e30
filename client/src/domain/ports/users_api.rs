//! Driven port for account administration.

use async_trait::async_trait;

use super::define_backend_error;
use crate::domain::user::{User, UserDraft, UserId, UserPatch};

define_backend_error! {
    /// Errors surfaced by the users endpoints.
    pub enum UsersApiError => "users"
}

/// Port behind the user settings screen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, UsersApiError>;

    async fn create(&self, draft: &UserDraft) -> Result<(), UsersApiError>;

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<(), UsersApiError>;

    /// Remove the account. The backend decides between soft and hard delete.
    async fn delete(&self, id: UserId) -> Result<(), UsersApiError>;

    /// Ask the backend to pull accounts from the directory server.
    async fn sync_directory(&self) -> Result<(), UsersApiError>;
}

/// Fixture serving a fixed account list.
#[derive(Debug, Clone, Default)]
pub struct FixtureUsersApi {
    pub users: Vec<User>,
}

impl FixtureUsersApi {
    fn require(&self, id: UserId) -> Result<(), UsersApiError> {
        if self.users.iter().any(|user| user.id() == id) {
            Ok(())
        } else {
            Err(UsersApiError::rejected(404, format!("Usuario {id} no encontrado")))
        }
    }
}

#[async_trait]
impl UsersApi for FixtureUsersApi {
    async fn list(&self) -> Result<Vec<User>, UsersApiError> {
        Ok(self.users.clone())
    }

    async fn create(&self, draft: &UserDraft) -> Result<(), UsersApiError> {
        if self.users.iter().any(|user| user.email() == &draft.email) {
            return Err(UsersApiError::rejected(409, "El correo ya está registrado"));
        }
        Ok(())
    }

    async fn update(&self, id: UserId, _patch: &UserPatch) -> Result<(), UsersApiError> {
        self.require(id)
    }

    async fn delete(&self, id: UserId) -> Result<(), UsersApiError> {
        self.require(id)
    }

    async fn sync_directory(&self) -> Result<(), UsersApiError> {
        Ok(())
    }
}
