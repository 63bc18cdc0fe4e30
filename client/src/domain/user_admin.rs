//! Account administration behind `/dashboard/settings/users`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{UsersApi, UsersApiError};
use crate::domain::user::{User, UserDraft, UserId, UserPatch, UserStatus, UserValidationError};
use crate::domain::{Action, Capabilities, Error, Module, Session};

fn backend_failure(operation: &'static str, error: UsersApiError) -> Error {
    warn!(operation, %error, "users request failed");
    error.into()
}

/// Map a form validation failure onto the field it belongs to.
pub fn user_field_error(error: UserValidationError) -> Error {
    let field = match &error {
        UserValidationError::EmptyName => "name",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
        UserValidationError::InvalidDepartment => "department_id",
        UserValidationError::InvalidStatus { .. } => "status",
    };
    Error::invalid_request(error.to_string()).with_field(field, error.to_string())
}

/// User CRUD guarded by the `users` capabilities.
#[derive(Clone)]
pub struct UserAdminService<U> {
    api: Arc<U>,
    capabilities: Arc<Capabilities>,
}

impl<U> UserAdminService<U> {
    pub fn new(api: Arc<U>, capabilities: Arc<Capabilities>) -> Self {
        Self { api, capabilities }
    }
}

impl<U: UsersApi> UserAdminService<U> {
    pub async fn list(&self, session: &Session) -> Result<Vec<User>, Error> {
        self.capabilities.authorize(session, Module::Users, Action::Read)?;
        self.api
            .list()
            .await
            .map_err(|error| backend_failure("list", error))
    }

    pub async fn create(&self, session: &Session, draft: &UserDraft) -> Result<(), Error> {
        self.capabilities
            .authorize(session, Module::Users, Action::Create)?;
        self.api
            .create(draft)
            .await
            .map_err(|error| backend_failure("create", error))?;
        info!(role = %draft.role, "user created");
        Ok(())
    }

    /// Returns `false` without calling the backend for an empty patch.
    pub async fn update(&self, session: &Session, id: UserId, patch: &UserPatch) -> Result<bool, Error> {
        self.capabilities
            .authorize(session, Module::Users, Action::Update)?;
        if patch.is_empty() {
            return Ok(false);
        }
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(user_field_error(UserValidationError::EmptyName));
        }
        self.api
            .update(id, patch)
            .await
            .map_err(|error| backend_failure("update", error))?;
        info!(user_id = %id, "user updated");
        Ok(true)
    }

    /// Enable or disable an account without touching anything else.
    pub async fn set_status(&self, session: &Session, id: UserId, status: UserStatus) -> Result<(), Error> {
        let mut patch = UserPatch::default();
        patch.status = Some(status);
        self.update(session, id, &patch).await?;
        Ok(())
    }

    /// Delete an account. Signed-in users cannot delete themselves.
    pub async fn delete(&self, session: &Session, id: UserId) -> Result<(), Error> {
        self.capabilities
            .authorize(session, Module::Users, Action::Delete)?;
        if session.context().is_some_and(|context| context.user().id() == id) {
            return Err(Error::conflict("No puede eliminar su propia cuenta."));
        }
        self.api
            .delete(id)
            .await
            .map_err(|error| backend_failure("delete", error))?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Trigger a directory import on the backend.
    pub async fn sync_directory(&self, session: &Session) -> Result<(), Error> {
        self.capabilities
            .authorize(session, Module::Users, Action::Create)?;
        self.api
            .sync_directory()
            .await
            .map_err(|error| backend_failure("sync", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUsersApi;
    use crate::domain::{ErrorCode, Role};
    use crate::test_support::{fixture_department_id, session_with_role, user_with_role};
    use rstest::rstest;

    fn make_service(api: MockUsersApi) -> UserAdminService<MockUsersApi> {
        UserAdminService::new(Arc::new(api), Arc::new(Capabilities::standard()))
    }

    #[rstest]
    #[case::admin(Role::Admin)]
    #[case::gestor(Role::Gestor)]
    #[case::auditor(Role::Auditor)]
    #[tokio::test]
    async fn listing_needs_the_read_grant(#[case] role: Role) {
        let mut api = MockUsersApi::new();
        api.expect_list()
            .times(1)
            .return_once(|| Ok(vec![user_with_role(Role::Gestor)]));
        let users = make_service(api)
            .list(&session_with_role(role))
            .await
            .expect("listed");
        assert_eq!(users.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn usuarios_cannot_list_accounts() {
        let mut api = MockUsersApi::new();
        api.expect_list().never();
        let error = make_service(api)
            .list(&session_with_role(Role::Usuario))
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admins_create_accounts() {
        let draft = UserDraft::new("Rosa Díaz", "rosa@example.gob.mx")
            .expect("valid")
            .with_role(Role::Gestor)
            .with_department(fixture_department_id())
            .with_password("Temporal123");
        let expected = draft.clone();
        let mut api = MockUsersApi::new();
        api.expect_create()
            .withf(move |sent| *sent == expected)
            .times(1)
            .return_once(|_| Ok(()));
        make_service(api)
            .create(&session_with_role(Role::Admin), &draft)
            .await
            .expect("created");
    }

    #[rstest]
    #[tokio::test]
    async fn gestores_cannot_create_accounts() {
        let mut api = MockUsersApi::new();
        api.expect_create().never();
        api.expect_sync_directory().never();
        let service = make_service(api);
        let session = session_with_role(Role::Gestor);
        let draft = UserDraft::new("Rosa", "rosa@example.gob.mx").expect("valid");

        let create = service.create(&session, &draft).await.expect_err("forbidden");
        assert_eq!(create.code(), ErrorCode::Forbidden);
        let sync = service.sync_directory(&session).await.expect_err("forbidden");
        assert_eq!(sync.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patches_are_not_sent() {
        let mut api = MockUsersApi::new();
        api.expect_update().never();
        let sent = make_service(api)
            .update(
                &session_with_role(Role::Admin),
                UserId::new(4),
                &UserPatch::default().with_password(""),
            )
            .await
            .expect("no-op");
        assert!(!sent);
    }

    #[rstest]
    #[tokio::test]
    async fn disabling_sends_only_the_status() {
        let mut api = MockUsersApi::new();
        api.expect_update()
            .withf(|id, patch| {
                *id == UserId::new(4)
                    && patch.status == Some(UserStatus::Inactive)
                    && patch.name.is_none()
                    && patch.password().is_none()
            })
            .times(1)
            .return_once(|_, _| Ok(()));
        make_service(api)
            .set_status(&session_with_role(Role::Admin), UserId::new(4), UserStatus::Inactive)
            .await
            .expect("disabled");
    }

    #[rstest]
    #[tokio::test]
    async fn blank_renames_are_field_errors() {
        let mut api = MockUsersApi::new();
        api.expect_update().never();
        let mut patch = UserPatch::default();
        patch.name = Some(" ".to_owned());
        let error = make_service(api)
            .update(&session_with_role(Role::Admin), UserId::new(4), &patch)
            .await
            .expect_err("blank");
        assert!(error.field_error("name").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn admins_cannot_delete_themselves() {
        let mut api = MockUsersApi::new();
        api.expect_delete().never();
        let session = session_with_role(Role::Admin);
        let own_id = user_with_role(Role::Admin).id();
        let error = make_service(api)
            .delete(&session, own_id)
            .await
            .expect_err("self delete");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_failures_are_mapped() {
        let mut api = MockUsersApi::new();
        api.expect_delete()
            .return_once(|_| Err(UsersApiError::rejected(404, "Usuario no encontrado")));
        let error = make_service(api)
            .delete(&session_with_role(Role::Admin), UserId::new(40))
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn validation_errors_point_at_their_field() {
        let error = user_field_error(UserValidationError::InvalidEmail);
        assert!(error.field_error("email").is_some());
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
