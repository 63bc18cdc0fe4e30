//! User data model as returned by the login and `/users` endpoints, plus
//! the payloads the admin screens send back.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use zeroize::Zeroizing;

use super::{DepartmentId, Role};

/// Validation errors returned while building a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    InvalidDepartment,
    InvalidStatus { input: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::InvalidDepartment => write!(f, "department id must be a valid UUID"),
            Self::InvalidStatus { input } => {
                write!(f, "user status must be active or inactive, got {input}")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Backend user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Authenticated application user.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `role` is always one of the closed [`Role`] variants; payloads with a
///   missing or unknown role resolve to [`Role::Usuario`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: String,
    email: Email,
    role: Role,
    department_id: Option<DepartmentId>,
    status: UserStatus,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, name: impl Into<String>, email: Email, role: Role) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.trim().to_owned(),
            email,
            role,
            department_id: None,
            status: UserStatus::Active,
        })
    }

    /// Attach the user's home department.
    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Override the account status.
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: u64,
    name: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    department_id: Option<String>,
    /// List responses embed the unit instead of its id.
    #[serde(default, skip_serializing)]
    department: Option<NestedDepartment>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NestedDepartment {
    Unit { id: String },
    Name(String),
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            email,
            role,
            department_id,
            status,
        } = value;
        Self {
            id: id.get(),
            name,
            email: email.into(),
            role: Some(role.as_str().to_owned()),
            department_id: department_id.map(String::from),
            department: None,
            status: Some(status.as_str().to_owned()),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let role = Role::from_claim(value.role.as_deref());
        let email = Email::new(value.email)?;
        let mut user = User::new(UserId::new(value.id), value.name, email, role)?;

        let nested = match value.department {
            Some(NestedDepartment::Unit { id }) => Some(id),
            Some(NestedDepartment::Name(_)) | None => None,
        };
        let department_id = value.department_id.or(nested);
        if let Some(raw) = department_id.filter(|raw| !raw.trim().is_empty()) {
            let department =
                DepartmentId::new(raw).map_err(|_| UserValidationError::InvalidDepartment)?;
            user = user.with_department(department);
        }

        let status = match value.status.as_deref() {
            None | Some("active") => UserStatus::Active,
            Some("inactive") => UserStatus::Inactive,
            Some(other) => {
                return Err(UserValidationError::InvalidStatus {
                    input: other.to_owned(),
                });
            }
        };
        Ok(user.with_status(status))
    }
}

/// Account payload for `POST /users`.
///
/// Accounts imported from the directory carry no password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
    pub status: UserStatus,
    password: Option<Password>,
}

/// Password typed into an admin form. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
struct Password(Zeroizing<String>);

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

fn non_blank_password(password: &str) -> Option<Password> {
    (!password.is_empty()).then(|| Password(Zeroizing::new(password.to_owned())))
}

impl UserDraft {
    /// Active account with the least-privileged role.
    pub fn new(name: &str, email: &str) -> Result<Self, UserValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            email: Email::new(email)?,
            role: Role::Usuario,
            department_id: None,
            status: UserStatus::Active,
            password: None,
        })
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Set a local password. An empty string leaves the account without one.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = non_blank_password(password);
        self
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|password| password.0.as_str())
    }
}

/// Partial update for `PATCH /users/{id}`. Unset fields are left alone; an
/// empty password field means "keep the current password".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub role: Option<Role>,
    pub department_id: Option<DepartmentId>,
    pub status: Option<UserStatus>,
    password: Option<Password>,
}

impl UserPatch {
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = non_blank_password(password);
        self
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|password| password.0.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.department_id.is_none()
            && self.status.is_none()
            && self.password.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Boundary parsing coverage for user payloads.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn parses_login_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "name": "Ana Torres",
            "email": "ana@example.gob.mx",
            "role": "Gestor",
            "department_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "status": "active"
        }))
        .expect("payload should parse");

        assert_eq!(user.id(), UserId::new(7));
        assert_eq!(user.role(), Role::Gestor);
        assert!(user.department_id().is_some());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("Superuser"))]
    fn missing_or_unknown_role_is_least_privileged(#[case] role: serde_json::Value) {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "Luis",
            "email": "luis@example.gob.mx",
            "role": role
        }))
        .expect("payload should parse");
        assert_eq!(user.role(), Role::Usuario);
    }

    #[rstest]
    #[case("")]
    #[case("not-an-email")]
    fn rejects_invalid_email(#[case] email: &str) {
        let result: Result<User, _> = serde_json::from_value(json!({
            "id": 1,
            "name": "Luis",
            "email": email,
        }));
        assert!(result.is_err());
    }

    #[rstest]
    fn rejects_blank_name() {
        let email = Email::new("a@b.mx").expect("valid email");
        let err = User::new(UserId::new(1), "   ", email, Role::Admin).expect_err("blank name");
        assert_eq!(err, UserValidationError::EmptyName);
    }

    #[rstest]
    fn round_trips_through_dto() {
        let email = Email::new("a@b.mx").expect("valid email");
        let user = User::new(UserId::new(3), "Eva", email, Role::Auditor)
            .expect("valid user")
            .with_status(UserStatus::Inactive);
        let value = serde_json::to_value(&user).expect("serialise");
        assert_eq!(value["role"], "Auditor");
        assert_eq!(value["status"], "inactive");
        let back: User = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, user);
    }

    #[rstest]
    #[case::embedded(json!({"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "name": "Crédito"}), true)]
    #[case::display_name(json!("Crédito"), false)]
    fn list_rows_may_embed_the_department(
        #[case] department: serde_json::Value,
        #[case] has_id: bool,
    ) {
        let user: User = serde_json::from_value(json!({
            "id": 4,
            "name": "Rosa",
            "email": "rosa@example.gob.mx",
            "department": department,
            "last_login": "2025-03-01T10:00:00Z"
        }))
        .expect("list row parses");
        assert_eq!(user.department_id().is_some(), has_id);
    }

    #[rstest]
    fn drafts_default_to_active_usuario_without_password() {
        let draft = UserDraft::new(" Rosa ", "rosa@example.gob.mx")
            .expect("valid")
            .with_password("");
        assert_eq!(draft.name, "Rosa");
        assert_eq!(draft.role, Role::Usuario);
        assert_eq!(draft.status, UserStatus::Active);
        assert_eq!(draft.password(), None);
        assert_eq!(
            UserDraft::new("Rosa", "rosa"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    fn blank_password_keeps_the_patch_empty() {
        assert!(UserPatch::default().with_password("").is_empty());
        let patch = UserPatch::default().with_password("n3wP4ss");
        assert!(!patch.is_empty());
        assert_eq!(patch.password(), Some("n3wP4ss"));
        assert!(!format!("{patch:?}").contains("n3wP4ss"));
    }
}
