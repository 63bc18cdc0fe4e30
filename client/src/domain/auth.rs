//! Authentication primitives and the session lifecycle.
//!
//! The session is an explicit value handed to the access gate and every
//! caller that needs the current identity. It is set once on login, cleared
//! on logout, and read-only in between.

use std::fmt;

use zeroize::Zeroizing;

use super::{Role, User};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials sent to the authentication endpoint.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use doctrack::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ana@example.gob.mx", "secret").unwrap();
/// assert_eq!(creds.email(), "ana@example.gob.mx");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Bearer token issued at login. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token; blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(token)))
        }
    }

    /// Raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    token: AccessToken,
    user: User,
}

impl AuthContext {
    pub fn new(token: AccessToken, user: User) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role()
    }
}

/// Browser-session scoped identity holder.
///
/// # Examples
/// ```
/// use doctrack::domain::{Role, Session};
///
/// let session = Session::anonymous();
/// assert!(!session.is_authenticated());
/// assert_eq!(session.effective_role(), Role::Usuario);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    context: Option<AuthContext>,
}

impl Session {
    /// A session with no signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Store the context produced by login, replacing any previous one.
    pub fn sign_in(&mut self, context: AuthContext) {
        self.context = Some(context);
    }

    /// Clear the session. Returns `true` when a context was present.
    pub fn sign_out(&mut self) -> bool {
        self.context.take().is_some()
    }

    pub fn context(&self) -> Option<&AuthContext> {
        self.context.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.context.is_some()
    }

    /// Role used for gating; signed-out sessions get [`Role::Usuario`].
    pub fn effective_role(&self) -> Role {
        self.context.as_ref().map_or(Role::Usuario, AuthContext::role)
    }
}
