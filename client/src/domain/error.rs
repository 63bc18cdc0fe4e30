//! Error returned by client services.
//!
//! Every failure the shell shows has the same shape: a code that decides how
//! it is rendered, the message, and the per-field messages of a rejected
//! form. Port errors convert into it through
//! [`define_backend_error!`](super::ports); local validation builds it
//! directly.

use std::collections::BTreeMap;

/// Shown instead of the raw message when the backend could not be reached.
pub const CONNECTION_MESSAGE: &str = "Error de conexión con el servidor.";

const FALLBACK_MESSAGE: &str = "Ocurrió un error inesperado.";

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Input failed local validation or the backend rejected it as invalid.
    InvalidRequest,
    /// No session, or the backend refused the session token.
    Unauthorized,
    /// The session role may not perform the action.
    Forbidden,
    NotFound,
    /// The document state no longer allows the action.
    Conflict,
    /// The backend could not be reached.
    ServiceUnavailable,
    /// The backend failed, or answered with something the client cannot read.
    InternalError,
}

impl ErrorCode {
    /// Category of a backend rejection with HTTP `status`.
    ///
    /// # Examples
    /// ```
    /// use doctrack::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::from_status(409), ErrorCode::Conflict);
    /// assert_eq!(ErrorCode::from_status(422), ErrorCode::InvalidRequest);
    /// assert_eq!(ErrorCode::from_status(502), ErrorCode::InternalError);
    /// ```
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            400..=499 => Self::InvalidRequest,
            _ => Self::InternalError,
        }
    }

    /// No response arrived; the raw message is transport noise.
    pub fn is_connection_failure(self) -> bool {
        self == Self::ServiceUnavailable
    }
}

/// Service error.
///
/// The message is never blank: an empty backend message is replaced by a
/// generic one so the user always sees something.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    fields: BTreeMap<String, String>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            fields: BTreeMap::new(),
        }
    }

    /// Backend rejection with HTTP `status`; the message is kept verbatim.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::from_status(status), message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Raw message, suitable for logs.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message to show the user.
    ///
    /// # Examples
    /// ```
    /// use doctrack::domain::{CONNECTION_MESSAGE, Error};
    ///
    /// assert_eq!(Error::conflict("Ya fue atendido").user_message(), "Ya fue atendido");
    /// assert_eq!(
    ///     Error::service_unavailable("connection refused").user_message(),
    ///     CONNECTION_MESSAGE
    /// );
    /// ```
    pub fn user_message(&self) -> &str {
        if self.code.is_connection_failure() {
            CONNECTION_MESSAGE
        } else {
            &self.message
        }
    }

    /// Attach the message for one form field. A later message for the same
    /// field replaces the earlier one.
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.insert(field.into(), message.into());
        self
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field messages ordered by field name.
    pub fn field_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, ErrorCode::InvalidRequest)]
    #[case(401, ErrorCode::Unauthorized)]
    #[case(403, ErrorCode::Forbidden)]
    #[case(404, ErrorCode::NotFound)]
    #[case(409, ErrorCode::Conflict)]
    #[case(413, ErrorCode::InvalidRequest)]
    #[case(500, ErrorCode::InternalError)]
    #[case(503, ErrorCode::InternalError)]
    fn statuses_map_to_codes(#[case] status: u16, #[case] expected: ErrorCode) {
        assert_eq!(Error::rejected(status, "x").code(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_messages_are_replaced(#[case] message: &str) {
        let err = Error::conflict(message);
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), FALLBACK_MESSAGE);
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[rstest]
    fn backend_messages_are_shown_verbatim() {
        let err = Error::rejected(500, "Error interno: folio duplicado");
        assert_eq!(err.user_message(), "Error interno: folio duplicado");
    }

    #[rstest]
    fn connection_failures_hide_transport_detail() {
        let err = Error::service_unavailable("tcp connect error: 111");
        assert_eq!(err.user_message(), CONNECTION_MESSAGE);
        assert_eq!(err.message(), "tcp connect error: 111");
    }

    #[rstest]
    fn field_messages_are_keyed_and_replaceable() {
        let err = Error::invalid_request("Formulario incompleto")
            .with_field("folio", "muy corto")
            .with_field("attachment", "obligatorio")
            .with_field("folio", "obligatorio");
        assert_eq!(err.field_error("folio"), Some("obligatorio"));
        assert_eq!(err.field_error("description"), None);
        let fields: Vec<&str> = err.field_errors().map(|(field, _)| field).collect();
        assert_eq!(fields, ["attachment", "folio"]);
    }
}
