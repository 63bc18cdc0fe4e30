//! Transient user-facing messages ("toasts").

use std::fmt;

use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn from_error(error: &Error) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: error.user_message().to_owned(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl From<&Error> for Notification {
    fn from(value: &Error) -> Self {
        Self::from_error(value)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NotificationKind::Success => f.write_str(&self.message),
            NotificationKind::Error => write!(f, "Error: {}", self.message),
        }
    }
}
