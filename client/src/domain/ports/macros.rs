//! Error enums for the backend ports.
//!
//! Every endpoint family fails the same five ways, so the enums differ only
//! in the resource named by their messages. `define_backend_error!` stamps
//! out the enum, constructors taking `impl Into<String>` and the conversion
//! into the service [`Error`](crate::domain::Error).

macro_rules! define_backend_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident => $resource:tt
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// Backend answered with a non-success status.
            #[error("{} request rejected ({status}): {message}", $resource)]
            Rejected { status: u16, message: String },
            /// Backend refused the token or the credentials.
            #[error("{} request unauthorized: {message}", $resource)]
            Unauthorized { message: String },
            /// Network transport failed before a response arrived.
            #[error("{} transport failed: {message}", $resource)]
            Transport { message: String },
            #[error("{} request timed out: {message}", $resource)]
            Timeout { message: String },
            /// Response failed boundary validation.
            #[error("{} response decode failed: {message}", $resource)]
            Decode { message: String },
        }

        impl $name {
            pub fn rejected(status: u16, message: impl Into<String>) -> Self {
                Self::Rejected {
                    status,
                    message: message.into(),
                }
            }

            pub fn unauthorized(message: impl Into<String>) -> Self {
                Self::Unauthorized {
                    message: message.into(),
                }
            }

            pub fn transport(message: impl Into<String>) -> Self {
                Self::Transport {
                    message: message.into(),
                }
            }

            pub fn timeout(message: impl Into<String>) -> Self {
                Self::Timeout {
                    message: message.into(),
                }
            }

            pub fn decode(message: impl Into<String>) -> Self {
                Self::Decode {
                    message: message.into(),
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                match value {
                    $name::Rejected { status, message } => Self::rejected(status, message),
                    $name::Unauthorized { message } => Self::unauthorized(message),
                    $name::Transport { message } | $name::Timeout { message } => {
                        Self::service_unavailable(message)
                    }
                    $name::Decode { message } => Self::internal(message),
                }
            }
        }
    };
}

pub(crate) use define_backend_error;
