//! Document status enumeration and the lifecycle transitions between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authoritative document status.
///
/// `ATENDIDO`, `RECHAZADO` and `CANCELADO` are terminal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Received, not yet actioned. Initial state.
    #[default]
    Pendiente,
    /// Being worked ("En Trámite").
    #[serde(alias = "EN_TRAMITE")]
    EnProceso,
    /// Resolved and closed.
    Atendido,
    /// Returned to the sender or previous assignee.
    Rechazado,
    /// Administratively voided.
    Cancelado,
}

/// Actions the UI may offer on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentAction {
    /// Record progress and move to `EN_PROCESO`.
    StartProcessing,
    /// Resolve the document (`ATENDIDO`).
    Attend,
    /// Reject the document (`RECHAZADO`).
    Reject,
    /// Void the document (`CANCELADO`).
    Cancel,
    /// Route to another department; the status is unchanged.
    Reassign,
}

impl DocumentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartProcessing => "start_processing",
            Self::Attend => "attend",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Reassign => "reassign",
        }
    }
}

impl fmt::Display for DocumentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an action is not legal from the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a document in status {from}")]
pub struct TransitionError {
    pub from: Status,
    pub action: DocumentAction,
}

const PENDING_ACTIONS: &[DocumentAction] = &[
    DocumentAction::StartProcessing,
    DocumentAction::Reject,
    DocumentAction::Cancel,
    DocumentAction::Reassign,
];

const IN_PROCESS_ACTIONS: &[DocumentAction] = &[
    DocumentAction::Attend,
    DocumentAction::Reject,
    DocumentAction::Cancel,
    DocumentAction::Reassign,
];

impl Status {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pendiente,
        Self::EnProceso,
        Self::Atendido,
        Self::Rechazado,
        Self::Cancelado,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::EnProceso => "EN_PROCESO",
            Self::Atendido => "ATENDIDO",
            Self::Rechazado => "RECHAZADO",
            Self::Cancelado => "CANCELADO",
        }
    }

    /// Label shown in tables and charts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::EnProceso => "En Trámite",
            Self::Atendido => "Atendido",
            Self::Rechazado => "Rechazado",
            Self::Cancelado => "Cancelado",
        }
    }

    /// No further transition is allowed once terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Atendido | Self::Rechazado | Self::Cancelado)
    }

    /// Actions the UI may offer; empty for terminal statuses.
    ///
    /// # Examples
    /// ```
    /// use doctrack::domain::{DocumentAction, Status};
    ///
    /// assert!(Status::Atendido.available_actions().is_empty());
    /// assert!(Status::Pendiente.available_actions().contains(&DocumentAction::Reject));
    /// ```
    pub fn available_actions(&self) -> &'static [DocumentAction] {
        match self {
            Self::Pendiente => PENDING_ACTIONS,
            Self::EnProceso => IN_PROCESS_ACTIONS,
            Self::Atendido | Self::Rechazado | Self::Cancelado => &[],
        }
    }

    /// Whether `action` is legal from this status.
    pub fn allows(&self, action: DocumentAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Status reached by applying `action`.
    pub fn apply(self, action: DocumentAction) -> Result<Self, TransitionError> {
        if !self.allows(action) {
            return Err(TransitionError { from: self, action });
        }
        Ok(match action {
            DocumentAction::StartProcessing => Self::EnProceso,
            DocumentAction::Attend => Self::Atendido,
            DocumentAction::Reject => Self::Rechazado,
            DocumentAction::Cancel => Self::Cancelado,
            DocumentAction::Reassign => self,
        })
    }

    /// Whether a direct status change from `self` to `next` is defined.
    pub fn can_transition_to(self, next: Self) -> bool {
        self.available_actions()
            .iter()
            .any(|action| *action != DocumentAction::Reassign && self.apply(*action) == Ok(next))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document status: {input}")]
pub struct ParseStatusError {
    pub input: String,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDIENTE" => Ok(Self::Pendiente),
            "EN_PROCESO" | "EN_TRAMITE" => Ok(Self::EnProceso),
            "ATENDIDO" => Ok(Self::Atendido),
            "RECHAZADO" => Ok(Self::Rechazado),
            "CANCELADO" => Ok(Self::Cancelado),
            _ => Err(ParseStatusError {
                input: value.to_owned(),
            }),
        }
    }
}
