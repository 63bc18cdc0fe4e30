//! Tracked documents (official correspondence) and their lifecycle.
//!
//! Purpose: hold the client's read-only copy of a backend document, validated
//! at the API boundary. The client never mutates a document; it requests a
//! transition through a port and re-fetches the authoritative state.
//!
//! Public surface:
//! - [`Document`] and its identifiers.
//! - [`Status`], [`DocumentAction`]: lifecycle states and legal actions.
//! - [`TimeStatus`], [`compute_time_status`]: derived urgency.

mod status;
mod time_status;

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DepartmentId, DepartmentRef};

pub use status::{DocumentAction, ParseStatusError, Status, TransitionError};
pub use time_status::{
    DEFAULT_DUE_SOON_DAYS, DueSoonThreshold, TimeStatus, compute_time_status, days_remaining,
};

/// Minimum folio length.
pub const FOLIO_MIN: usize = 3;
/// Maximum folio length.
pub const FOLIO_MAX: usize = 50;

/// Validation errors raised while reading a document payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentValidationError {
    #[error("document id must be a valid UUID: {input}")]
    InvalidId { input: String },
    #[error("folio must not be empty")]
    EmptyFolio,
    #[error("folio must be between {min} and {max} characters")]
    FolioLength { min: usize, max: usize },
    #[error("invalid priority: {input}")]
    InvalidPriority { input: String },
    #[error("invalid {field} timestamp: {input}")]
    InvalidTimestamp { field: &'static str, input: String },
    #[error("assigned department id must be a valid UUID")]
    InvalidDepartment,
}

/// Stable document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, DocumentValidationError> {
        let raw = id.as_ref();
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| DocumentValidationError::InvalidId {
                input: raw.to_owned(),
            })
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Official reference number ("folio").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Folio(String);

impl Folio {
    pub fn new(folio: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let folio = folio.into();
        let trimmed = folio.trim();
        if trimmed.is_empty() {
            return Err(DocumentValidationError::EmptyFolio);
        }
        let length = trimmed.chars().count();
        if !(FOLIO_MIN..=FOLIO_MAX).contains(&length) {
            return Err(DocumentValidationError::FolioLength {
                min: FOLIO_MIN,
                max: FOLIO_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Folio {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Folio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Folio> for String {
    fn from(value: Folio) -> Self {
        value.0
    }
}

impl TryFrom<String> for Folio {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Handling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    Urgente,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgente => "Urgente",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = DocumentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Normal" => Ok(Self::Normal),
            "Urgente" => Ok(Self::Urgente),
            _ => Err(DocumentValidationError::InvalidPriority {
                input: value.to_owned(),
            }),
        }
    }
}

/// Client copy of a tracked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentDto", into = "DocumentDto")]
pub struct Document {
    pub id: DocumentId,
    pub official_number: Folio,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub reception_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub assigned_department_id: Option<DepartmentId>,
    pub assigned_department_name: Option<String>,
    pub sender_name: String,
    pub sender_dependency: Option<String>,
    pub is_encrypted: bool,
    pub attended_at: Option<DateTime<Utc>>,
}

impl Document {
    /// A freshly received document: `PENDIENTE`, no deadline, unassigned.
    pub fn received(
        official_number: Folio,
        description: impl Into<String>,
        sender_name: impl Into<String>,
        reception_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DocumentId::random(),
            official_number,
            description: description.into(),
            priority: Priority::Normal,
            status: Status::Pendiente,
            reception_date,
            deadline: None,
            assigned_department_id: None,
            assigned_department_name: None,
            sender_name: sender_name.into(),
            sender_dependency: None,
            is_encrypted: false,
            attended_at: None,
        }
    }

    /// Urgency at `now`.
    pub fn time_status(&self, now: DateTime<Utc>, threshold: DueSoonThreshold) -> TimeStatus {
        compute_time_status(self.status, self.deadline, now, threshold)
    }

    /// Transition controls must be hidden once this is `true`.
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn available_actions(&self) -> &'static [DocumentAction] {
        self.status.available_actions()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentDto {
    id: String,
    official_number: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: Option<String>,
    status: Status,
    reception_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_department: Option<DepartmentRef>,
    #[serde(default)]
    sender_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender_dependency: Option<String>,
    #[serde(default)]
    is_encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attended_at: Option<String>,
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_timestamp(
    field: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, DocumentValidationError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| DocumentValidationError::InvalidTimestamp {
            field,
            input: raw.to_owned(),
        })
}

fn parse_optional_timestamp(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, DocumentValidationError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| parse_timestamp(field, &value))
        .transpose()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

impl TryFrom<DocumentDto> for Document {
    type Error = DocumentValidationError;

    fn try_from(value: DocumentDto) -> Result<Self, Self::Error> {
        let priority = match value.priority.as_deref() {
            None | Some("") => Priority::Normal,
            Some(raw) => raw.parse()?,
        };

        let embedded = value.assigned_department;
        let assigned_department_id = match non_blank(value.assigned_department_id) {
            Some(raw) => {
                Some(DepartmentId::new(raw).map_err(|_| DocumentValidationError::InvalidDepartment)?)
            }
            None => embedded.as_ref().map(|department| department.id),
        };

        Ok(Self {
            id: DocumentId::new(&value.id)?,
            official_number: Folio::new(value.official_number)?,
            description: value.description,
            priority,
            status: value.status,
            reception_date: parse_timestamp("reception_date", &value.reception_date)?,
            deadline: parse_optional_timestamp("deadline", value.deadline)?,
            assigned_department_id,
            assigned_department_name: embedded.map(|department| department.name),
            sender_name: value.sender_name,
            sender_dependency: non_blank(value.sender_dependency),
            is_encrypted: value.is_encrypted,
            attended_at: parse_optional_timestamp("attended_at", value.attended_at)?,
        })
    }
}

impl From<Document> for DocumentDto {
    fn from(value: Document) -> Self {
        let assigned_department = match (value.assigned_department_id, value.assigned_department_name) {
            (Some(id), Some(name)) => Some(DepartmentRef { id, name }),
            _ => None,
        };
        Self {
            id: value.id.into(),
            official_number: value.official_number.into(),
            description: value.description,
            priority: Some(value.priority.as_str().to_owned()),
            status: value.status,
            reception_date: value.reception_date.to_rfc3339(),
            deadline: value.deadline.map(|deadline| deadline.to_rfc3339()),
            assigned_department_id: value.assigned_department_id.map(String::from),
            assigned_department,
            sender_name: value.sender_name,
            sender_dependency: value.sender_dependency,
            is_encrypted: value.is_encrypted,
            attended_at: value.attended_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests;
