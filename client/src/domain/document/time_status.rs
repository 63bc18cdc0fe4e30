//! Derived urgency ("time status") of a document.
//!
//! Time status is computed on demand from the status, the deadline and the
//! current instant. It is never stored.

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::Status;

/// Default window before the deadline in which a document is due soon.
pub const DEFAULT_DUE_SOON_DAYS: u32 = 2;

/// Urgency classification shown next to each document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeStatus {
    /// Deadline comfortably ahead, absent, or the document is closed.
    EnTiempo,
    /// Deadline within the due-soon window.
    #[serde(alias = "POR VENCER")]
    PorVencer,
    /// Deadline passed while the document is still open.
    Vencido,
}

impl TimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnTiempo => "EN_TIEMPO",
            Self::PorVencer => "POR_VENCER",
            Self::Vencido => "VENCIDO",
        }
    }
}

impl fmt::Display for TimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the due-soon window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueSoonThreshold(TimeDelta);

impl DueSoonThreshold {
    /// Window of `days` whole days.
    pub fn days(days: u32) -> Self {
        Self(TimeDelta::days(i64::from(days)))
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Default for DueSoonThreshold {
    fn default() -> Self {
        Self::days(DEFAULT_DUE_SOON_DAYS)
    }
}

/// Classify a document's urgency.
///
/// Terminal documents and documents without a deadline are always on time.
/// A deadline equal to `now` is not overdue; only `now > deadline` is.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use doctrack::domain::{DueSoonThreshold, Status, TimeStatus, compute_time_status};
///
/// let now = Utc::now();
/// let status = compute_time_status(
///     Status::Pendiente,
///     Some(now + TimeDelta::hours(1)),
///     now,
///     DueSoonThreshold::default(),
/// );
/// assert_eq!(status, TimeStatus::PorVencer);
/// ```
pub fn compute_time_status(
    status: Status,
    deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: DueSoonThreshold,
) -> TimeStatus {
    if status.is_terminal() {
        return TimeStatus::EnTiempo;
    }
    let Some(deadline) = deadline else {
        return TimeStatus::EnTiempo;
    };

    if now > deadline {
        TimeStatus::Vencido
    } else if deadline - now <= threshold.as_delta() {
        TimeStatus::PorVencer
    } else {
        TimeStatus::EnTiempo
    }
}

/// Signed number of calendar days from `now` until `deadline`, using the
/// day boundaries of `tz`. Negative once the deadline day has passed.
pub fn days_remaining<Tz: TimeZone>(deadline: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> i64 {
    let deadline_day = deadline.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();
    (deadline_day - today).num_days()
}
