//! Inbox view state: fetched documents, tab filters, KPI chips and the
//! request-generation guard.
//!
//! Every refresh takes a [`RefreshTicket`] before the request is sent. A
//! response is applied only if its ticket is still the latest one, so a
//! slow, superseded request can never overwrite fresher state.

mod service;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::document::{Document, DueSoonThreshold, Priority, Status, TimeStatus};

pub use service::InboxService;

/// Inbox filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InboxTab {
    #[default]
    All,
    Pendientes,
    Urgentes,
    Atendidos,
    Vencidos,
}

impl InboxTab {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Pendientes,
        Self::Urgentes,
        Self::Atendidos,
        Self::Vencidos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pendientes => "pendientes",
            Self::Urgentes => "urgentes",
            Self::Atendidos => "atendidos",
            Self::Vencidos => "vencidos",
        }
    }

    fn matches(self, document: &Document, now: DateTime<Utc>, threshold: DueSoonThreshold) -> bool {
        match self {
            Self::All => true,
            Self::Pendientes => document.status == Status::Pendiente,
            Self::Urgentes => document.priority == Priority::Urgente,
            Self::Atendidos => document.status == Status::Atendido,
            Self::Vencidos => document.time_status(now, threshold) == TimeStatus::Vencido,
        }
    }
}

impl fmt::Display for InboxTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown inbox tab: {input}")]
pub struct ParseInboxTabError {
    pub input: String,
}

impl FromStr for InboxTab {
    type Err = ParseInboxTabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == normalized)
            .ok_or_else(|| ParseInboxTabError {
                input: value.to_owned(),
            })
    }
}

/// Tab plus optional department filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxFilter {
    pub tab: InboxTab,
    /// Substring of the assigned department name or sender agency, or an
    /// exact department id.
    pub department: Option<String>,
}

impl InboxFilter {
    pub fn tab(tab: InboxTab) -> Self {
        Self {
            tab,
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into()).filter(|value| !value.trim().is_empty());
        self
    }

    fn matches_department(&self, document: &Document) -> bool {
        let Some(needle) = self.department.as_deref().map(str::trim) else {
            return true;
        };
        let assigned_name = document.assigned_department_name.as_deref().unwrap_or_default();
        let agency = document.sender_dependency.as_deref().unwrap_or_default();
        let assigned_id = document
            .assigned_department_id
            .map(String::from)
            .unwrap_or_default();
        assigned_name.contains(needle) || agency.contains(needle) || assigned_id == needle
    }
}

/// Counters shown above the inbox table. Computed over every fetched
/// document, not the filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InboxCounts {
    pub total: usize,
    pub pendientes: usize,
    pub urgentes: usize,
    pub atendidos: usize,
    pub vencidos: usize,
}

/// Proof that a refresh was started; see [`InboxView::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Result of handing a response to [`InboxView::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was the latest and replaced the view's documents.
    Applied,
    /// A newer refresh was started; the response was discarded.
    Stale,
}

/// Documents fetched for one view, guarded by a generation counter.
#[derive(Debug, Clone, Default)]
pub struct InboxView {
    documents: Vec<Document>,
    latest: u64,
    applied: Option<u64>,
}

impl InboxView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh; any earlier ticket becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest = self.latest.wrapping_add(1);
        RefreshTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recent refresh.
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Apply `documents` if `ticket` is still current.
    pub fn complete(&mut self, ticket: RefreshTicket, documents: Vec<Document>) -> RefreshOutcome {
        if !self.is_current(ticket) {
            debug!(
                generation = ticket.0,
                latest = self.latest,
                "discarding stale inbox response"
            );
            return RefreshOutcome::Stale;
        }
        self.documents = documents;
        self.applied = Some(ticket.0);
        RefreshOutcome::Applied
    }

    /// Generation of the response currently shown, if any.
    pub fn applied_generation(&self) -> Option<u64> {
        self.applied
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents passing `filter`, in fetch order.
    pub fn visible<'a>(
        &'a self,
        filter: &'a InboxFilter,
        now: DateTime<Utc>,
        threshold: DueSoonThreshold,
    ) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents.iter().filter(move |document| {
            filter.tab.matches(document, now, threshold) && filter.matches_department(document)
        })
    }

    pub fn counts(&self, now: DateTime<Utc>, threshold: DueSoonThreshold) -> InboxCounts {
        let count = |tab: InboxTab| {
            self.documents
                .iter()
                .filter(|document| tab.matches(document, now, threshold))
                .count()
        };
        InboxCounts {
            total: self.documents.len(),
            pendientes: count(InboxTab::Pendientes),
            urgentes: count(InboxTab::Urgentes),
            atendidos: count(InboxTab::Atendidos),
            vencidos: count(InboxTab::Vencidos),
        }
    }
}
