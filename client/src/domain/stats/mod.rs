//! Dashboard rollups computed from a document list.
//!
//! Every figure is a pure function of the documents, the current instant
//! and the reporting options; permuting the input never changes a count.
//!
//! The `vencidos` KPI is counted independently of the status buckets: an
//! open document past its deadline counts toward its status bucket *and*
//! toward `vencidos`. The two are shown as separate indicators, not as a
//! partition.

mod department;
mod trend;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use super::document::{Document, DueSoonThreshold, Status, TimeStatus};

pub use department::{
    DepartmentCount, LABEL_MAX_CHARS, UNASSIGNED_LABEL, by_department, department_label,
};
pub use trend::{TrendDay, trend};

/// Default length of the trend window.
pub const DEFAULT_TREND_DAYS: u32 = 7;
/// Default number of departments shown in the chart.
pub const DEFAULT_TOP_DEPARTMENTS: usize = 6;

/// Headline KPI counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KpiSummary {
    pub total: usize,
    pub pendientes: usize,
    pub en_tramite: usize,
    pub atendidos: usize,
    pub vencidos: usize,
}

/// One slice of the status chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub label: &'static str,
    pub count: usize,
}

/// Knobs for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupOptions {
    pub now: DateTime<Utc>,
    pub threshold: DueSoonThreshold,
    /// Local offset used for calendar-day boundaries.
    pub offset: FixedOffset,
    pub trend_days: u32,
    pub top_departments: usize,
}

impl RollupOptions {
    /// Defaults anchored at `now`, with UTC day boundaries.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            threshold: DueSoonThreshold::default(),
            offset: Utc.fix(),
            trend_days: DEFAULT_TREND_DAYS,
            top_departments: DEFAULT_TOP_DEPARTMENTS,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_threshold(mut self, threshold: DueSoonThreshold) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rollup {
    pub kpis: KpiSummary,
    pub by_status: Vec<StatusSlice>,
    pub by_department: Vec<DepartmentCount>,
    pub trend: Vec<TrendDay>,
}

/// Count documents into the headline KPIs.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use doctrack::domain::{DueSoonThreshold, KpiSummary, summarize};
///
/// assert_eq!(summarize(&[], Utc::now(), DueSoonThreshold::default()), KpiSummary::default());
/// ```
pub fn summarize(
    documents: &[Document],
    now: DateTime<Utc>,
    threshold: DueSoonThreshold,
) -> KpiSummary {
    documents
        .iter()
        .fold(KpiSummary::default(), |mut summary, document| {
            summary.total += 1;
            match document.status {
                Status::Pendiente => summary.pendientes += 1,
                Status::EnProceso => summary.en_tramite += 1,
                Status::Atendido => summary.atendidos += 1,
                Status::Rechazado | Status::Cancelado => {}
            }
            if document.time_status(now, threshold) == TimeStatus::Vencido {
                summary.vencidos += 1;
            }
            summary
        })
}

/// Status chart slices in the order Pendiente, En Trámite, Atendido,
/// Vencido. Empty slices are omitted.
///
/// Unlike the KPIs the chart is a partition: an overdue open document is
/// drawn only in the Vencido slice. Rejected and cancelled documents are not
/// drawn.
pub fn status_distribution(
    documents: &[Document],
    now: DateTime<Utc>,
    threshold: DueSoonThreshold,
) -> Vec<StatusSlice> {
    let mut counts = [0_usize; 4];
    for document in documents {
        let slot = if document.time_status(now, threshold) == TimeStatus::Vencido {
            Some(3)
        } else {
            match document.status {
                Status::Pendiente => Some(0),
                Status::EnProceso => Some(1),
                Status::Atendido => Some(2),
                Status::Rechazado | Status::Cancelado => None,
            }
        };
        if let Some(index) = slot {
            counts[index] += 1;
        }
    }

    ["Pendiente", "En Trámite", "Atendido", "Vencido"]
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| StatusSlice { label, count })
        .collect()
}

/// Build the full dashboard rollup.
pub fn aggregate(documents: &[Document], options: &RollupOptions) -> Rollup {
    Rollup {
        kpis: summarize(documents, options.now, options.threshold),
        by_status: status_distribution(documents, options.now, options.threshold),
        by_department: by_department(documents, options.top_departments),
        trend: trend(documents, options.now, options.offset, options.trend_days),
    }
}
