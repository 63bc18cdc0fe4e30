//! Trailing incoming-vs-completed trend, bucketed by local calendar day.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::document::{Document, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendDay {
    pub date: NaiveDate,
    /// Documents received that day.
    pub incoming: usize,
    /// Documents attended that day.
    pub completed: usize,
}

fn local_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// `days` buckets ending today (oldest first).
pub fn trend(
    documents: &[Document],
    now: DateTime<Utc>,
    offset: FixedOffset,
    days: u32,
) -> Vec<TrendDay> {
    let today = local_day(now, offset);
    let mut buckets: Vec<TrendDay> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| TrendDay {
            date,
            incoming: 0,
            completed: 0,
        })
        .collect();

    let Some(first) = buckets.first().map(|day| day.date) else {
        return buckets;
    };
    let len = buckets.len();
    let index_of = |date: NaiveDate| -> Option<usize> {
        usize::try_from((date - first).num_days())
            .ok()
            .filter(|index| *index < len)
    };

    for document in documents {
        if let Some(index) = index_of(local_day(document.reception_date, offset)) {
            buckets[index].incoming += 1;
        }
        if document.status != Status::Atendido {
            continue;
        }
        if let Some(index) = document
            .attended_at
            .and_then(|at| index_of(local_day(at, offset)))
        {
            buckets[index].completed += 1;
        }
    }
    buckets
}
