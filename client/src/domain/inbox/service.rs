//! Inbox refresh orchestration over the documents port.

use std::sync::{Arc, Mutex, MutexGuard};

use mockable::Clock;
use tracing::{debug, warn};

use super::{InboxCounts, InboxFilter, InboxView, RefreshOutcome};
use crate::domain::Error;
use crate::domain::document::{Document, DueSoonThreshold};
use crate::domain::ports::DocumentsApi;

/// Owns one inbox view and refreshes it from the backend.
///
/// Refreshes may overlap; only the most recently started one is applied.
/// Failures are returned to the caller once and never retried.
pub struct InboxService<D> {
    api: Arc<D>,
    clock: Arc<dyn Clock>,
    threshold: DueSoonThreshold,
    view: Mutex<InboxView>,
}

impl<D> InboxService<D> {
    pub fn new(api: Arc<D>, clock: Arc<dyn Clock>, threshold: DueSoonThreshold) -> Self {
        Self {
            api,
            clock,
            threshold,
            view: Mutex::new(InboxView::new()),
        }
    }

    fn lock_view(&self) -> Result<MutexGuard<'_, InboxView>, Error> {
        self.view
            .lock()
            .map_err(|_| Error::internal("inbox view lock poisoned"))
    }

    /// Filtered documents at the clock's current instant.
    pub fn visible(&self, filter: &InboxFilter) -> Result<Vec<Document>, Error> {
        let now = self.clock.utc();
        let view = self.lock_view()?;
        Ok(view.visible(filter, now, self.threshold).cloned().collect())
    }

    pub fn counts(&self) -> Result<InboxCounts, Error> {
        let now = self.clock.utc();
        Ok(self.lock_view()?.counts(now, self.threshold))
    }
}

impl<D: DocumentsApi> InboxService<D> {
    /// Fetch the inbox and apply it unless a newer refresh started meanwhile.
    ///
    /// A failure of a superseded request is swallowed and reported as
    /// [`RefreshOutcome::Stale`]: the user is no longer waiting on it.
    pub async fn refresh(&self) -> Result<RefreshOutcome, Error> {
        let ticket = self.lock_view()?.begin_refresh();
        let result = self.api.inbox().await;

        let mut view = self.lock_view()?;
        match result {
            Ok(documents) => {
                let outcome = view.complete(ticket, documents);
                if outcome == RefreshOutcome::Applied {
                    debug!(
                        generation = ticket.generation(),
                        documents = view.documents().len(),
                        "inbox refreshed"
                    );
                }
                Ok(outcome)
            }
            Err(error) if !view.is_current(ticket) => {
                debug!(generation = ticket.generation(), %error, "ignoring stale inbox failure");
                Ok(RefreshOutcome::Stale)
            }
            Err(error) => {
                warn!(%error, "inbox refresh failed");
                Err(error.into())
            }
        }
    }
}
