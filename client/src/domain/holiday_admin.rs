//! Holiday calendar maintenance. Reading is open to any signed-in user;
//! marking and unmarking days is a settings change.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::holiday::{HolidayCalendar, HolidayDraft};
use crate::domain::ports::{HolidaysApi, HolidaysApiError};
use crate::domain::{Action, Capabilities, Error, Module, Session};

fn backend_failure(operation: &'static str, error: HolidaysApiError) -> Error {
    warn!(operation, %error, "holidays request failed");
    error.into()
}

#[derive(Clone)]
pub struct HolidayAdminService<H> {
    api: Arc<H>,
    capabilities: Arc<Capabilities>,
}

impl<H> HolidayAdminService<H> {
    pub fn new(api: Arc<H>, capabilities: Arc<Capabilities>) -> Self {
        Self { api, capabilities }
    }
}

impl<H: HolidaysApi> HolidayAdminService<H> {
    pub async fn calendar(&self, session: &Session) -> Result<HolidayCalendar, Error> {
        if !session.is_authenticated() {
            return Err(Error::unauthorized("Sesión no iniciada."));
        }
        self.api
            .list()
            .await
            .map(HolidayCalendar::new)
            .map_err(|error| backend_failure("list", error))
    }

    /// Mark `date` as non-working and return the refreshed calendar.
    ///
    /// A day that is already marked is refused before the backend is called.
    pub async fn mark(
        &self,
        session: &Session,
        date: NaiveDate,
        description: &str,
        recurring: bool,
    ) -> Result<HolidayCalendar, Error> {
        self.capabilities
            .authorize(session, Module::Settings, Action::Update)?;
        let draft = HolidayDraft::new(date, description, recurring).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_field("description", "Indique el motivo del día inhábil")
        })?;
        if self.calendar(session).await?.is_holiday(date) {
            return Err(Error::conflict("Este día ya está marcado como inhábil."));
        }
        self.api
            .create(&draft)
            .await
            .map_err(|error| backend_failure("create", error))?;
        info!(%date, recurring, "holiday marked");
        self.calendar(session).await
    }

    /// Remove the entry marking `date` and return the refreshed calendar.
    pub async fn unmark(&self, session: &Session, date: NaiveDate) -> Result<HolidayCalendar, Error> {
        self.capabilities
            .authorize(session, Module::Settings, Action::Update)?;
        let calendar = self.calendar(session).await?;
        let Some(holiday) = calendar.on(date) else {
            return Err(Error::not_found(format!("{date} no está marcado como inhábil.")));
        };
        self.api
            .delete(&holiday.id)
            .await
            .map_err(|error| backend_failure("delete", error))?;
        info!(%date, holiday_id = %holiday.id, "holiday removed");
        self.calendar(session).await
    }
}
