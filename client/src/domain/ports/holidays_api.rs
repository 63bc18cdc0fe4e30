//! Driven port for the non-working day calendar.

use async_trait::async_trait;

use super::define_backend_error;
use crate::domain::holiday::{Holiday, HolidayDraft, HolidayId};

define_backend_error! {
    /// Errors surfaced by the holidays endpoints.
    pub enum HolidaysApiError => "holidays"
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolidaysApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Holiday>, HolidaysApiError>;

    async fn create(&self, draft: &HolidayDraft) -> Result<(), HolidaysApiError>;

    async fn delete(&self, id: &HolidayId) -> Result<(), HolidaysApiError>;
}

/// Fixture serving a fixed calendar.
#[derive(Debug, Clone, Default)]
pub struct FixtureHolidaysApi {
    pub holidays: Vec<Holiday>,
}

#[async_trait]
impl HolidaysApi for FixtureHolidaysApi {
    async fn list(&self) -> Result<Vec<Holiday>, HolidaysApiError> {
        Ok(self.holidays.clone())
    }

    async fn create(&self, _draft: &HolidayDraft) -> Result<(), HolidaysApiError> {
        Ok(())
    }

    async fn delete(&self, id: &HolidayId) -> Result<(), HolidaysApiError> {
        if self.holidays.iter().any(|holiday| &holiday.id == id) {
            Ok(())
        } else {
            Err(HolidaysApiError::rejected(404, "Día inhábil no encontrado"))
        }
    }
}
