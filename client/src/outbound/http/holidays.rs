//! Holiday calendar endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{RestClient, decode};
use crate::domain::ports::{HolidaysApi, HolidaysApiError};
use crate::domain::{Holiday, HolidayDraft, HolidayId};

#[async_trait]
impl HolidaysApi for RestClient {
    async fn list(&self) -> Result<Vec<Holiday>, HolidaysApiError> {
        let request = self.request(Method::GET, "holidays")?;
        let body = self.execute(request).await?;
        Ok(decode(&body, "holiday list")?)
    }

    async fn create(&self, draft: &HolidayDraft) -> Result<(), HolidaysApiError> {
        let request = self.request(Method::POST, "holidays")?.json(draft);
        self.execute(request).await?;
        Ok(())
    }

    async fn delete(&self, id: &HolidayId) -> Result<(), HolidaysApiError> {
        let request = self.request(Method::DELETE, &format!("holidays/{}", id.as_str().trim()))?;
        self.execute(request).await?;
        Ok(())
    }
}
