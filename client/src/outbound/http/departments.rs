//! Department endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{HttpFailure, RestClient, decode};
use crate::domain::ports::{DepartmentsApi, DepartmentsApiError};
use crate::domain::{Department, DepartmentDraft, DepartmentId};

impl RestClient {
    async fn fetch_departments(&self, path: &str) -> Result<Vec<Department>, HttpFailure> {
        let request = self.request(Method::GET, path)?;
        let body = self.execute(request).await?;
        decode(&body, "department list")
    }
}

#[async_trait]
impl DepartmentsApi for RestClient {
    async fn list(&self) -> Result<Vec<Department>, DepartmentsApiError> {
        Ok(self.fetch_departments("departments").await?)
    }

    async fn tree(&self) -> Result<Vec<Department>, DepartmentsApiError> {
        Ok(self.fetch_departments("departments/tree").await?)
    }

    async fn dependents(&self, id: DepartmentId) -> Result<Vec<Department>, DepartmentsApiError> {
        Ok(self
            .fetch_departments(&format!("departments/dependents/{id}"))
            .await?)
    }

    async fn create(&self, draft: &DepartmentDraft) -> Result<(), DepartmentsApiError> {
        let request = self.request(Method::POST, "departments")?.json(draft);
        self.execute(request).await?;
        Ok(())
    }
}
