//! Driven port for the organisational unit endpoints.

use async_trait::async_trait;

use super::define_backend_error;
use crate::domain::department::{Department, DepartmentDraft, flatten_tree};
use crate::domain::DepartmentId;

define_backend_error! {
    /// Errors surfaced by the departments endpoints.
    pub enum DepartmentsApiError => "departments"
}

/// Port for reading and extending the unit tree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentsApi: Send + Sync {
    /// Every unit as a flat list.
    async fn list(&self) -> Result<Vec<Department>, DepartmentsApiError>;

    /// Top-level units with their dependents nested.
    async fn tree(&self) -> Result<Vec<Department>, DepartmentsApiError>;

    /// Direct dependents of `id`, without grandchildren.
    async fn dependents(&self, id: DepartmentId) -> Result<Vec<Department>, DepartmentsApiError>;

    async fn create(&self, draft: &DepartmentDraft) -> Result<(), DepartmentsApiError>;
}

/// Fixture serving a fixed tree.
#[derive(Debug, Clone, Default)]
pub struct FixtureDepartmentsApi {
    pub roots: Vec<Department>,
}

fn without_children(unit: &Department) -> Department {
    Department {
        children: Vec::new(),
        ..unit.clone()
    }
}

#[async_trait]
impl DepartmentsApi for FixtureDepartmentsApi {
    async fn list(&self) -> Result<Vec<Department>, DepartmentsApiError> {
        Ok(flatten_tree(&self.roots)
            .into_iter()
            .map(|(_, unit)| without_children(unit))
            .collect())
    }

    async fn tree(&self) -> Result<Vec<Department>, DepartmentsApiError> {
        Ok(self.roots.clone())
    }

    async fn dependents(&self, id: DepartmentId) -> Result<Vec<Department>, DepartmentsApiError> {
        let parent = self
            .roots
            .iter()
            .find_map(|root| root.find(id))
            .ok_or_else(|| DepartmentsApiError::rejected(404, "Departamento no encontrado"))?;
        Ok(parent.children.iter().map(without_children).collect())
    }

    async fn create(&self, _draft: &DepartmentDraft) -> Result<(), DepartmentsApiError> {
        Ok(())
    }
}
