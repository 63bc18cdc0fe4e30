//! Driven port for the admin-managed catalogs.

use async_trait::async_trait;

use super::define_backend_error;
use crate::domain::catalog::{CatalogCategory, CatalogItem, CatalogItemDraft, CatalogItemPatch};

define_backend_error! {
    /// Errors surfaced by the catalogs endpoints.
    pub enum CatalogsApiError => "catalogs"
}

/// Port for reading and maintaining catalogs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogsApi: Send + Sync {
    /// Every item of `category`, active or not, in backend order.
    async fn list(&self, category: CatalogCategory) -> Result<Vec<CatalogItem>, CatalogsApiError>;

    async fn create(&self, draft: &CatalogItemDraft) -> Result<(), CatalogsApiError>;

    async fn update(&self, id: &str, patch: &CatalogItemPatch) -> Result<(), CatalogsApiError>;
}

/// Fixture implementation serving a fixed list, filtered by category.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalogsApi {
    pub items: Vec<CatalogItem>,
}

#[async_trait]
impl CatalogsApi for FixtureCatalogsApi {
    async fn list(&self, category: CatalogCategory) -> Result<Vec<CatalogItem>, CatalogsApiError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }

    async fn create(&self, _draft: &CatalogItemDraft) -> Result<(), CatalogsApiError> {
        Ok(())
    }

    async fn update(&self, _id: &str, _patch: &CatalogItemPatch) -> Result<(), CatalogsApiError> {
        Ok(())
    }
}
