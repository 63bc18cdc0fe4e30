//! Catalog endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{HttpFailure, RestClient, decode};
use crate::domain::ports::{CatalogsApi, CatalogsApiError};
use crate::domain::{CatalogCategory, CatalogItem, CatalogItemDraft, CatalogItemPatch};

impl RestClient {
    async fn fetch_catalog(&self, category: CatalogCategory) -> Result<Vec<CatalogItem>, HttpFailure> {
        let request = self
            .request(Method::GET, "catalogs")?
            .query(&[("category", category.as_str())]);
        let body = self.execute(request).await?;
        decode(&body, "catalog")
    }
}

#[async_trait]
impl CatalogsApi for RestClient {
    async fn list(&self, category: CatalogCategory) -> Result<Vec<CatalogItem>, CatalogsApiError> {
        Ok(self.fetch_catalog(category).await?)
    }

    async fn create(&self, draft: &CatalogItemDraft) -> Result<(), CatalogsApiError> {
        let request = self.request(Method::POST, "catalogs")?.json(draft);
        self.execute(request).await?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &CatalogItemPatch) -> Result<(), CatalogsApiError> {
        if patch.is_empty() {
            return Ok(());
        }
        let request = self
            .request(Method::PATCH, &format!("catalogs/{}", id.trim()))?
            .json(patch);
        self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Url;
    use rstest::{fixture, rstest};

    use super::*;

    /// Client pointed at a closed local port: any request that is actually
    /// sent fails with a transport error.
    #[fixture]
    fn offline() -> RestClient {
        let base = Url::parse("http://127.0.0.1:1/api").expect("base url");
        RestClient::new(base, Duration::from_secs(2)).expect("client builds")
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patch_returns_without_a_request(offline: RestClient) {
        let result = offline.update("7", &CatalogItemPatch::default()).await;
        assert_eq!(result, Ok(()));
    }

    #[rstest]
    #[tokio::test]
    async fn non_empty_patch_is_sent(offline: RestClient) {
        let patch = CatalogItemPatch {
            is_active: Some(false),
            ..CatalogItemPatch::default()
        };
        let result = offline.update("7", &patch).await;
        assert!(
            matches!(
                result,
                Err(CatalogsApiError::Transport { .. } | CatalogsApiError::Timeout { .. })
            ),
            "{result:?}"
        );
    }

    #[rstest]
    fn catalog_payloads_decode() {
        let body = br#"[{"id": "1", "category": "DOC_TYPE", "name": "Oficio", "code": "OF", "order": 2}]"#;
        let items: Vec<CatalogItem> = decode(body, "catalog").expect("decodes");
        assert!(items[0].is_active);
        assert_eq!(items[0].order, 2);
    }
}
