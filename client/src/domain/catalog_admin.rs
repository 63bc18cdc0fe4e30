//! Catalog maintenance for the settings screens.
//!
//! New items are appended after the current maximum order. Edits travel as
//! [`CatalogItemPatch`] so the immutable code is never sent back.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::catalog::{
    CatalogCategory, CatalogItem, CatalogItemDraft, CatalogItemPatch, CatalogValidationError,
};
use crate::domain::ports::{CatalogsApi, CatalogsApiError};
use crate::domain::{Action, Capabilities, Error, Module, Session};

/// Parse the free-form metadata box. Blank input means no metadata.
///
/// # Errors
///
/// `InvalidRequest` when the text is not a JSON object.
pub fn metadata_from_text(raw: &str) -> Result<Option<Map<String, Value>>, Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(Error::invalid_request("Formato JSON inválido en metadatos.")
            .with_field("metadata", "Debe ser un objeto JSON")),
    }
}

fn draft_error(error: CatalogValidationError) -> Error {
    let field = match error {
        CatalogValidationError::EmptyName => "name",
        CatalogValidationError::EmptyCode => "code",
    };
    Error::invalid_request(error.to_string()).with_field(field, "Campo obligatorio")
}

fn backend_failure(operation: &'static str, error: CatalogsApiError) -> Error {
    warn!(operation, %error, "catalog request failed");
    error.into()
}

/// Catalog reads and admin edits.
#[derive(Clone)]
pub struct CatalogAdminService<C> {
    api: Arc<C>,
    capabilities: Arc<Capabilities>,
}

impl<C> CatalogAdminService<C> {
    pub fn new(api: Arc<C>, capabilities: Arc<Capabilities>) -> Self {
        Self { api, capabilities }
    }
}

impl<C: CatalogsApi> CatalogAdminService<C> {
    /// Every item of `category`, inactive ones included.
    pub async fn items(
        &self,
        session: &Session,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, Error> {
        if !session.is_authenticated() {
            return Err(Error::unauthorized("Sesión no iniciada."));
        }
        self.api
            .list(category)
            .await
            .map_err(|error| backend_failure("list", error))
    }

    /// Create an item at the end of its category and return what was sent.
    pub async fn create(
        &self,
        session: &Session,
        category: CatalogCategory,
        name: &str,
        code: &str,
        metadata: Option<Map<String, Value>>,
    ) -> Result<CatalogItemDraft, Error> {
        self.capabilities
            .authorize(session, Module::Settings, Action::Update)?;
        let existing = self.items(session, category).await?;
        let mut draft = CatalogItemDraft::new(category, name, code, &existing).map_err(draft_error)?;
        if let Some(metadata) = metadata {
            draft = draft.with_metadata(metadata);
        }
        self.api
            .create(&draft)
            .await
            .map_err(|error| backend_failure("create", error))?;
        info!(category = %category, code = %draft.code, order = draft.order, "catalog item created");
        Ok(draft)
    }

    /// Send `patch` for item `id`. Returns `false` without calling the
    /// backend when the patch changes nothing.
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        patch: &CatalogItemPatch,
    ) -> Result<bool, Error> {
        self.capabilities
            .authorize(session, Module::Settings, Action::Update)?;
        if patch.is_empty() {
            return Ok(false);
        }
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(draft_error(CatalogValidationError::EmptyName));
        }
        self.api
            .update(id, patch)
            .await
            .map_err(|error| backend_failure("update", error))?;
        info!(catalog_item = id, "catalog item updated");
        Ok(true)
    }

    /// Flip the active flag of `item`.
    pub async fn toggle_active(&self, session: &Session, item: &CatalogItem) -> Result<bool, Error> {
        let patch = CatalogItemPatch {
            is_active: Some(!item.is_active),
            ..CatalogItemPatch::default()
        };
        self.update(session, &item.id, &patch).await?;
        Ok(!item.is_active)
    }
}
