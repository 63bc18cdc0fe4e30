//! Admin-managed lookup lists (document types, instructions, entities).

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog category, as used in `GET /catalogs?category=X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogCategory {
    DocType,
    Instruction,
    ReceptionMode,
    ExternalEntity,
}

impl CatalogCategory {
    pub const ALL: [Self; 4] = [
        Self::DocType,
        Self::Instruction,
        Self::ReceptionMode,
        Self::ExternalEntity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocType => "DOC_TYPE",
            Self::Instruction => "INSTRUCTION",
            Self::ReceptionMode => "RECEPTION_MODE",
            Self::ExternalEntity => "EXTERNAL_ENTITY",
        }
    }
}

impl fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog category: {input}")]
pub struct ParseCatalogCategoryError {
    pub input: String,
}

impl FromStr for CatalogCategory {
    type Err = ParseCatalogCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseCatalogCategoryError {
                input: value.to_owned(),
            })
    }
}

/// One entry of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub category: CatalogCategory,
    pub name: String,
    pub code: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

fn default_active() -> bool {
    true
}

impl CatalogItem {
    fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|map| map.get(key))
    }

    /// Whether documents of this type expect a response (and a deadline).
    /// Absent metadata means `true`; only an explicit `false` disables it.
    pub fn requires_response(&self) -> bool {
        !matches!(self.meta("requires_response"), Some(Value::Bool(false)))
    }

    /// SLA in days, accepting numbers or numeric strings.
    pub fn sla_days(&self) -> Option<i64> {
        match self.meta("sla_days")? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|days| days.trunc() as i64)),
            Value::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    /// Deadline implied by the SLA; `None` when the SLA is missing or not
    /// positive.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use doctrack::domain::{CatalogCategory, CatalogItem};
    /// use serde_json::json;
    ///
    /// let item: CatalogItem = serde_json::from_value(json!({
    ///     "id": "1", "category": "INSTRUCTION", "name": "Urgente", "code": "URG",
    ///     "metadata": { "sla_days": 3 }
    /// })).unwrap();
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    /// assert_eq!(item.suggested_deadline(today), NaiveDate::from_ymd_opt(2025, 3, 13));
    /// ```
    pub fn suggested_deadline(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = u64::try_from(self.sla_days()?).ok().filter(|days| *days > 0)?;
        today.checked_add_days(Days::new(days))
    }
}

/// Active items sorted by `order` ascending. Equal orders keep their input
/// order.
pub fn active_in_order(items: impl IntoIterator<Item = CatalogItem>) -> Vec<CatalogItem> {
    let mut active: Vec<CatalogItem> = items.into_iter().filter(|item| item.is_active).collect();
    active.sort_by_key(|item| item.order);
    active
}

/// Order assigned to a newly created item.
pub fn next_order(items: &[CatalogItem]) -> i64 {
    items
        .iter()
        .map(|item| item.order)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Payload for creating a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItemDraft {
    pub category: CatalogCategory,
    pub name: String,
    pub code: String,
    pub order: i64,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Validation errors for catalog payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("catalog item name must not be empty")]
    EmptyName,
    #[error("catalog item code must not be empty")]
    EmptyCode,
}

impl CatalogItemDraft {
    /// Draft appended after `existing`, active by default.
    pub fn new(
        category: CatalogCategory,
        name: impl Into<String>,
        code: impl Into<String>,
        existing: &[CatalogItem],
    ) -> Result<Self, CatalogValidationError> {
        let name = name.into().trim().to_owned();
        let code = code.into().trim().to_owned();
        if name.is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        if code.is_empty() {
            return Err(CatalogValidationError::EmptyCode);
        }
        Ok(Self {
            category,
            name,
            code,
            order: next_order(existing),
            is_active: true,
            metadata: None,
        })
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Partial update for an existing item. There is no `code` field: codes
/// are immutable once created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CatalogItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.order.is_none()
            && self.is_active.is_none()
            && self.metadata.is_none()
    }

    /// Apply to a local copy. A blank name is ignored.
    pub fn apply_to(&self, item: &mut CatalogItem) {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
            item.name = name.to_owned();
        }
        if let Some(order) = self.order {
            item.order = order;
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
        if let Some(metadata) = &self.metadata {
            item.metadata = Some(metadata.clone());
        }
    }
}
