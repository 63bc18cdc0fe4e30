//! Organisational units: identifiers, the unit tree and the cascading
//! picker used when routing a document.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable department identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentId(Uuid);

/// Error returned when a department identifier is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("department id must be a valid UUID: {input}")]
pub struct DepartmentIdError {
    /// Raw value that failed to parse.
    pub input: String,
}

impl DepartmentId {
    /// Validate and construct a [`DepartmentId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, DepartmentIdError> {
        let raw = id.as_ref();
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| DepartmentIdError {
                input: raw.to_owned(),
            })
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DepartmentId> for String {
    fn from(value: DepartmentId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for DepartmentId {
    type Error = DepartmentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Department reference embedded in document payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    /// Department identifier.
    pub id: DepartmentId,
    /// Display name.
    pub name: String,
}

/// Organisational unit as served by `/departments`.
///
/// Tree responses nest dependents under `children`; flat responses leave it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hierarchy label such as "Subdirección" or "Jefatura de Departamento".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titular_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Department>,
}

impl Department {
    /// Depth-first search of this unit and its dependents.
    pub fn find(&self, id: DepartmentId) -> Option<&Department> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Pre-order walk of a forest as `(depth, unit)` pairs, roots at depth 0.
pub fn flatten_tree(roots: &[Department]) -> Vec<(usize, &Department)> {
    fn walk<'a>(nodes: &'a [Department], depth: usize, out: &mut Vec<(usize, &'a Department)>) {
        for node in nodes {
            out.push((depth, node));
            walk(&node.children, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

/// Hierarchy label applied when none is given.
pub const DEFAULT_DEPARTMENT_LEVEL: &str = "Departamento";

/// Payload for `POST /departments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentDraft {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: String,
    /// `None` creates a top-level unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DepartmentId>,
}

/// Validation errors for [`DepartmentDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentDraftError {
    #[error("department name must not be empty")]
    EmptyName,
    #[error("department code must not be empty")]
    EmptyCode,
}

impl DepartmentDraft {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        parent_id: Option<DepartmentId>,
    ) -> Result<Self, DepartmentDraftError> {
        let name = name.into().trim().to_owned();
        let code = code.into().trim().to_owned();
        if name.is_empty() {
            return Err(DepartmentDraftError::EmptyName);
        }
        if code.is_empty() {
            return Err(DepartmentDraftError::EmptyCode);
        }
        Ok(Self {
            name,
            code,
            description: None,
            level: DEFAULT_DEPARTMENT_LEVEL.to_owned(),
            parent_id,
        })
    }

    /// Blank values keep the current one.
    pub fn with_level(mut self, level: &str) -> Self {
        if !level.trim().is_empty() {
            self.level = level.trim().to_owned();
        }
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_owned());
        self
    }
}

/// Levels offered by [`DepartmentPicker`]: subdirección, jefatura and
/// departamento.
pub const PICKER_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PickerLevel {
    options: Vec<Department>,
    chosen: Option<DepartmentId>,
}

/// Cascading selector over the unit tree, one level at a time.
///
/// Choosing at a level clears every deeper level; the dependents of the new
/// choice are loaded separately and offered with [`DepartmentPicker::offer`].
/// The selection is the deepest chosen unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentPicker {
    levels: Vec<PickerLevel>,
}

/// Error returned when a choice does not match the offered options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error("level {level} is not open")]
    LevelNotOpen { level: usize },
    #[error("department {id} is not offered at level {level}")]
    NotOffered { level: usize, id: DepartmentId },
}

impl DepartmentPicker {
    /// Picker showing `roots` as the first level.
    pub fn new(roots: Vec<Department>) -> Self {
        Self {
            levels: vec![PickerLevel {
                options: roots,
                chosen: None,
            }],
        }
    }

    /// Number of levels currently shown.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn options(&self, level: usize) -> &[Department] {
        self.levels
            .get(level)
            .map_or(&[], |entry| entry.options.as_slice())
    }

    pub fn chosen(&self, level: usize) -> Option<DepartmentId> {
        self.levels.get(level).and_then(|entry| entry.chosen)
    }

    /// Deepest chosen unit.
    pub fn selected(&self) -> Option<DepartmentId> {
        self.levels.iter().rev().find_map(|entry| entry.chosen)
    }

    /// Choose `id` at `level`, or clear it with `None`.
    ///
    /// Returns the unit whose dependents should be loaded next, if any.
    pub fn choose(
        &mut self,
        level: usize,
        id: Option<DepartmentId>,
    ) -> Result<Option<DepartmentId>, PickerError> {
        let entry = self
            .levels
            .get_mut(level)
            .ok_or(PickerError::LevelNotOpen { level })?;
        if let Some(id) = id {
            if !entry.options.iter().any(|option| option.id == id) {
                return Err(PickerError::NotOffered { level, id });
            }
        }
        entry.chosen = id;
        self.levels.truncate(level + 1);
        Ok(id.filter(|_| level + 1 < PICKER_DEPTH))
    }

    /// Offer `children` below the choice at `parent_level`. An empty list
    /// opens nothing; a stale parent is ignored.
    pub fn offer(&mut self, parent_level: usize, parent: DepartmentId, children: Vec<Department>) {
        let current = self.chosen(parent_level);
        if current != Some(parent) || self.levels.len() != parent_level + 1 || children.is_empty() {
            return;
        }
        self.levels.push(PickerLevel {
            options: children,
            chosen: None,
        });
    }
}
