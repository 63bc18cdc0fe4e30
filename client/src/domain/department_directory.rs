//! Department lookups for selectors and the org-chart settings screen.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::department::{
    Department, DepartmentDraft, DepartmentDraftError, DepartmentPicker, PickerError,
};
use crate::domain::ports::{DepartmentsApi, DepartmentsApiError};
use crate::domain::{Action, Capabilities, DepartmentId, Error, Module, Session};

fn backend_failure(operation: &'static str, error: DepartmentsApiError) -> Error {
    warn!(operation, %error, "departments request failed");
    error.into()
}

fn picker_error(error: PickerError) -> Error {
    Error::invalid_request(error.to_string()).with_field("department_id", "Seleccione un área válida")
}

/// Read access to the unit tree, and unit creation for admins.
#[derive(Clone)]
pub struct DepartmentDirectory<A> {
    api: Arc<A>,
    capabilities: Arc<Capabilities>,
}

impl<A> DepartmentDirectory<A> {
    pub fn new(api: Arc<A>, capabilities: Arc<Capabilities>) -> Self {
        Self { api, capabilities }
    }
}

impl<A: DepartmentsApi> DepartmentDirectory<A> {
    /// Flat list for plain selectors.
    pub async fn all(&self, session: &Session) -> Result<Vec<Department>, Error> {
        self.capabilities
            .authorize(session, Module::Departments, Action::Read)?;
        self.api
            .list()
            .await
            .map_err(|error| backend_failure("list", error))
    }

    pub async fn tree(&self, session: &Session) -> Result<Vec<Department>, Error> {
        self.capabilities
            .authorize(session, Module::Departments, Action::Read)?;
        self.api
            .tree()
            .await
            .map_err(|error| backend_failure("tree", error))
    }

    /// Picker opened on the top-level units.
    pub async fn picker(&self, session: &Session) -> Result<DepartmentPicker, Error> {
        let roots = self.tree(session).await?;
        Ok(DepartmentPicker::new(
            roots
                .into_iter()
                .map(|root| Department {
                    children: Vec::new(),
                    ..root
                })
                .collect(),
        ))
    }

    /// Choose at `level` and open the next level with the dependents of the
    /// choice. Returns the unit now selected.
    pub async fn choose(
        &self,
        session: &Session,
        picker: &mut DepartmentPicker,
        level: usize,
        id: Option<DepartmentId>,
    ) -> Result<Option<DepartmentId>, Error> {
        self.capabilities
            .authorize(session, Module::Departments, Action::Read)?;
        if let Some(parent) = picker.choose(level, id).map_err(picker_error)? {
            let children = self
                .api
                .dependents(parent)
                .await
                .map_err(|error| backend_failure("dependents", error))?;
            picker.offer(level, parent, children);
        }
        Ok(picker.selected())
    }

    /// Add a unit under `parent_id`, or at the top level.
    pub async fn create(
        &self,
        session: &Session,
        name: &str,
        code: &str,
        parent_id: Option<DepartmentId>,
        level: &str,
    ) -> Result<DepartmentDraft, Error> {
        self.capabilities
            .authorize(session, Module::Departments, Action::Update)?;
        let draft = DepartmentDraft::new(name, code, parent_id)
            .map_err(|error| {
                let field = match error {
                    DepartmentDraftError::EmptyName => "name",
                    DepartmentDraftError::EmptyCode => "code",
                };
                Error::invalid_request(error.to_string()).with_field(field, "Campo obligatorio")
            })?
            .with_level(level);
        self.api
            .create(&draft)
            .await
            .map_err(|error| backend_failure("create", error))?;
        info!(code = %draft.code, parent = ?draft.parent_id, "department created");
        Ok(draft)
    }
}
