//! Document action service: attend, reassign, reject and register.
//!
//! Every operation is checked locally before the backend is called: the
//! session must be signed in, the role must hold the capability, the
//! document's status must allow the action and the required free text must
//! be present. Port failures are mapped to [`Error`] and returned once.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{
    AttendRequest, DocumentsApi, DocumentsApiError, HistoryEntry, ReassignRequest,
    RegisteredDocument, RejectRequest,
};
use crate::domain::registration::{RegistrationDraft, RegistrationErrors, ValidationContext};
use crate::domain::{
    Action, Capabilities, Document, DocumentAction, DocumentId, Error, Module, Role, Session,
    Status,
};

/// Document actions guarded by the capability matrix and the lifecycle.
#[derive(Clone)]
pub struct DocumentActionsService<D> {
    api: Arc<D>,
    capabilities: Arc<Capabilities>,
}

impl<D> DocumentActionsService<D> {
    pub fn new(api: Arc<D>, capabilities: Arc<Capabilities>) -> Self {
        Self { api, capabilities }
    }

    fn authorize(&self, session: &Session, module: Module, action: Action) -> Result<Role, Error> {
        self.capabilities.authorize(session, module, action)
    }
}

fn require_text(value: &str, message: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::invalid_request(message))
    } else {
        Ok(())
    }
}

fn transition(document: &Document, action: DocumentAction) -> Result<Status, Error> {
    document
        .status
        .apply(action)
        .map_err(|error| Error::conflict(error.to_string()))
}

fn backend_failure(operation: &'static str, id: DocumentId, error: DocumentsApiError) -> Error {
    warn!(operation, document_id = %id, %error, "document action failed");
    error.into()
}

impl<D: DocumentsApi> DocumentActionsService<D> {
    /// Record a response. `EN_PROCESO` logs progress, `ATENDIDO` closes.
    ///
    /// Returns the status the document is in once the backend accepts.
    pub async fn attend(
        &self,
        session: &Session,
        document: &Document,
        request: AttendRequest,
    ) -> Result<Status, Error> {
        self.authorize(session, Module::Documents, Action::Approve)?;
        let next = match (request.outcome, document.status) {
            (Status::EnProceso, Status::EnProceso) => Status::EnProceso,
            (Status::EnProceso, _) => transition(document, DocumentAction::StartProcessing)?,
            (Status::Atendido, _) => transition(document, DocumentAction::Attend)?,
            (other, _) => {
                return Err(Error::invalid_request(format!(
                    "Estatus de respuesta no válido: {other}."
                )));
            }
        };
        require_text(&request.summary, "El resumen de respuesta es obligatorio.")?;

        self.api
            .attend(document.id, &request)
            .await
            .map_err(|error| backend_failure("attend", document.id, error))?;
        info!(document_id = %document.id, status = %next, "document attended");
        Ok(next)
    }

    /// Route the document to another department. The status is unchanged.
    pub async fn reassign(
        &self,
        session: &Session,
        document: &Document,
        request: ReassignRequest,
    ) -> Result<(), Error> {
        self.authorize(session, Module::Documents, Action::Approve)?;
        transition(document, DocumentAction::Reassign)?;
        require_text(&request.instruction, "La instrucción es obligatoria.")?;

        self.api
            .reassign(document.id, &request)
            .await
            .map_err(|error| backend_failure("reassign", document.id, error))?;
        info!(
            document_id = %document.id,
            target = %request.target_department_id,
            "document reassigned"
        );
        Ok(())
    }

    /// Reject the document back to its sender.
    pub async fn reject(
        &self,
        session: &Session,
        document: &Document,
        request: RejectRequest,
    ) -> Result<Status, Error> {
        self.authorize(session, Module::Documents, Action::Reject)?;
        let next = transition(document, DocumentAction::Reject)?;
        require_text(&request.reason, "El motivo de rechazo es obligatorio.")?;

        self.api
            .reject(document.id, &request)
            .await
            .map_err(|error| backend_failure("reject", document.id, error))?;
        info!(document_id = %document.id, "document rejected");
        Ok(next)
    }

    pub async fn history(&self, session: &Session, id: DocumentId) -> Result<Vec<HistoryEntry>, Error> {
        self.authorize(session, Module::Documents, Action::Read)?;
        self.api
            .history(id)
            .await
            .map_err(|error| backend_failure("history", id, error))
    }

    /// Validate the whole wizard and submit it.
    ///
    /// Field errors are returned as [`Error::invalid_request`] with the
    /// per-field messages under `details.fields`.
    pub async fn register(
        &self,
        session: &Session,
        draft: &RegistrationDraft,
        ctx: &ValidationContext,
    ) -> Result<RegisteredDocument, Error> {
        self.authorize(session, Module::Documents, Action::Create)?;
        let registration = draft.validate(ctx).map_err(field_errors)?;

        let registered = self.api.register(&registration).await.map_err(|error| {
            warn!(folio = %registration.folio, %error, "registration failed");
            Error::from(error)
        })?;
        info!(
            folio = %registration.folio,
            document_id = %registered.document_id,
            "document registered"
        );
        Ok(registered)
    }
}

fn field_errors(errors: RegistrationErrors) -> Error {
    errors.errors.iter().fold(
        Error::invalid_request(errors.to_string()),
        |error, field| error.with_field(field.field.as_str(), field.message.as_str()),
    )
}

#[cfg(test)]
#[path = "document_actions_tests.rs"]
mod tests;
