//! Documents endpoints: listing, history, multipart registration and the
//! attend, reassign and reject transitions.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use super::client::{HttpFailure, RestClient, decode};
use crate::domain::ports::{
    AttendRequest, DocumentsApi, DocumentsApiError, HistoryEntry, ReassignRequest,
    RegisteredDocument, RejectRequest,
};
use crate::domain::registration::{Attachment, ValidatedRegistration};
use crate::domain::{Document, DocumentId};

/// Text parts of a registration, in submission order. The attachment is
/// added separately.
fn registration_fields(registration: &ValidatedRegistration) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("reception_date", registration.reception_date.to_string()),
        ("official_number", registration.folio.to_string()),
        ("official_date", registration.official_date.to_string()),
        ("sender_name", registration.sender.name.clone()),
        ("sender_position", registration.sender.position.clone()),
        ("sender_dependency", registration.sender.agency.clone()),
        ("description", registration.description.clone()),
        ("doc_type", registration.doc_type.clone()),
        ("priority", registration.priority.as_str().to_owned()),
        ("instruction", registration.instruction.clone()),
        (
            "assigned_department_id",
            registration.assigned_department_id.to_string(),
        ),
        (
            "shouldEncrypt",
            registration.encryption_password.is_some().to_string(),
        ),
    ];
    if let Some(password) = &registration.encryption_password {
        fields.push(("password", password.expose().to_owned()));
    }
    fields.push(("origin", registration.sender.kind.origin().to_owned()));
    if let Some(deadline) = registration.deadline {
        fields.push(("deadline", deadline.to_string()));
    }
    fields
}

fn file_part(attachment: &Attachment) -> Result<Part, HttpFailure> {
    Part::bytes(attachment.content.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.content_type)
        .map_err(|error| HttpFailure::Transport {
            message: format!("invalid attachment content type: {error}"),
        })
}

fn text_form(fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

impl RestClient {
    async fn fetch_documents(&self, path: &str) -> Result<Vec<Document>, HttpFailure> {
        let body = self.execute(self.request(Method::GET, path)?).await?;
        decode(&body, "document list")
    }

    async fn fetch_history(&self, id: DocumentId) -> Result<Vec<HistoryEntry>, HttpFailure> {
        let request = self.request(Method::GET, &format!("documents/{id}/history"))?;
        match self.execute(request).await {
            Ok(body) => decode(&body, "document history"),
            Err(HttpFailure::Rejected { status: 404, .. }) => Ok(Vec::new()),
            Err(failure) => Err(failure),
        }
    }

    async fn submit_registration(
        &self,
        registration: &ValidatedRegistration,
    ) -> Result<RegisteredDocument, HttpFailure> {
        let form = text_form(registration_fields(registration))
            .part("attachment", file_part(&registration.attachment)?);
        let request = self.request(Method::POST, "documents")?.multipart(form);
        let body = self.execute(request).await?;
        decode(&body, "registration")
    }

    async fn submit_attend(&self, id: DocumentId, request: &AttendRequest) -> Result<(), HttpFailure> {
        let mut form = text_form(vec![
            ("response_summary", request.summary.trim().to_owned()),
            ("status", request.outcome.as_str().to_owned()),
        ]);
        if let Some(file) = &request.response_file {
            form = form.part("response_file", file_part(file)?);
        }
        let builder = self
            .request(Method::PATCH, &format!("documents/{id}/attend"))?
            .multipart(form);
        self.execute(builder).await.map(drop)
    }

    async fn submit_json(&self, path: &str, body: serde_json::Value) -> Result<(), HttpFailure> {
        let builder = self.request(Method::PATCH, path)?.json(&body);
        self.execute(builder).await.map(drop)
    }
}

#[async_trait]
impl DocumentsApi for RestClient {
    async fn inbox(&self) -> Result<Vec<Document>, DocumentsApiError> {
        Ok(self.fetch_documents("documents/inbox").await?)
    }

    async fn list_all(&self) -> Result<Vec<Document>, DocumentsApiError> {
        Ok(self.fetch_documents("documents").await?)
    }

    async fn history(&self, id: DocumentId) -> Result<Vec<HistoryEntry>, DocumentsApiError> {
        Ok(self.fetch_history(id).await?)
    }

    async fn register(
        &self,
        registration: &ValidatedRegistration,
    ) -> Result<RegisteredDocument, DocumentsApiError> {
        Ok(self.submit_registration(registration).await?)
    }

    async fn attend(&self, id: DocumentId, request: &AttendRequest) -> Result<(), DocumentsApiError> {
        Ok(self.submit_attend(id, request).await?)
    }

    async fn reassign(
        &self,
        id: DocumentId,
        request: &ReassignRequest,
    ) -> Result<(), DocumentsApiError> {
        let body = json!({
            "target_department_id": request.target_department_id.to_string(),
            "instruction": request.instruction.trim(),
        });
        Ok(self.submit_json(&format!("documents/{id}/reassign"), body).await?)
    }

    async fn reject(&self, id: DocumentId, request: &RejectRequest) -> Result<(), DocumentsApiError> {
        let body = json!({ "rejection_reason": request.reason.trim() });
        Ok(self.submit_json(&format!("documents/{id}/reject"), body).await?)
    }
}
