//! Driven port for the documents endpoints of the REST backend.
//!
//! The domain owns the request shapes; the adapter owns the wire binding
//! (paths, multipart layout, JSON field names).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::define_backend_error;
use crate::domain::registration::{Attachment, ValidatedRegistration};
use crate::domain::{DepartmentId, Document, DocumentId, Status};

/// Body of an attend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendRequest {
    /// Required response summary.
    pub summary: String,
    /// `EN_PROCESO` to record progress, `ATENDIDO` to close.
    pub outcome: Status,
    pub response_file: Option<Attachment>,
}

/// Body of a reassign request. The status is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignRequest {
    pub target_department_id: DepartmentId,
    pub instruction: String,
}

/// Body of a reject request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRequest {
    pub reason: String,
}

/// Identifier returned when a registration is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDocument {
    pub document_id: String,
}

/// One entry of a document's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

define_backend_error! {
    /// Errors surfaced by the documents endpoints.
    pub enum DocumentsApiError => "documents"
}

/// Port for reading and transitioning documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// Documents in the current user's scope.
    async fn inbox(&self) -> Result<Vec<Document>, DocumentsApiError>;

    /// Every document visible to the user.
    async fn list_all(&self) -> Result<Vec<Document>, DocumentsApiError>;

    /// Audit trail; an unknown document yields an empty list.
    async fn history(&self, id: DocumentId) -> Result<Vec<HistoryEntry>, DocumentsApiError>;

    /// Submit a validated registration.
    async fn register(
        &self,
        registration: &ValidatedRegistration,
    ) -> Result<RegisteredDocument, DocumentsApiError>;

    async fn attend(&self, id: DocumentId, request: &AttendRequest) -> Result<(), DocumentsApiError>;

    async fn reassign(
        &self,
        id: DocumentId,
        request: &ReassignRequest,
    ) -> Result<(), DocumentsApiError>;

    async fn reject(&self, id: DocumentId, request: &RejectRequest) -> Result<(), DocumentsApiError>;
}

/// Fixture implementation serving a fixed inbox and accepting every
/// transition.
#[derive(Debug, Clone, Default)]
pub struct FixtureDocumentsApi {
    pub documents: Vec<Document>,
}

#[async_trait]
impl DocumentsApi for FixtureDocumentsApi {
    async fn inbox(&self) -> Result<Vec<Document>, DocumentsApiError> {
        Ok(self.documents.clone())
    }

    async fn list_all(&self) -> Result<Vec<Document>, DocumentsApiError> {
        Ok(self.documents.clone())
    }

    async fn history(&self, _id: DocumentId) -> Result<Vec<HistoryEntry>, DocumentsApiError> {
        Ok(Vec::new())
    }

    async fn register(
        &self,
        _registration: &ValidatedRegistration,
    ) -> Result<RegisteredDocument, DocumentsApiError> {
        Ok(RegisteredDocument {
            document_id: DocumentId::random().to_string(),
        })
    }

    async fn attend(&self, _id: DocumentId, _request: &AttendRequest) -> Result<(), DocumentsApiError> {
        Ok(())
    }

    async fn reassign(
        &self,
        _id: DocumentId,
        _request: &ReassignRequest,
    ) -> Result<(), DocumentsApiError> {
        Ok(())
    }

    async fn reject(&self, _id: DocumentId, _request: &RejectRequest) -> Result<(), DocumentsApiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(DocumentsApiError::rejected(404_u16, "no existe"), ErrorCode::NotFound, "no existe")]
    #[case(DocumentsApiError::rejected(409_u16, "ya atendido"), ErrorCode::Conflict, "ya atendido")]
    #[case(DocumentsApiError::rejected(400_u16, "folio"), ErrorCode::InvalidRequest, "folio")]
    #[case(DocumentsApiError::unauthorized("expired"), ErrorCode::Unauthorized, "expired")]
    #[case(DocumentsApiError::timeout("30s"), ErrorCode::ServiceUnavailable, "30s")]
    #[case(DocumentsApiError::decode("bad json"), ErrorCode::InternalError, "bad json")]
    fn maps_into_domain_errors(
        #[case] error: DocumentsApiError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_serves_its_documents() {
        let api = FixtureDocumentsApi::default();
        assert!(api.inbox().await.expect("inbox").is_empty());
        assert!(api.history(DocumentId::random()).await.expect("history").is_empty());
    }

    #[rstest]
    fn registration_response_uses_camel_case() {
        let parsed: RegisteredDocument =
            serde_json::from_str(r#"{"documentId":"42"}"#).expect("parses");
        assert_eq!(parsed.document_id, "42");
    }
}
