//! Boundary parsing and derived-state coverage for documents.

use super::*;
use chrono::{TimeDelta, TimeZone};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const DOC_ID: &str = "8d1f3a0e-52c4-4a43-9a56-0c2d8f1b7e10";
const DEPT_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn payload() -> Value {
    json!({
        "id": DOC_ID,
        "official_number": "SEC/2025/0142",
        "description": "Solicitud de información presupuestal",
        "priority": "Urgente",
        "status": "EN_TRAMITE",
        "reception_date": "2025-03-01",
        "deadline": "2025-03-12T18:00:00Z",
        "assigned_department": { "id": DEPT_ID, "name": "Jurídico" },
        "sender_name": "Lic. Ramírez",
        "sender_dependency": "Tesorería",
        "is_encrypted": false
    })
}

#[rstest]
fn parses_backend_payload(payload: Value) {
    let document: Document = serde_json::from_value(payload).expect("payload should parse");

    assert_eq!(document.id.to_string(), DOC_ID);
    assert_eq!(document.official_number.as_ref(), "SEC/2025/0142");
    assert_eq!(document.priority, Priority::Urgente);
    assert_eq!(document.status, Status::EnProceso);
    assert_eq!(
        document.reception_date,
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().expect("valid")
    );
    assert_eq!(
        document.assigned_department_id.map(String::from).as_deref(),
        Some(DEPT_ID)
    );
    assert_eq!(document.assigned_department_name.as_deref(), Some("Jurídico"));
    assert!(document.attended_at.is_none());
}

#[rstest]
fn blank_optional_fields_are_absent(mut payload: Value) {
    payload["deadline"] = json!("");
    payload["sender_dependency"] = json!("  ");
    payload["priority"] = json!(null);
    let document: Document = serde_json::from_value(payload).expect("payload should parse");
    assert!(document.deadline.is_none());
    assert!(document.sender_dependency.is_none());
    assert_eq!(document.priority, Priority::Normal);
}

#[rstest]
#[case("id", json!("not-a-uuid"))]
#[case("official_number", json!("AB"))]
#[case("reception_date", json!("yesterday"))]
#[case("priority", json!("Alta"))]
#[case("status", json!("ARCHIVADO"))]
fn rejects_malformed_fields(mut payload: Value, #[case] field: &str, #[case] value: Value) {
    payload[field] = value;
    let result: Result<Document, _> = serde_json::from_value(payload);
    assert!(result.is_err(), "{field} should be rejected");
}

#[rstest]
#[case("abc", true)]
#[case("  ab  ", false)]
#[case("", false)]
fn folio_length_bounds(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(Folio::new(raw).is_ok(), ok);
    let longest = "F".repeat(FOLIO_MAX);
    assert!(Folio::new(longest.clone()).is_ok());
    assert!(Folio::new(format!("{longest}X")).is_err());
}

#[rstest]
fn time_status_tracks_the_deadline(payload: Value) {
    let document: Document = serde_json::from_value(payload).expect("payload should parse");
    let deadline = document.deadline.expect("deadline present");
    let threshold = DueSoonThreshold::default();

    assert_eq!(
        document.time_status(deadline - TimeDelta::days(5), threshold),
        TimeStatus::EnTiempo
    );
    assert_eq!(
        document.time_status(deadline - TimeDelta::days(1), threshold),
        TimeStatus::PorVencer
    );
    assert_eq!(
        document.time_status(deadline + TimeDelta::minutes(1), threshold),
        TimeStatus::Vencido
    );
}

#[rstest]
fn closed_documents_offer_no_actions(payload: Value) {
    let mut document: Document = serde_json::from_value(payload).expect("payload should parse");
    assert!(!document.is_closed());
    assert!(document.available_actions().contains(&DocumentAction::Attend));

    document.status = Status::Atendido;
    assert!(document.is_closed());
    assert!(document.available_actions().is_empty());
}

#[rstest]
fn serialises_back_to_wire_shape(payload: Value) {
    let document: Document = serde_json::from_value(payload).expect("payload should parse");
    let value = serde_json::to_value(&document).expect("serialise");
    assert_eq!(value["status"], "EN_PROCESO");
    assert_eq!(value["assigned_department"]["name"], "Jurídico");
    let back: Document = serde_json::from_value(value).expect("deserialise");
    assert_eq!(back, document);
}

#[rstest]
fn received_documents_start_pending() {
    let folio = Folio::new("OF-001").expect("valid folio");
    let received_at = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).single().expect("valid");
    let document = Document::received(folio, "Oficio de prueba", "Dirección", received_at);
    assert_eq!(document.status, Status::Pendiente);
    assert!(document.deadline.is_none());
}
