//! Coverage for the registration wizard rules.

use super::*;
use crate::domain::catalog::CatalogCategory;
use rstest::{fixture, rstest};
use serde_json::json;

const DEPT_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn ctx() -> ValidationContext {
    ValidationContext::new(NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"))
}

#[fixture]
fn draft() -> RegistrationDraft {
    RegistrationDraft {
        folio: "DG/2025/0031".to_owned(),
        official_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        reception_date: NaiveDate::from_ymd_opt(2025, 3, 10),
        doc_type: "Oficio".to_owned(),
        instruction: "Para su atención".to_owned(),
        deadline: NaiveDate::from_ymd_opt(2025, 3, 14),
        assigned_department_id: DEPT_ID.to_owned(),
        description: "Solicitud de información del ejercicio 2024".to_owned(),
        sender_name: "Mtra. López".to_owned(),
        sender_position: "Directora".to_owned(),
        sender_agency: "Secretaría de Finanzas".to_owned(),
        attachment: Some(Attachment::new(
            "oficio.pdf",
            ACCEPTED_CONTENT_TYPE,
            b"%PDF-1.7".to_vec(),
        )),
        ..RegistrationDraft::default()
    }
}

fn catalog_item(category: CatalogCategory, name: &str, metadata: serde_json::Value) -> CatalogItem {
    serde_json::from_value(json!({
        "id": name,
        "category": category,
        "name": name,
        "code": name.to_uppercase(),
        "metadata": metadata,
    }))
    .expect("catalog item parses")
}

fn failing_fields(result: Result<(), RegistrationErrors>) -> Vec<Field> {
    result
        .err()
        .map(|errors| errors.errors.into_iter().map(|error| error.field).collect())
        .unwrap_or_default()
}

#[rstest]
fn complete_draft_validates(draft: RegistrationDraft, ctx: ValidationContext) {
    let validated = draft.validate(&ctx).expect("draft is complete");
    assert_eq!(validated.folio.as_ref(), "DG/2025/0031");
    assert_eq!(validated.deadline, NaiveDate::from_ymd_opt(2025, 3, 14));
    assert!(validated.encryption_password.is_none());
    assert_eq!(validated.sender.kind, SenderType::Externo);
}

#[rstest]
fn empty_draft_reports_document_step_fields(ctx: ValidationContext) {
    let fields = failing_fields(RegistrationDraft::default().validate_step(RegistrationStep::Document, &ctx));
    assert_eq!(
        fields,
        [
            Field::Folio,
            Field::OfficialDate,
            Field::ReceptionDate,
            Field::DocType,
            Field::Instruction,
            Field::AssignedDepartment,
            Field::Description,
        ]
    );
}

#[rstest]
fn step_validation_ignores_other_steps(mut draft: RegistrationDraft, ctx: ValidationContext) {
    draft.sender_name.clear();
    draft.attachment = None;
    assert!(draft.validate_step(RegistrationStep::Document, &ctx).is_ok());
    assert_eq!(
        failing_fields(draft.validate_step(RegistrationStep::Sender, &ctx)),
        [Field::SenderName]
    );
}

#[rstest]
#[case("AB", false)]
#[case("ABC", true)]
#[case(" AB ", false)]
fn folio_bounds(mut draft: RegistrationDraft, ctx: ValidationContext, #[case] folio: &str, #[case] ok: bool) {
    draft.folio = folio.to_owned();
    assert_eq!(draft.validate_step(RegistrationStep::Document, &ctx).is_ok(), ok);
}

#[rstest]
fn reception_date_cannot_be_in_the_future(mut draft: RegistrationDraft, ctx: ValidationContext) {
    draft.reception_date = ctx.today.succ_opt();
    let errors = draft
        .validate_step(RegistrationStep::Document, &ctx)
        .expect_err("future date");
    let error = errors.for_field(Field::ReceptionDate).expect("field error");
    assert!(error.message.contains("futura"));
}

#[rstest]
fn short_description_is_rejected(mut draft: RegistrationDraft, ctx: ValidationContext) {
    draft.description = "Corto".to_owned();
    assert_eq!(
        failing_fields(draft.validate_step(RegistrationStep::Document, &ctx)),
        [Field::Description]
    );
}

#[rstest]
#[case(None)]
#[case(Some(Attachment::new("scan.png", "image/png", vec![0; 16])))]
#[case(Some(Attachment::new("big.pdf", ACCEPTED_CONTENT_TYPE, vec![0; MAX_ATTACHMENT_BYTES + 1])))]
fn attachment_rules(mut draft: RegistrationDraft, ctx: ValidationContext, #[case] attachment: Option<Attachment>) {
    draft.attachment = attachment;
    assert_eq!(
        failing_fields(draft.validate_step(RegistrationStep::Attachment, &ctx)),
        [Field::Attachment]
    );
}

#[rstest]
fn attachment_at_the_size_limit_is_accepted(mut draft: RegistrationDraft, ctx: ValidationContext) {
    draft.attachment = Some(Attachment::new(
        "max.pdf",
        ACCEPTED_CONTENT_TYPE,
        vec![0; MAX_ATTACHMENT_BYTES],
    ));
    assert!(draft.validate_step(RegistrationStep::Attachment, &ctx).is_ok());
}

#[rstest]
#[case(false, "", true)]
#[case(true, "abcd1234", true)]
#[case(true, "abc123", false)]
#[case(true, "abcd-234", false)]
#[case(true, "", false)]
fn encryption_password_rules(
    mut draft: RegistrationDraft,
    ctx: ValidationContext,
    #[case] encrypt: bool,
    #[case] password: &str,
    #[case] ok: bool,
) {
    draft.should_encrypt = encrypt;
    draft.password = EncryptionPassword::new(password);
    assert_eq!(draft.validate_step(RegistrationStep::Attachment, &ctx).is_ok(), ok);
}

#[rstest]
fn password_is_only_kept_when_encrypting(mut draft: RegistrationDraft, ctx: ValidationContext) {
    draft.password = EncryptionPassword::new("abcd1234");
    assert!(draft.validate(&ctx).expect("valid").encryption_password.is_none());

    draft.should_encrypt = true;
    let validated = draft.validate(&ctx).expect("valid");
    assert_eq!(
        validated.encryption_password.as_ref().map(EncryptionPassword::expose),
        Some("abcd1234")
    );
    assert!(!format!("{validated:?}").contains("abcd1234"));
}

#[rstest]
fn deadline_dropped_when_no_response_is_required(draft: RegistrationDraft, ctx: ValidationContext) {
    let circular = catalog_item(
        CatalogCategory::DocType,
        "Circular",
        json!({ "requires_response": false }),
    );
    let ctx = ctx.with_doc_type(Some(&circular));
    assert!(draft.validate(&ctx).expect("valid").deadline.is_none());
}

#[rstest]
fn instruction_sla_drives_the_deadline(mut draft: RegistrationDraft, ctx: ValidationContext) {
    let urgent = catalog_item(CatalogCategory::Instruction, "Urgente", json!({ "sla_days": 3 }));
    draft.apply_instruction(&urgent, ctx.today);
    assert_eq!(draft.instruction, "Urgente");
    assert_eq!(draft.deadline, NaiveDate::from_ymd_opt(2025, 3, 13));

    let archive = catalog_item(CatalogCategory::Instruction, "Archivo", json!({ "sla_days": 0 }));
    draft.apply_instruction(&archive, ctx.today);
    assert!(draft.deadline.is_none());

    draft.deadline = NaiveDate::from_ymd_opt(2025, 4, 1);
    let plain = catalog_item(CatalogCategory::Instruction, "Conocimiento", json!({}));
    draft.apply_instruction(&plain, ctx.today);
    assert_eq!(draft.deadline, NaiveDate::from_ymd_opt(2025, 4, 1));
}

#[rstest]
fn steps_walk_in_order() {
    let mut visited = vec![RegistrationStep::default()];
    while let Some(next) = visited.last().and_then(|step| step.next()) {
        visited.push(next);
    }
    assert_eq!(
        visited,
        [
            RegistrationStep::Document,
            RegistrationStep::Sender,
            RegistrationStep::Attachment,
        ]
    );
    assert_eq!(RegistrationStep::Sender.previous(), Some(RegistrationStep::Document));
}
