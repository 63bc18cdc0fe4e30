//! Document registration wizard: draft state, step-scoped validation and
//! the validated payload handed to [`DocumentsApi::register`].
//!
//! Validation runs locally and never reaches the network. Errors are
//! field-scoped so the form can render them next to the offending input.
//!
//! [`DocumentsApi::register`]: crate::domain::ports::DocumentsApi::register

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use zeroize::Zeroizing;

use super::catalog::CatalogItem;
use super::document::{FOLIO_MAX, FOLIO_MIN, Folio, Priority};
use super::DepartmentId;

/// Largest accepted attachment (10 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;
/// Only PDFs are accepted.
pub const ACCEPTED_CONTENT_TYPE: &str = "application/pdf";
/// Minimum description length.
pub const DESCRIPTION_MIN: usize = 10;
/// Minimum length of each sender field.
pub const SENDER_FIELD_MIN: usize = 2;

static PASSWORD_RE: OnceLock<Regex> = OnceLock::new();

fn password_regex() -> &'static Regex {
    PASSWORD_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]{8}$")
            .unwrap_or_else(|error| panic!("password regex failed to compile: {error}"))
    })
}

/// Form fields, named as the form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Folio,
    OfficialDate,
    ReceptionDate,
    DocType,
    Priority,
    Instruction,
    Deadline,
    AssignedDepartment,
    Description,
    SenderName,
    SenderPosition,
    SenderAgency,
    Password,
    Attachment,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folio => "folio",
            Self::OfficialDate => "officialDate",
            Self::ReceptionDate => "receptionDate",
            Self::DocType => "docType",
            Self::Priority => "priority",
            Self::Instruction => "instruction",
            Self::Deadline => "deadline",
            Self::AssignedDepartment => "assigned_department_id",
            Self::Description => "description",
            Self::SenderName => "senderName",
            Self::SenderPosition => "senderPosition",
            Self::SenderAgency => "senderAgency",
            Self::Password => "password",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wizard pages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegistrationStep {
    /// General data: folio, dates, type, instruction, area, description.
    #[default]
    Document,
    /// Sender identity.
    Sender,
    /// Scanned file and optional encryption.
    Attachment,
}

impl RegistrationStep {
    /// Fields checked before leaving this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Document => &[
                Field::Folio,
                Field::OfficialDate,
                Field::ReceptionDate,
                Field::DocType,
                Field::Priority,
                Field::Instruction,
                Field::Deadline,
                Field::AssignedDepartment,
                Field::Description,
            ],
            Self::Sender => &[Field::SenderName, Field::SenderPosition, Field::SenderAgency],
            Self::Attachment => &[Field::Password, Field::Attachment],
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Document => Some(Self::Sender),
            Self::Sender => Some(Self::Attachment),
            Self::Attachment => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Document => None,
            Self::Sender => Some(Self::Document),
            Self::Attachment => Some(Self::Sender),
        }
    }
}

/// Origin of the correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderType {
    Interno,
    #[default]
    Externo,
}

impl SenderType {
    /// Value of the `origin` form part.
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Interno => "Interna",
            Self::Externo => "Externo",
        }
    }
}

/// Uploaded file.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Password used to encrypt the stored attachment. Redacted in `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EncryptionPassword(Zeroizing<String>);

impl EncryptionPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for EncryptionPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionPassword(<redacted>)")
    }
}

/// Validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field error found in one validation pass, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", errors.len())]
pub struct RegistrationErrors {
    pub errors: Vec<FieldError>,
}

impl RegistrationErrors {
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }
}

/// Facts validation needs from outside the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    /// From the selected document type's catalog metadata.
    pub requires_response: bool,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            requires_response: true,
        }
    }

    pub fn with_doc_type(mut self, doc_type: Option<&CatalogItem>) -> Self {
        self.requires_response = doc_type.is_none_or(CatalogItem::requires_response);
        self
    }
}

/// Mutable wizard state. Every field starts empty.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub folio: String,
    pub official_date: Option<NaiveDate>,
    pub reception_date: Option<NaiveDate>,
    pub doc_type: String,
    pub instruction: String,
    pub deadline: Option<NaiveDate>,
    pub priority: Priority,
    pub assigned_department_id: String,
    pub description: String,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub sender_position: String,
    pub sender_agency: String,
    pub should_encrypt: bool,
    pub password: EncryptionPassword,
    pub attachment: Option<Attachment>,
}

/// Sender block of a validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub kind: SenderType,
    pub name: String,
    pub position: String,
    pub agency: String,
}

/// Registration that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub folio: Folio,
    pub official_date: NaiveDate,
    pub reception_date: NaiveDate,
    pub doc_type: String,
    pub instruction: String,
    /// `None` when the document type needs no response.
    pub deadline: Option<NaiveDate>,
    pub priority: Priority,
    pub assigned_department_id: DepartmentId,
    pub description: String,
    pub sender: Sender,
    /// Present only when encryption was requested.
    pub encryption_password: Option<EncryptionPassword>,
    pub attachment: Attachment,
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

impl RegistrationDraft {
    /// Apply an instruction's SLA to the deadline: a positive SLA sets it,
    /// a non-positive one clears it, no SLA leaves it alone.
    pub fn apply_instruction(&mut self, instruction: &CatalogItem, today: NaiveDate) {
        self.instruction = instruction.name.clone();
        if instruction.sla_days().is_some() {
            self.deadline = instruction.suggested_deadline(today);
        }
    }

    fn check(&self, field: Field, ctx: &ValidationContext) -> Option<FieldError> {
        let fail = |message: &str| Some(FieldError::new(field, message));
        match field {
            Field::Folio => {
                let length = char_len(&self.folio);
                if length < FOLIO_MIN {
                    fail("El folio debe tener al menos 3 caracteres")
                } else if length > FOLIO_MAX {
                    fail("El folio no puede exceder 50 caracteres")
                } else {
                    None
                }
            }
            Field::OfficialDate => self
                .official_date
                .is_none()
                .then(|| FieldError::new(field, "La fecha del oficio es obligatoria")),
            Field::ReceptionDate => match self.reception_date {
                None => fail("La fecha de recepción es obligatoria"),
                Some(date) if date > ctx.today => fail("La fecha de recepción no puede ser futura"),
                Some(_) => None,
            },
            Field::DocType => self
                .doc_type
                .trim()
                .is_empty()
                .then(|| FieldError::new(field, "Seleccione el tipo de documento")),
            Field::Instruction => self
                .instruction
                .trim()
                .is_empty()
                .then(|| FieldError::new(field, "Seleccione una instrucción válida")),
            Field::AssignedDepartment => {
                if self.assigned_department_id.trim().is_empty() {
                    fail("Debe asignar un área responsable")
                } else if DepartmentId::new(&self.assigned_department_id).is_err() {
                    fail("El área seleccionada no es válida")
                } else {
                    None
                }
            }
            Field::Description => (char_len(&self.description) < DESCRIPTION_MIN).then(|| {
                FieldError::new(field, "La descripción debe tener al menos 10 caracteres")
            }),
            Field::SenderName => (char_len(&self.sender_name) < SENDER_FIELD_MIN)
                .then(|| FieldError::new(field, "El nombre del remitente es obligatorio")),
            Field::SenderPosition => (char_len(&self.sender_position) < SENDER_FIELD_MIN)
                .then(|| FieldError::new(field, "El cargo es obligatorio")),
            Field::SenderAgency => (char_len(&self.sender_agency) < SENDER_FIELD_MIN)
                .then(|| FieldError::new(field, "La dependencia es obligatoria")),
            Field::Password => {
                let invalid = self.should_encrypt && !password_regex().is_match(self.password.expose());
                invalid.then(|| FieldError::new(field, "Debe tener 8 caracteres letras/números"))
            }
            Field::Attachment => match &self.attachment {
                None => fail("Debe adjuntar el oficio escaneado (PDF)"),
                Some(file) if file.size() > MAX_ATTACHMENT_BYTES => fail("El tamaño máximo es 10MB"),
                Some(file) if file.content_type != ACCEPTED_CONTENT_TYPE => {
                    fail("Solo se aceptan archivos PDF (.pdf)")
                }
                Some(_) => None,
            },
            // Priority is a closed enum and the deadline is optional.
            Field::Priority | Field::Deadline => None,
        }
    }

    fn check_all<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a Field>,
        ctx: &ValidationContext,
    ) -> Result<(), RegistrationErrors> {
        let errors: Vec<FieldError> = fields
            .into_iter()
            .filter_map(|field| self.check(*field, ctx))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistrationErrors { errors })
        }
    }

    /// Check only the fields shown on `step`.
    pub fn validate_step(
        &self,
        step: RegistrationStep,
        ctx: &ValidationContext,
    ) -> Result<(), RegistrationErrors> {
        self.check_all(step.fields(), ctx)
    }

    /// Check every field and build the submission payload.
    pub fn validate(&self, ctx: &ValidationContext) -> Result<ValidatedRegistration, RegistrationErrors> {
        let all = [
            RegistrationStep::Document,
            RegistrationStep::Sender,
            RegistrationStep::Attachment,
        ];
        self.check_all(all.iter().flat_map(RegistrationStep::fields), ctx)?;
        self.build(ctx).ok_or_else(|| RegistrationErrors {
            errors: vec![FieldError::new(Field::Attachment, "Formulario incompleto")],
        })
    }

    fn build(&self, ctx: &ValidationContext) -> Option<ValidatedRegistration> {
        Some(ValidatedRegistration {
            folio: Folio::new(self.folio.clone()).ok()?,
            official_date: self.official_date?,
            reception_date: self.reception_date?,
            doc_type: self.doc_type.trim().to_owned(),
            instruction: self.instruction.trim().to_owned(),
            deadline: self.deadline.filter(|_| ctx.requires_response),
            priority: self.priority,
            assigned_department_id: DepartmentId::new(&self.assigned_department_id).ok()?,
            description: self.description.trim().to_owned(),
            sender: Sender {
                kind: self.sender_type,
                name: self.sender_name.trim().to_owned(),
                position: self.sender_position.trim().to_owned(),
                agency: self.sender_agency.trim().to_owned(),
            },
            encryption_password: self.should_encrypt.then(|| self.password.clone()),
            attachment: self.attachment.clone()?,
        })
    }
}

#[cfg(test)]
mod tests;
