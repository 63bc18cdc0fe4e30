//! Test utilities for the client crate.
//!
//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccessToken, AuthContext, DepartmentId, Document, Email, Folio, Priority, Role, Session,
    Status, User, UserId,
};

/// Fixed instant used across suites: 2025-03-10T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixed timestamp is valid"),
    }
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A signed-in user with `role`.
pub fn user_with_role(role: Role) -> User {
    let email = match Email::new(format!("{}@example.gob.mx", role.as_str().to_lowercase())) {
        Ok(email) => email,
        Err(error) => panic!("fixture email: {error}"),
    };
    match User::new(UserId::new(1), format!("Usuario {role}"), email, role) {
        Ok(user) => user,
        Err(error) => panic!("fixture user: {error}"),
    }
}

/// A session signed in with `role`.
pub fn session_with_role(role: Role) -> Session {
    let Some(token) = AccessToken::new(format!("token-{role}")) else {
        panic!("fixture token is not blank");
    };
    let mut session = Session::anonymous();
    session.sign_in(AuthContext::new(token, user_with_role(role)));
    session
}

/// Department id used by fixtures.
pub fn fixture_department_id() -> DepartmentId {
    match DepartmentId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6") {
        Ok(id) => id,
        Err(error) => panic!("fixture department: {error}"),
    }
}

/// Builder for [`Document`] fixtures.
#[derive(Debug, Clone)]
pub struct DocumentBuilder(Document);

/// Start a document in `status`, received at [`fixed_now`].
pub fn document(status: Status) -> DocumentBuilder {
    let folio = match Folio::new("OF/2025/001") {
        Ok(folio) => folio,
        Err(error) => panic!("fixture folio: {error}"),
    };
    let mut inner = Document::received(folio, "Oficio de prueba", "Remitente", fixed_now());
    inner.status = status;
    DocumentBuilder(inner)
}

impl DocumentBuilder {
    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    /// Deadline relative to [`fixed_now`].
    pub fn due_in(self, delta: TimeDelta) -> Self {
        self.deadline(fixed_now() + delta)
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.0.reception_date = at;
        self
    }

    pub fn attended_at(mut self, at: DateTime<Utc>) -> Self {
        self.0.attended_at = Some(at);
        self
    }

    pub fn department(mut self, name: &str) -> Self {
        self.0.assigned_department_id = Some(fixture_department_id());
        self.0.assigned_department_name = Some(name.to_owned());
        self
    }

    pub fn sender_dependency(mut self, agency: &str) -> Self {
        self.0.sender_dependency = Some(agency.to_owned());
        self
    }

    pub fn urgent(mut self) -> Self {
        self.0.priority = Priority::Urgente;
        self
    }

    pub fn build(self) -> Document {
        self.0
    }
}
