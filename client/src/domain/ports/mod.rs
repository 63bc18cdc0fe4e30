//! Driven ports for the REST backend.

mod macros;
pub(crate) use macros::define_backend_error;

mod auth_api;
mod catalogs_api;
mod departments_api;
mod documents_api;
mod holidays_api;
mod users_api;

#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::{AuthApi, AuthApiError, FixtureAuthApi};
#[cfg(test)]
pub use catalogs_api::MockCatalogsApi;
pub use catalogs_api::{CatalogsApi, CatalogsApiError, FixtureCatalogsApi};
#[cfg(test)]
pub use documents_api::MockDocumentsApi;
pub use documents_api::{
    AttendRequest, DocumentsApi, DocumentsApiError, FixtureDocumentsApi, HistoryEntry,
    ReassignRequest, RegisteredDocument, RejectRequest,
};
#[cfg(test)]
pub use departments_api::MockDepartmentsApi;
pub use departments_api::{DepartmentsApi, DepartmentsApiError, FixtureDepartmentsApi};
#[cfg(test)]
pub use holidays_api::MockHolidaysApi;
pub use holidays_api::{FixtureHolidaysApi, HolidaysApi, HolidaysApiError};
#[cfg(test)]
pub use users_api::MockUsersApi;
pub use users_api::{FixtureUsersApi, UsersApi, UsersApiError};
