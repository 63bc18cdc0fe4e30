//! Domain primitives, rules and services.
//!
//! Purpose: model the document-tracking client without any transport
//! concern. Types are validated at construction; wire payloads are parsed
//! through DTOs so unknown statuses or roles never leak inward.
//!
//! Public surface:
//! - Access gate (`RoutePermissions`, `guard_route`, `standard_menu`).
//! - Document lifecycle (`Document`, `Status`, `TimeStatus`).
//! - Rollups (`summarize`, `aggregate`), inbox state (`InboxView`).
//! - Services over the driven ports in [`ports`]: document actions, the
//!   department directory and the catalog, user and holiday admin screens.

pub mod access;
pub mod auth;
pub mod capabilities;
pub mod catalog;
pub mod catalog_admin;
pub mod department;
pub mod department_directory;
pub mod document;
pub mod document_actions;
pub mod error;
pub mod holiday;
pub mod holiday_admin;
pub mod inbox;
pub mod notification;
pub mod ports;
pub mod registration;
pub mod role;
pub mod stats;
pub mod user;
pub mod user_admin;

pub use self::access::{
    MenuItem, ParseUnlistedRoutePolicyError, RouteDecision, RoutePermissions, RuleError,
    UnlistedRoutePolicy, guard_route, standard_menu,
};
pub use self::auth::{AccessToken, AuthContext, LoginCredentials, LoginValidationError, Session};
pub use self::capabilities::{Action, Capabilities, Capability, Module};
pub use self::catalog::{
    CatalogCategory, CatalogItem, CatalogItemDraft, CatalogItemPatch, CatalogValidationError,
    ParseCatalogCategoryError, active_in_order, next_order,
};
pub use self::catalog_admin::{CatalogAdminService, metadata_from_text};
pub use self::department::{
    DEFAULT_DEPARTMENT_LEVEL, Department, DepartmentDraft, DepartmentDraftError, DepartmentId,
    DepartmentIdError, DepartmentPicker, DepartmentRef, PICKER_DEPTH, PickerError, flatten_tree,
};
pub use self::department_directory::DepartmentDirectory;
pub use self::document::{
    DEFAULT_DUE_SOON_DAYS, Document, DocumentAction, DocumentId, DocumentValidationError,
    DueSoonThreshold, Folio, ParseStatusError, Priority, Status, TimeStatus, TransitionError,
    compute_time_status, days_remaining,
};
pub use self::document_actions::DocumentActionsService;
pub use self::error::{CONNECTION_MESSAGE, Error, ErrorCode};
pub use self::holiday::{EmptyDescription, Holiday, HolidayCalendar, HolidayDraft, HolidayId};
pub use self::holiday_admin::HolidayAdminService;
pub use self::inbox::{
    InboxCounts, InboxFilter, InboxService, InboxTab, InboxView, ParseInboxTabError,
    RefreshOutcome, RefreshTicket,
};
pub use self::notification::{Notification, NotificationKind};
pub use self::role::{ParseRoleError, Role};
pub use self::stats::{KpiSummary, Rollup, RollupOptions, aggregate, status_distribution, summarize};
pub use self::user::{
    Email, User, UserDraft, UserId, UserPatch, UserStatus, UserValidationError,
};
pub use self::user_admin::{UserAdminService, user_field_error};
