//! Outbound adapters implementing the domain ports.
//!
//! Adapters are thin translators between domain types and the backend's
//! wire format. They contain no business logic.

pub mod http;
