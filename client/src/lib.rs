//! Client core for the document-tracking system.
//!
//! - [`domain`]: access gate, document lifecycle, rollups, inbox state and
//!   the services built on the driven ports.
//! - [`outbound`]: reqwest adapters for the REST backend.
//! - [`config`]: layered settings.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
