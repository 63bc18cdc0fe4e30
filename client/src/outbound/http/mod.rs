//! Reqwest adapters for the REST backend.
//!
//! One [`RestClient`] implements every driven port. Adapters own the wire
//! binding only: paths, multipart layout, JSON field names and the mapping
//! of HTTP failures into port errors.

mod auth;
mod catalogs;
mod client;
mod departments;
mod documents;
mod holidays;
mod users;

pub use client::RestClient;
