//! Domain types and business rules for the Amparo console.
//!
//! This crate has zero internal dependencies so the rules can be used by
//! the repository layer, the API, and any future tooling. Everything here
//! is pure: record in, record out, no I/O.

pub mod bank;
pub mod campaign;
pub mod dashboard;
pub mod document;
pub mod error;
pub mod event;
pub mod family;
pub mod location;
pub mod package;
pub mod settings;
pub mod types;
