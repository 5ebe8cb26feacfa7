//! API-side types: request payloads, validation, and auth tokens.
//!
//! Serialised in an API-friendly way, e.g. IDs as hex strings.

pub mod auth;
pub mod survey;
pub mod validation;
