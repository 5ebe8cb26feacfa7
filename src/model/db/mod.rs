//! Database-side types: documents as stored, with their `_id` fields.

pub mod survey;
pub mod user;
