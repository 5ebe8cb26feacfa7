//! Types shared between the API and database layers.

pub mod question;
pub mod survey;
