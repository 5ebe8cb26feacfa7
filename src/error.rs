use std::io::Cursor;

use log::{error, warn};
use rocket::{
    http::{ContentType, Status},
    response::{self, Responder, Response},
    serde::json::serde_json::json,
};
use thiserror::Error;

use crate::identity::IdentityError;
use crate::model::{api::validation::FieldError, common::survey::MutateError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// A validation failure for a single field.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<MutateError> for Error {
    fn from(err: MutateError) -> Self {
        match err {
            MutateError::QuestionNotFound(id) => {
                Error::not_found(format!("Question with ID '{id}'"))
            }
            MutateError::NotMultiple(_) => Error::invalid_field(
                "idQuestion",
                "Options can only be set on a MULTIPLE question",
            ),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    /// Map to the error taxonomy: validation failures are 400 with the full
    /// field list, missing documents are 404, everything unexpected is a 500
    /// with no internal detail leaked.
    fn respond_to(self, _req: &'r rocket::Request<'_>) -> response::Result<'o> {
        let (status, body) = match &self {
            Self::Validation(errors) => (Status::BadRequest, json!({ "errors": errors })),
            Self::NotFound(msg) => (Status::NotFound, json!({ "message": msg })),
            Self::Unauthorized(msg) => (Status::Unauthorized, json!({ "message": msg })),
            Self::Identity(IdentityError::Rejected) => (
                Status::Unauthorized,
                json!({ "message": self.to_string() }),
            ),
            Self::Db(_) | Self::Jwt(_) | Self::Identity(_) => (
                Status::InternalServerError,
                json!({ "message": "Internal server error" }),
            ),
        };

        if status.class().is_server_error() {
            error!("{self:?}");
        } else {
            warn!("{self}");
        }

        let body = body.to_string();
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
