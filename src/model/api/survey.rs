//! Request payloads for the survey endpoints.
//!
//! All fields are given serde defaults so that a missing field reaches the
//! validation layer (and gets reported per-field) instead of failing JSON
//! deserialization with an opaque 422.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::common::{
    question::{MultipleAnswer, QuestionBody},
    survey::SurveyCore,
};

use super::validation::FieldErrors;

/// A survey creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySpec {
    #[serde(rename = "titleSurvey", default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "question", default)]
    pub questions: Vec<QuestionSpec>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl SurveySpec {
    /// Check all fields at once, reporting every failure.
    /// Title uniqueness is a separate, repository-backed check.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        errors.require("titleSurvey", &self.title);
        errors.require("description", &self.description);
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(&format!("question[{index}]."), &mut errors);
        }
        errors.into_result()
    }

    /// Convert into a survey core with freshly assigned question IDs.
    /// Call only after [`validate`](Self::validate) has passed.
    pub fn into_survey(self) -> SurveyCore {
        let mut survey = SurveyCore::new(self.title, self.description, self.active);
        for question in self.questions {
            let (title, body) = question.into_parts();
            survey.push_question(title, body);
        }
        survey
    }
}

/// A question creation payload, as embedded in [`SurveySpec`] or posted to
/// the push-question endpoint.
///
/// The type tag is kept as a raw string so an absent or unknown tag becomes a
/// field error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    #[serde(rename = "titleQuestion", default)]
    pub title: String,
    #[serde(rename = "typeQuestion", default)]
    pub question_type: String,
    #[serde(
        rename = "answerO",
        alias = "answerOpen",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub answer_open: Option<String>,
    #[serde(
        rename = "answerM",
        alias = "answerMultiple",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub answer_multiple: Option<MultipleAnswer>,
}

impl QuestionSpec {
    /// Register this question's field failures under the given field prefix
    /// (e.g. `question[2].` for embedded specs, empty for push-question).
    pub fn validate(&self, prefix: &str, errors: &mut FieldErrors) {
        if self.title.trim().is_empty() {
            errors.push(&format!("{prefix}titleQuestion"), "titleQuestion is required");
        }
        match self.question_type.as_str() {
            "" => errors.push(&format!("{prefix}typeQuestion"), "typeQuestion is required"),
            "OPEN" | "QUESTION_OPEN" | "MULTIPLE" | "QUESTION_MULTIPLE" => {}
            _ => errors.push(
                &format!("{prefix}typeQuestion"),
                "typeQuestion must be OPEN or MULTIPLE",
            ),
        }
    }

    /// Split into question title and body.
    /// Call only after [`validate`](Self::validate) has passed; an unknown
    /// tag falls back to OPEN.
    pub fn into_parts(self) -> (String, QuestionBody) {
        let body = match self.question_type.as_str() {
            "MULTIPLE" | "QUESTION_MULTIPLE" => QuestionBody::Multiple {
                answer: self.answer_multiple.unwrap_or_default(),
            },
            _ => QuestionBody::Open {
                answer: self.answer_open,
            },
        };
        (self.title, body)
    }
}

/// A survey update payload: top-level fields only, questions are untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyUpdate {
    #[serde(rename = "titleSurvey", default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl SurveyUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        errors.require("titleSurvey", &self.title);
        errors.require("description", &self.description);
        errors.into_result()
    }

    /// Overwrite the survey's top-level fields, leaving `createdAt` and the
    /// embedded questions untouched.
    pub fn apply(self, survey: &mut SurveyCore) {
        survey.title = self.title;
        survey.description = self.description;
        if let Some(active) = self.active {
            survey.active = active;
        }
    }
}

/// Payload for answering a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub answer: String,
}

impl AnswerPayload {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        errors.require("answer", &self.answer);
        errors.into_result()
    }
}

/// Payload for replacing a MULTIPLE question's option set. The field is
/// optional at the serde level so its absence surfaces as a field error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsPayload {
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Response body for the bulk delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedCount {
    pub deleted: u64,
}
