use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::mongodb::{serde_bson_datetime, Id};

use super::question::{Question, QuestionBody};

/// Core survey data, as stored in the database: top-level metadata plus the
/// embedded, ordered question sequence.
///
/// The survey is the unit of persistence: every question mutation goes
/// through "load aggregate, apply a pure mutation here, write the whole
/// document back". Consistency under concurrent edits is therefore whatever
/// single-document replace atomicity gives (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyCore {
    /// Survey title, unique across all surveys.
    #[serde(rename = "titleSurvey")]
    pub title: String,
    /// Survey description.
    pub description: String,
    /// Embedded questions; insertion order is display order.
    #[serde(rename = "question", default)]
    pub questions: Vec<Question>,
    /// Set at creation, immutable afterwards.
    #[serde(rename = "createdAt", with = "serde_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Whether the survey is currently active.
    pub active: bool,
}

/// Errors from mutating the embedded question sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutateError {
    #[error("No question found with ID '{0}'")]
    QuestionNotFound(Id),
    #[error("Question with ID '{0}' is not a MULTIPLE question")]
    NotMultiple(Id),
}

impl SurveyCore {
    /// A new survey with no questions, created now.
    ///
    /// The creation time is truncated to millisecond precision, matching what
    /// the store keeps, so a survey compares equal across a round trip.
    pub fn new(title: String, description: String, active: bool) -> Self {
        Self {
            title,
            description,
            questions: Vec::new(),
            created_at: mongodb::bson::DateTime::now().to_chrono(),
            active,
        }
    }

    /// Look up a question by ID. Linear scan; surveys hold at most a few
    /// dozen questions.
    pub fn question(&self, id: Id) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    fn question_mut(&mut self, id: Id) -> Result<&mut Question, MutateError> {
        self.questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or(MutateError::QuestionNotFound(id))
    }

    /// Append a question with a freshly assigned ID, returning that ID.
    /// Existing questions keep their identity and order.
    pub fn push_question(&mut self, title: String, body: QuestionBody) -> Id {
        let id = Id::new();
        self.questions.push(Question { id, title, body });
        id
    }

    /// Record an answer to the given question: `answerO` for an OPEN
    /// question, `answerM.answer` for a MULTIPLE one. Title, type and
    /// options are left untouched.
    pub fn answer_question(&mut self, id: Id, answer: String) -> Result<(), MutateError> {
        let question = self.question_mut(id)?;
        match &mut question.body {
            QuestionBody::Open { answer: open } => *open = Some(answer),
            QuestionBody::Multiple { answer: multiple } => multiple.answer = Some(answer),
        }
        Ok(())
    }

    /// Replace a MULTIPLE question's option set wholesale.
    ///
    /// Rejected on an OPEN question; writing options onto one would leave
    /// the document claiming to be OPEN while carrying MULTIPLE state.
    pub fn replace_options(&mut self, id: Id, options: Vec<String>) -> Result<(), MutateError> {
        let question = self.question_mut(id)?;
        match &mut question.body {
            QuestionBody::Multiple { answer } => {
                answer.options = options;
                Ok(())
            }
            QuestionBody::Open { .. } => Err(MutateError::NotMultiple(id)),
        }
    }

    /// Remove the question with the given ID, closing the gap. Remaining
    /// questions keep their relative order.
    pub fn remove_question(&mut self, id: Id) -> Result<Question, MutateError> {
        let index = self
            .questions
            .iter()
            .position(|question| question.id == id)
            .ok_or(MutateError::QuestionNotFound(id))?;
        Ok(self.questions.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::common::question::MultipleAnswer;

    use super::*;

    fn example() -> SurveyCore {
        let mut survey = SurveyCore::new(
            "Tech stack 2022".to_string(),
            "Which technologies do you use?".to_string(),
            true,
        );
        survey.push_question(
            "What is your favourite language?".to_string(),
            QuestionBody::Open { answer: None },
        );
        survey.push_question(
            "Which editor do you use?".to_string(),
            QuestionBody::Multiple {
                answer: MultipleAnswer {
                    options: vec!["vim".to_string(), "emacs".to_string()],
                    answer: None,
                },
            },
        );
        survey
    }

    #[test]
    fn push_appends_and_preserves_siblings() {
        let mut survey = example();
        let before = survey.questions.clone();

        let id = survey.push_question("New question".to_string(), QuestionBody::Open {
            answer: None,
        });

        assert_eq!(survey.questions.len(), before.len() + 1);
        assert_eq!(&survey.questions[..before.len()], &before[..]);
        let pushed = survey.question(id).unwrap();
        assert_eq!(pushed.title, "New question");
        assert_eq!(survey.questions.last().unwrap().id, id);
    }

    #[test]
    fn answer_open_only_touches_answer() {
        let mut survey = example();
        let id = survey.questions[0].id;
        let title = survey.questions[0].title.clone();

        survey
            .answer_question(id, "Rust".to_string())
            .unwrap();

        let question = survey.question(id).unwrap();
        assert_eq!(question.title, title);
        assert_eq!(
            question.body,
            QuestionBody::Open {
                answer: Some("Rust".to_string())
            }
        );
        // Sibling untouched.
        assert_eq!(
            survey.questions[1].body,
            example().questions[1].body.clone()
        );
    }

    #[test]
    fn answer_multiple_keeps_options() {
        let mut survey = example();
        let id = survey.questions[1].id;

        survey.answer_question(id, "vim".to_string()).unwrap();

        match &survey.questions[1].body {
            QuestionBody::Multiple { answer } => {
                assert_eq!(answer.answer.as_deref(), Some("vim"));
                assert_eq!(answer.options, vec!["vim", "emacs"]);
            }
            other => panic!("Unexpected body: {other:?}"),
        }
    }

    #[test]
    fn replace_options_is_wholesale() {
        let mut survey = example();
        let id = survey.questions[1].id;
        let options = vec!["vscode".to_string(), "helix".to_string()];

        survey.replace_options(id, options.clone()).unwrap();

        match &survey.questions[1].body {
            QuestionBody::Multiple { answer } => assert_eq!(answer.options, options),
            other => panic!("Unexpected body: {other:?}"),
        }
    }

    #[test]
    fn replace_options_rejects_open_question() {
        let mut survey = example();
        let id = survey.questions[0].id;
        let before = survey.clone();

        let result = survey.replace_options(id, vec!["a".to_string()]);

        assert_eq!(result, Err(MutateError::NotMultiple(id)));
        assert_eq!(survey, before);
    }

    #[test]
    fn remove_closes_the_gap() {
        let mut survey = example();
        let extra = survey.push_question("Third".to_string(), QuestionBody::Open { answer: None });
        let first = survey.questions[0].clone();
        let removed_id = survey.questions[1].id;

        let removed = survey.remove_question(removed_id).unwrap();

        assert_eq!(removed.id, removed_id);
        assert_eq!(survey.questions.len(), 2);
        assert_eq!(survey.questions[0], first);
        assert_eq!(survey.questions[1].id, extra);
    }

    #[test]
    fn dangling_ids_are_reported() {
        let mut survey = example();
        let missing = Id::new();

        assert!(survey.question(missing).is_none());
        assert_eq!(
            survey.answer_question(missing, "x".to_string()),
            Err(MutateError::QuestionNotFound(missing))
        );
        assert_eq!(
            survey.replace_options(missing, vec![]),
            Err(MutateError::QuestionNotFound(missing))
        );
        assert_eq!(
            survey.remove_question(missing),
            Err(MutateError::QuestionNotFound(missing))
        );
    }
}
