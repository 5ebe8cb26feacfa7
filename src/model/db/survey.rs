use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::{common::survey::SurveyCore, mongodb::Id};

/// A survey from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub survey: SurveyCore,
}

impl Deref for Survey {
    type Target = SurveyCore;

    fn deref(&self) -> &Self::Target {
        &self.survey
    }
}

impl DerefMut for Survey {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.survey
    }
}

/// A survey ready for insertion: identical to [`Survey`] minus the ID, which
/// the database assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewSurvey(pub SurveyCore);

impl NewSurvey {
    pub fn new(survey: SurveyCore) -> Self {
        Self(survey)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use crate::model::common::question::{MultipleAnswer, QuestionBody};

    use super::*;

    impl SurveyCore {
        pub fn example() -> Self {
            let mut survey = SurveyCore::new(
                "Tech stack 2022".to_string(),
                "Which technologies do developers actually use?".to_string(),
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
    }

    impl Survey {
        pub fn example() -> Self {
            Self {
                id: Id::new(),
                survey: SurveyCore::example(),
            }
        }
    }
}
