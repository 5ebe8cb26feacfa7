use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A single question embedded in a survey.
///
/// Questions are not an independent aggregate: they only ever exist inside
/// their parent survey's `question` array and are persisted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the parent survey.
    pub id: Id,
    /// Question text.
    #[serde(rename = "titleQuestion")]
    pub title: String,
    /// Type-specific content; the `typeQuestion` tag decides which answer
    /// field exists, so a question can never carry both.
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Type-specific question content.
///
/// Wire names (`answerO`/`answerM`) follow the original API; the long forms
/// are accepted as input aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "typeQuestion")]
pub enum QuestionBody {
    /// Free-text question.
    #[serde(rename = "OPEN", alias = "QUESTION_OPEN")]
    Open {
        #[serde(
            rename = "answerO",
            alias = "answerOpen",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        answer: Option<String>,
    },
    /// Option-set question.
    #[serde(rename = "MULTIPLE", alias = "QUESTION_MULTIPLE")]
    Multiple {
        #[serde(rename = "answerM", alias = "answerMultiple", default)]
        answer: MultipleAnswer,
    },
}

/// Answer state of a MULTIPLE question: the option set and the selected value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleAnswer {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use super::*;

    #[test]
    fn type_tag_selects_answer_field() {
        let open = Question {
            id: Id::new(),
            title: "How was it?".to_string(),
            body: QuestionBody::Open {
                answer: Some("Great".to_string()),
            },
        };
        let json = serde_json::to_value(&open).unwrap();
        assert_eq!(json["typeQuestion"], "OPEN");
        assert_eq!(json["answerO"], "Great");
        assert!(json.get("answerM").is_none());

        let multiple = Question {
            id: Id::new(),
            title: "Pick one".to_string(),
            body: QuestionBody::Multiple {
                answer: MultipleAnswer {
                    options: vec!["a".to_string(), "b".to_string()],
                    answer: None,
                },
            },
        };
        let json = serde_json::to_value(&multiple).unwrap();
        assert_eq!(json["typeQuestion"], "MULTIPLE");
        assert_eq!(json["answerM"]["options"][1], "b");
        assert!(json.get("answerO").is_none());
    }

    #[test]
    fn accepts_long_form_aliases() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": Id::new().to_string(),
            "titleQuestion": "Legacy",
            "typeQuestion": "QUESTION_OPEN",
            "answerOpen": "yes",
        }))
        .unwrap();
        assert_eq!(
            question.body,
            QuestionBody::Open {
                answer: Some("yes".to_string())
            }
        );
    }
}
