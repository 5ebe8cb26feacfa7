use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        survey::{AnswerPayload, OptionsPayload, QuestionSpec},
        validation::FieldErrors,
    },
    common::question::Question,
    db::survey::Survey,
    mongodb::Coll,
};

use super::common::{fetch_survey, parse_id, store_survey};

pub fn routes() -> Vec<Route> {
    routes![
        get_question,
        push_question,
        answer_question,
        replace_options,
        delete_question,
    ]
}

#[get("/survey/<id_survey>/<id_question>")]
async fn get_question(
    id_survey: &str,
    id_question: &str,
    surveys: Coll<Survey>,
) -> Result<Json<Question>> {
    let survey_id = parse_id(id_survey, "idSurvey")?;
    let question_id = parse_id(id_question, "idQuestion")?;

    let survey = fetch_survey(&surveys, survey_id).await?;
    let question = survey
        .question(question_id)
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))?;
    Ok(Json(question.clone()))
}

#[put("/push-question/<id_survey>", data = "<spec>", format = "json")]
async fn push_question(
    id_survey: &str,
    spec: Json<QuestionSpec>,
    surveys: Coll<Survey>,
) -> Result<Json<Survey>> {
    let survey_id = parse_id(id_survey, "idSurvey")?;
    let spec = spec.into_inner();
    let mut errors = FieldErrors::new();
    spec.validate("", &mut errors);
    errors.into_result()?;

    let mut survey = fetch_survey(&surveys, survey_id).await?;
    let (title, body) = spec.into_parts();
    survey.push_question(title, body);
    store_survey(&surveys, &survey).await?;
    Ok(Json(survey))
}

/// Answer a question: `answerO` for an OPEN question, `answerM.answer` for a
/// MULTIPLE one. Distinct from editing the question's definition.
#[put("/sub-question/<id>/<id_question>", data = "<payload>", format = "json")]
async fn answer_question(
    id: &str,
    id_question: &str,
    payload: Json<AnswerPayload>,
    surveys: Coll<Survey>,
) -> Result<Json<Survey>> {
    let survey_id = parse_id(id, "id")?;
    let question_id = parse_id(id_question, "idQuestion")?;
    let payload = payload.into_inner();
    payload.validate()?;

    let mut survey = fetch_survey(&surveys, survey_id).await?;
    survey.answer_question(question_id, payload.answer)?;
    store_survey(&surveys, &survey).await?;
    Ok(Json(survey))
}

/// Replace a MULTIPLE question's option set wholesale. Rejected with a
/// type-mismatch error on an OPEN question.
#[put(
    "/question/option/<id>/<id_question>",
    data = "<payload>",
    format = "json"
)]
async fn replace_options(
    id: &str,
    id_question: &str,
    payload: Json<OptionsPayload>,
    surveys: Coll<Survey>,
) -> Result<Json<Survey>> {
    let survey_id = parse_id(id, "id")?;
    let question_id = parse_id(id_question, "idQuestion")?;
    let options = payload
        .into_inner()
        .options
        .ok_or_else(|| Error::invalid_field("options", "options is required"))?;

    let mut survey = fetch_survey(&surveys, survey_id).await?;
    survey.replace_options(question_id, options)?;
    store_survey(&surveys, &survey).await?;
    Ok(Json(survey))
}

#[delete("/survey/<id_survey>/<id_question>")]
async fn delete_question(
    id_survey: &str,
    id_question: &str,
    surveys: Coll<Survey>,
) -> Result<Json<Survey>> {
    let survey_id = parse_id(id_survey, "idSurvey")?;
    let question_id = parse_id(id_question, "idQuestion")?;

    let mut survey = fetch_survey(&surveys, survey_id).await?;
    survey.remove_question(question_id)?;
    store_survey(&surveys, &survey).await?;
    Ok(Json(survey))
}
