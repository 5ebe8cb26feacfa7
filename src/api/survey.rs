use log::warn;
use mongodb::bson::doc;
use rocket::{
    futures::TryStreamExt,
    response::status::Created,
    serde::json::Json,
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::survey::{DeletedCount, SurveySpec, SurveyUpdate},
    db::survey::{NewSurvey, Survey},
    mongodb::{is_duplicate_key, Coll, Id},
};

use super::common::{fetch_survey, parse_id, store_survey};

pub fn routes() -> Vec<Route> {
    routes![
        get_surveys,
        get_survey,
        create_survey,
        update_survey,
        delete_survey,
        delete_all_surveys,
    ]
}

#[get("/surveys")]
async fn get_surveys(surveys: Coll<Survey>) -> Result<Json<Vec<Survey>>> {
    let all = surveys.find(None, None).await?.try_collect().await?;
    Ok(Json(all))
}

#[get("/survey/<id>")]
async fn get_survey(id: &str, surveys: Coll<Survey>) -> Result<Json<Survey>> {
    let id = parse_id(id, "id")?;
    let survey = fetch_survey(&surveys, id).await?;
    Ok(Json(survey))
}

#[post("/survey", data = "<spec>", format = "json")]
async fn create_survey(
    spec: Json<SurveySpec>,
    surveys: Coll<Survey>,
    new_surveys: Coll<NewSurvey>,
) -> Result<Created<Json<Survey>>> {
    let spec = spec.into_inner();
    spec.validate()?;
    ensure_title_unique(&surveys, &spec.title).await?;

    // The unique title index backstops the check above against
    // create/create races.
    let result = new_surveys
        .insert_one(NewSurvey::new(spec.into_survey()), None)
        .await;
    let new_id: Id = match result {
        Err(ref e) if is_duplicate_key(e) => {
            return Err(duplicate_title());
        }
        result => result?
            .inserted_id
            .as_object_id()
            .unwrap() // Valid because the ID comes directly from the DB.
            .into(),
    };

    // Read back the stored document so the response carries the assigned ID
    // and creation timestamp exactly as persisted.
    let survey = surveys
        .find_one(new_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with ID '{new_id}'")))?;
    Ok(Created::new(format!("/survey/{new_id}")).body(Json(survey)))
}

#[put("/survey/<id>", data = "<update>", format = "json")]
async fn update_survey(
    id: &str,
    update: Json<SurveyUpdate>,
    surveys: Coll<Survey>,
) -> Result<Json<Survey>> {
    let id = parse_id(id, "id")?;
    let update = update.into_inner();
    update.validate()?;

    let mut survey = fetch_survey(&surveys, id).await?;
    update.apply(&mut survey);
    // The unique title index rejects renaming onto another survey's title;
    // that is a validation failure, not a repository failure.
    match store_survey(&surveys, &survey).await {
        Err(Error::Db(ref e)) if is_duplicate_key(e) => {
            return Err(duplicate_title());
        }
        result => result?,
    }
    Ok(Json(survey))
}

#[delete("/survey/<id>")]
async fn delete_survey(id: &str, surveys: Coll<Survey>) -> Result<Json<Survey>> {
    let id = parse_id(id, "id")?;
    let survey = fetch_survey(&surveys, id).await?;
    surveys.delete_one(id.as_doc(), None).await?;
    Ok(Json(survey))
}

/// Bulk wipe, kept for operational and test use. Unguarded and destructive:
/// anyone who can reach the API can drop every survey.
#[delete("/survey")]
async fn delete_all_surveys(surveys: Coll<Survey>) -> Result<Json<DeletedCount>> {
    warn!("Deleting ALL surveys");
    let result = surveys.delete_many(doc! {}, None).await?;
    Ok(Json(DeletedCount {
        deleted: result.deleted_count,
    }))
}

/// The uniqueness check run on creation only: a survey with the same title
/// must not already exist.
async fn ensure_title_unique(surveys: &Coll<Survey>, title: &str) -> Result<()> {
    let existing = surveys
        .find_one(doc! { "titleSurvey": title }, None)
        .await?;
    if existing.is_some() {
        return Err(duplicate_title());
    }
    Ok(())
}

fn duplicate_title() -> Error {
    Error::invalid_field("titleSurvey", "titleSurvey already exists")
}
