use crate::error::{Error, Result};
use crate::model::{
    db::survey::Survey,
    mongodb::{Coll, Id},
};

/// Parse a raw path segment as an ID.
///
/// Failure is a field-level validation error (400), reported before any
/// repository access; `field` names the offending path parameter.
pub fn parse_id(param: &str, field: &str) -> Result<Id> {
    param
        .parse()
        .map_err(|_| Error::invalid_field(field, "Is not a valid ID"))
}

/// Fetch a survey by ID, or fail with a 404.
///
/// Point-in-time existence check: a concurrent delete between this check and
/// a later write is possible and tolerated.
pub async fn fetch_survey(surveys: &Coll<Survey>, id: Id) -> Result<Survey> {
    surveys
        .find_one(id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with ID '{id}'")))
}

/// Persist a mutated survey aggregate.
///
/// Whole-document replace: the survey is the consistency boundary, so
/// concurrent edits to the same survey are last-write-wins.
pub async fn store_survey(surveys: &Coll<Survey>, survey: &Survey) -> Result<()> {
    let result = surveys
        .replace_one(survey.id.as_doc(), survey, None)
        .await?;
    if result.matched_count == 0 {
        // Deleted between fetch and store.
        Err(Error::not_found(format!("Survey with ID '{}'", survey.id)))
    } else {
        Ok(())
    }
}
