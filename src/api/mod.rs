use rocket::Route;

mod auth;
mod common;
mod question;
mod survey;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(survey::routes());
    routes.extend(question::routes());
    routes.extend(auth::routes());
    routes
}
