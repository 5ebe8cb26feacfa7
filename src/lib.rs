#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod model;

pub use config::Config;

/// Assemble the server: all routes plus the ignite-time fairings that load
/// config, connect to the database, and set up the identity provider.
pub fn rocket() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(config::ConfigFairing)
        .attach(config::DatabaseFairing)
        .attach(config::IdentityFairing)
        .attach(logging::LoggerFairing)
}

/// Get a database client for testing.
#[cfg(test)]
pub(crate) async fn db_client() -> mongodb::Client {
    let db_uri = rocket::build()
        .figment()
        .extract_inner::<String>("db_uri")
        .unwrap();
    mongodb::Client::with_uri_str(&db_uri).await.unwrap()
}

/// Get a fresh, uniquely-named test database.
#[cfg(test)]
pub(crate) fn database() -> String {
    config::get_database_name()
}

/// Assemble a server against the given test database, with the identity
/// provider stubbed out.
#[cfg(test)]
pub(crate) async fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    let db = client.database(db_name);
    model::mongodb::ensure_indexes_exist(&db)
        .await
        .unwrap();
    rocket::build()
        .mount("/", api::routes())
        .attach(config::ConfigFairing)
        .manage(client)
        .manage(db)
        .manage(Box::new(identity::StubIdentityProvider) as identity::Provider)
}
