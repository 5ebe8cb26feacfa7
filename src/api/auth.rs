use log::info;
use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{Provider, UserProfile};
use crate::model::{
    api::auth::{AuthToken, LoginRequest, AUTH_TOKEN_COOKIE},
    db::user::{NewUser, User},
    mongodb::{is_duplicate_key, Coll, Id},
};

pub fn routes() -> Vec<Route> {
    routes![login, me, logout]
}

/// Exchange an authorization code for a session.
///
/// The account is keyed by the provider-verified email: first login creates
/// it, later logins reuse it (refreshing the stored name if it changed).
#[post("/auth/login", data = "<request>", format = "json")]
async fn login(
    request: Json<LoginRequest>,
    provider: &State<Provider>,
    config: &State<Config>,
    cookies: &CookieJar<'_>,
    users: Coll<User>,
    new_users: Coll<NewUser>,
) -> Result<Json<UserProfile>> {
    let profile = provider.authenticate(&request.code).await?;

    let user = match users
        .find_one(doc! { "email": &profile.email }, None)
        .await?
    {
        Some(mut user) => {
            if user.profile != profile {
                user.profile = profile;
                users.replace_one(user.id.as_doc(), &user, None).await?;
            }
            user
        }
        None => insert_user(&users, &new_users, profile).await?,
    };

    info!("User {} logged in", user.email);
    cookies.add(AuthToken::new(&user).into_cookie(config));
    Ok(Json(user.profile))
}

/// The profile of the signed-in user, 401 without a valid session.
/// The [`User`] guard performs the token and account-existence checks.
#[get("/auth/me")]
fn me(user: User) -> Json<UserProfile> {
    Json(user.profile)
}

#[delete("/auth")]
fn logout(cookies: &CookieJar<'_>) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}

/// Create the account, falling back to a re-read if a concurrent login won
/// the unique email index race.
async fn insert_user(
    users: &Coll<User>,
    new_users: &Coll<NewUser>,
    profile: UserProfile,
) -> Result<User> {
    let result = new_users.insert_one(NewUser::new(profile.clone()), None).await;
    match result {
        Ok(inserted) => {
            let id: Id = inserted
                .inserted_id
                .as_object_id()
                .unwrap() // Valid because the ID comes directly from the DB.
                .into();
            Ok(User { id, profile })
        }
        Err(ref e) if is_duplicate_key(e) => {
            let user = users
                .find_one(doc! { "email": &profile.email }, None)
                .await?
                .ok_or_else(|| Error::Unauthorized("Unknown user".to_string()))?;
            Ok(user)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::json,
    };

    use super::*;

    async fn do_login<'c>(client: &'c Client, code: &str) -> LocalResponse<'c> {
        client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "code": code }).to_string())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn login_and_me(client: Client, users: Coll<User>) {
        let response = do_login(&client, "alice").await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let profile: UserProfile = response.into_json().await.unwrap();
        assert_eq!(profile.name, "Test User alice");
        assert_eq!(profile.email, "alice@example.com");

        // The account was created.
        let stored = users
            .find_one(doc! { "email": "alice@example.com" }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.profile, profile);

        // The cookie authenticates later requests.
        let response = client.get(uri!(me)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let fetched: UserProfile = response.into_json().await.unwrap();
        assert_eq!(fetched, profile);
    }

    #[backend_test]
    async fn repeat_login_reuses_the_account(client: Client, users: Coll<User>) {
        let response = do_login(&client, "bob").await;
        assert_eq!(Status::Ok, response.status());
        let response = do_login(&client, "bob").await;
        assert_eq!(Status::Ok, response.status());

        assert_eq!(1, users.count_documents(None, None).await.unwrap());
    }

    #[backend_test]
    async fn rejected_code_is_401(client: Client, users: Coll<User>) {
        let response = do_login(&client, "").await;
        assert_eq!(Status::Unauthorized, response.status());
        assert!(response.cookies().get(AUTH_TOKEN_COOKIE).is_none());
        assert_eq!(0, users.count_documents(None, None).await.unwrap());
    }

    #[backend_test]
    async fn me_requires_a_session(client: Client) {
        let response = client.get(uri!(me)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn deleted_account_invalidates_the_session(client: Client, users: Coll<User>) {
        do_login(&client, "dave").await;

        users
            .delete_one(doc! { "email": "dave@example.com" }, None)
            .await
            .unwrap();

        // The cookie is still valid, but the account is gone.
        let response = client.get(uri!(me)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn logout_clears_the_session(client: Client) {
        do_login(&client, "carol").await;
        let response = client.get(uri!(me)).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let response = client.delete(uri!(logout)).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let response = client.get(uri!(me)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
    }
}
