use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::identity::UserProfile;
use crate::model::mongodb::Id;

/// An account from the database, created from a third-party identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl Deref for User {
    type Target = UserProfile;

    fn deref(&self) -> &Self::Target {
        &self.profile
    }
}

/// An account ready for insertion, identical to [`User`] minus the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewUser(pub UserProfile);

impl NewUser {
    pub fn new(profile: UserProfile) -> Self {
        Self(profile)
    }
}
