use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A document ID.
///
/// Serialises as a plain hex string in human-readable formats (JSON bodies)
/// and as a native ObjectId in BSON, so the same type can appear in API
/// payloads and in stored documents. Deserialisation accepts either
/// representation; `serde(flatten)` buffering loses the human-readable flag,
/// so it cannot be trusted on the way in.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id(ObjectId);

impl Id {
    /// Generate a fresh, unique ID.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// A filter document selecting this ID.
    pub fn as_doc(&self) -> Document {
        doc! { "_id": self.0 }
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Id {
    type Target = ObjectId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for Id {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<ObjectId>()?))
    }
}

impl From<ObjectId> for Id {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::ObjectId(oid) => Ok(Id(oid)),
            Bson::String(hex) => hex.parse::<ObjectId>().map(Id).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!("invalid ID: {other}"))),
        }
    }
}

/// (De)serialize a [`chrono::DateTime`] as RFC 3339 in human-readable formats
/// and as a native BSON datetime otherwise; either is accepted on the way in
/// (see [`Id`] for why the flag cannot be trusted there).
///
/// Millisecond precision both ways, matching what BSON can store.
pub mod serde_bson_datetime {
    use chrono::{DateTime, SecondsFormat, Utc};
    use mongodb::bson::{serde_helpers::chrono_datetime_as_bson_datetime, Bson};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
        } else {
            chrono_datetime_as_bson_datetime::serialize(value, serializer)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::DateTime(dt) => Ok(dt.to_chrono()),
            Bson::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!("invalid datetime: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_as_hex_in_json() {
        let id = Id::new();
        let json = rocket::serde::json::serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: Id = rocket::serde::json::serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn id_rejects_malformed_hex() {
        assert!("not-an-id".parse::<Id>().is_err());
        assert!("".parse::<Id>().is_err());
        // Correct length but non-hex characters.
        assert!("zzzzzzzzzzzzzzzzzzzzzzzz".parse::<Id>().is_err());
    }
}
