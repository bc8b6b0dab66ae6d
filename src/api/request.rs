use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Id;

pub const REQUESTS_PATH: &str = "/requests";
pub const VERSION_PATH: &str = "/version";

/// A patron asking to sing one song at one venue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingRequest {
    pub venue_id: Id,
    pub song_id: Id,
    pub singer_name: String,
}

/// What the backend hands back for an accepted request. Every field is optional,
/// older deployments answer with an empty body. A field of the wrong shape reads as
/// missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestReceipt {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Id>,

    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<u32>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}
