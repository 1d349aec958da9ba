//! Twitter API response object definition + the flattened output record
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of `search/tweets` results
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchResponse {
    pub statuses: Vec<Status>,
}

/// One matched status as the v1.1 search endpoint returns it
/// Entity blocks and `geo` are carried as raw JSON, they are stringified at
/// flatten time instead of being normalized into columns
#[derive(Debug, Deserialize, Serialize)]
pub struct Status {
    pub id: u64,
    pub id_str: String,
    pub created_at: String,
    #[serde(alias = "text")]
    pub full_text: String,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub metadata: StatusMetadata,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
    #[serde(default)]
    pub geo: Option<Value>,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub lang: String,
    pub user: User,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Entities {
    pub hashtags: Value,
    pub symbols: Value,
    pub user_mentions: Value,
    pub urls: Value,
}

/// Search-specific annotations of a status
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusMetadata {
    pub result_type: String,
    pub iso_language_code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct User {
    pub id_str: String,
    pub screen_name: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Flattened, denormalized form of one status, ready for tabular output
/// Field order here is the CSV column order and must stay stable across a run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TweetRecord {
    pub id: String,
    pub created_at: String,
    pub text: String,
    pub hashtags: String,
    pub symbols: String,
    pub user_mentions: String,
    pub urls: String,
    pub result_type: String,
    pub language_code: String,
    pub in_reply_to_status_id: Option<String>,
    pub in_reply_to_user_id: Option<String>,
    pub in_reply_to_screen_name: Option<String>,
    pub geo: Option<String>,
    pub retweet_count: u64,
    pub favorite_count: u64,
    pub lang: String,
    pub author_id: String,
    pub author_screen_name: String,
    pub author_name: String,
    pub author_location: Option<String>,
    pub author_profile_desc: Option<String>,
}

impl TweetRecord {
    /// Copy the documented fields out of a status
    /// Missing optional fields become empty values, never an error
    pub fn from_status(status: &Status) -> Self {
        TweetRecord {
            id: status.id_str.clone(),
            created_at: status.created_at.clone(),
            text: status.full_text.clone(),
            hashtags: status.entities.hashtags.to_string(),
            symbols: status.entities.symbols.to_string(),
            user_mentions: status.entities.user_mentions.to_string(),
            urls: status.entities.urls.to_string(),
            result_type: status.metadata.result_type.clone(),
            language_code: status.metadata.iso_language_code.clone(),
            in_reply_to_status_id: status.in_reply_to_status_id_str.clone(),
            in_reply_to_user_id: status.in_reply_to_user_id_str.clone(),
            in_reply_to_screen_name: status.in_reply_to_screen_name.clone(),
            geo: status.geo.as_ref().map(Value::to_string),
            retweet_count: status.retweet_count,
            favorite_count: status.favorite_count,
            lang: status.lang.clone(),
            author_id: status.user.id_str.clone(),
            author_screen_name: status.user.screen_name.clone(),
            author_name: status.user.name.clone(),
            author_location: status.user.location.clone(),
            author_profile_desc: status.user.description.clone(),
        }
    }
}
