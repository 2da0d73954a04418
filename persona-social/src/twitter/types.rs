use serde::{Deserialize, Serialize};

/// One post from `statuses/user_timeline`. Fields not listed are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub text: String,
    pub user: User,

    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<u64>,

    /// Present only on retweets, which the timeline request excludes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub screen_name: Option<String>,
}
