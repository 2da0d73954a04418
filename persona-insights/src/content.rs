//! Post → content-item mapping.
//!
//! Every field is copied, stringified, or fixed; there is no failure path. `created`
//! is the time of mapping, not of the post.
use persona_social::Status;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const SOURCE_ID: &str = "twitter";
pub const CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub userid: String,
    pub id: String,
    pub sourceid: String,
    pub contenttype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub content: String,
    /// Unix seconds.
    pub created: i64,
    pub reply: bool,
    /// Reposts are excluded upstream.
    pub forward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    #[serde(rename = "contentItems")]
    pub content_items: Vec<ContentItem>,
}

impl ContentPayload {
    pub fn len(&self) -> usize {
        self.content_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content_items.is_empty()
    }
}

/// `reply` is set when the post has *no* in-reply-to id.
pub fn to_content_item(status: &Status, created: i64) -> ContentItem {
    ContentItem {
        userid: status.user.id.to_string(),
        id: status.id.to_string(),
        sourceid: SOURCE_ID.to_string(),
        contenttype: CONTENT_TYPE.to_string(),
        language: status.lang.clone(),
        content: status.text.clone(),
        created,
        reply: status.in_reply_to_status_id.is_none(),
        forward: false,
    }
}

/// All posts, in order, stamped with one shared `created` time.
pub fn to_payload_at(statuses: &[Status], created: i64) -> ContentPayload {
    ContentPayload {
        content_items: statuses
            .iter()
            .map(|s| to_content_item(s, created))
            .collect(),
    }
}

pub fn to_payload(statuses: &[Status]) -> ContentPayload {
    let payload = to_payload_at(statuses, now_unix());
    tracing::debug!(items = payload.len(), "insights.payload.built");
    payload
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
