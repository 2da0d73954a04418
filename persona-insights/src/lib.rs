//! Personality Insights integration for persona.
//!
//! The flow through this crate is linear:
//!
//! 1. [`content`] turns timeline posts into content items and one submission payload.
//! 2. [`client::PersonalityInsights`] posts that payload to `/v3/profile`.
//! 3. [`report`] prints the returned profile, one section per trait.
//!
//! # Examples
//! ```
//! use persona_insights::content::{to_payload_at, SOURCE_ID};
//! use persona_social::Status;
//!
//! let post: Status = serde_json::from_value(serde_json::json!({
//!     "id": 100, "text": "hi", "lang": "en", "user": { "id": 7 }
//! })).unwrap();
//!
//! let payload = to_payload_at(&[post], 1_700_000_000);
//! assert_eq!(payload.content_items.len(), 1);
//! assert_eq!(payload.content_items[0].sourceid, SOURCE_ID);
//! ```
pub mod client;
pub mod content;
pub mod report;

pub use client::{PersonalityInsights, ProfileOptions};
pub use content::{ContentItem, ContentPayload};
pub use report::{TraitEntry, TraitKind};

use persona_http::HttpError;

#[derive(thiserror::Error, Debug)]
pub enum InsightsError {
    #[error("personality insights request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
