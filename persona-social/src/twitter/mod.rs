//! Twitter v1.1 REST surface used by the timeline export.
//!
//! Only `statuses/user_timeline` is wrapped. Requests are signed with OAuth 1.0a user
//! context (consumer key/secret plus access token/secret).
pub mod client;
pub mod oauth;
pub mod types;

pub use client::TwitterApi;
pub use oauth::OAuthCredentials;
pub use types::{Status, User};
