//! Twitter timeline access for persona.
//!
//! [`twitter`] holds the v1.1 REST client, its OAuth 1.0a signer, and the response
//! models. [`paginator`] walks a user's timeline backwards page by page over any
//! [`paginator::TimelineSource`].
pub mod paginator;
pub mod twitter;

pub use paginator::{ExhaustionPolicy, PageRequest, TimelinePaginator, TimelineSource};
pub use twitter::{OAuthCredentials, Status, TwitterApi};

use persona_http::HttpError;

#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("twitter request failed: {0}")]
    Http(#[from] HttpError),

    #[error("request signing failed: {0}")]
    Signing(String),
}

pub type Result<T> = std::result::Result<T, SocialError>;
