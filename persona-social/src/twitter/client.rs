//! Wrapper around `GET statuses/user_timeline` with persona defaults.
//!
//! Handles OAuth signing and request parameter shaping before delegating to the
//! shared HTTP client. Each call is a single attempt; errors bubble up unchanged.
use crate::paginator::{PageRequest, TimelineSource};
use crate::twitter::oauth::OAuthCredentials;
use crate::twitter::types::Status;
use crate::{Result, SocialError};
use async_trait::async_trait;
use persona_http::{Auth, HttpClient, RequestOpts};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::borrow::Cow;

pub const TWITTER_API_BASE: &str = "https://api.twitter.com/1.1/";
const USER_TIMELINE_PATH: &str = "statuses/user_timeline.json";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    credentials: OAuthCredentials,
}

impl TwitterApi {
    pub fn new(credentials: OAuthCredentials) -> Result<Self> {
        Self::with_base_url(TWITTER_API_BASE, credentials)
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(base: &str, credentials: OAuthCredentials) -> Result<Self> {
        let http = HttpClient::new(base)?;
        Ok(Self { http, credentials })
    }

    /// One page of `screen_name`'s timeline, newest first.
    pub async fn user_timeline(&self, request: &PageRequest) -> Result<Vec<Status>> {
        let count = request.count.to_string();
        let include_rts = request.include_rts.to_string();
        let max_id = request.max_id.map(|id| id.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("screen_name", request.screen_name.as_str()),
            ("count", count.as_str()),
            ("include_rts", include_rts.as_str()),
        ];
        if let Some(max_id) = &max_id {
            params.push(("max_id", max_id.as_str()));
        }

        let url = self.http.endpoint(USER_TIMELINE_PATH)?;
        let header = self.credentials.authorization_header("GET", &url, &params)?;
        let value =
            HeaderValue::from_str(&header).map_err(|e| SocialError::Signing(e.to_string()))?;

        let query: Vec<(&str, Cow<'_, str>)> =
            params.iter().map(|(k, v)| (*k, Cow::Borrowed(*v))).collect();

        let statuses: Vec<Status> = self
            .http
            .get_json(
                USER_TIMELINE_PATH,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: AUTHORIZATION,
                        value,
                    }),
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            screen_name = %request.screen_name,
            max_id = ?request.max_id,
            returned = statuses.len(),
            "twitter.user_timeline"
        );
        Ok(statuses)
    }
}

#[async_trait]
impl TimelineSource for TwitterApi {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Status>> {
        self.user_timeline(request).await
    }
}
