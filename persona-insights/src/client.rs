//! Personality Insights v3 `profile` call.
//!
//! The response is returned as raw JSON; only [`crate::report`] interprets it.
use crate::content::ContentPayload;
use crate::{InsightsError, Result};
use persona_http::{Auth, HttpClient, RequestOpts};
use std::borrow::Cow;
use std::time::Duration;

pub const DEFAULT_VERSION: &str = "2017-10-13";
const PROFILE_PATH: &str = "v3/profile";

/// Query options forwarded to the service as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOptions {
    pub version: String,
    pub consumption_preferences: bool,
    pub raw_scores: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            consumption_preferences: true,
            raw_scores: true,
        }
    }
}

impl ProfileOptions {
    fn query(&self) -> Vec<(&'static str, Cow<'_, str>)> {
        vec![
            ("version", Cow::Borrowed(self.version.as_str())),
            (
                "consumption_preferences",
                Cow::Owned(self.consumption_preferences.to_string()),
            ),
            ("raw_scores", Cow::Owned(self.raw_scores.to_string())),
        ]
    }
}

pub struct PersonalityInsights {
    client: HttpClient,
    username: String,
    password: String,
}

impl PersonalityInsights {
    /// `url` is the service root, e.g. `https://gateway.watsonplatform.net/personality-insights/api`.
    pub fn new(url: &str, username: String, password: String) -> Result<Self> {
        let client = HttpClient::new(url)
            .map_err(|e| InsightsError::Config(format!("invalid service url {url:?}: {e}")))?
            // Large timelines take a while to analyse.
            .with_timeout(Duration::from_secs(120));
        Ok(Self {
            client,
            username,
            password,
        })
    }

    pub async fn profile(
        &self,
        payload: &ContentPayload,
        options: &ProfileOptions,
    ) -> Result<serde_json::Value> {
        tracing::info!(
            items = payload.len(),
            version = %options.version,
            consumption_preferences = options.consumption_preferences,
            raw_scores = options.raw_scores,
            "insights.profile.submit"
        );

        let profile: serde_json::Value = self
            .client
            .post_json(
                PROFILE_PATH,
                payload,
                RequestOpts {
                    auth: Some(Auth::Basic {
                        username: &self.username,
                        password: &self.password,
                    }),
                    query: Some(options.query()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            word_count = ?profile.get("word_count"),
            processed_language = ?profile.get("processed_language"),
            "insights.profile.received"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_service_defaults_used_by_the_tool() {
        let opts = ProfileOptions::default();
        assert_eq!(opts.version, "2017-10-13");
        assert!(opts.consumption_preferences);
        assert!(opts.raw_scores);
    }

    #[test]
    fn options_render_as_query_pairs() {
        let opts = ProfileOptions {
            version: "2016-10-20".into(),
            consumption_preferences: false,
            raw_scores: true,
        };
        let q: Vec<(&str, String)> = opts
            .query()
            .into_iter()
            .map(|(k, v)| (k, v.into_owned()))
            .collect();
        assert_eq!(
            q,
            vec![
                ("version", "2016-10-20".to_string()),
                ("consumption_preferences", "false".to_string()),
                ("raw_scores", "true".to_string()),
            ]
        );
    }

    #[test]
    fn bad_url_is_config_error() {
        let err = PersonalityInsights::new("::", "u".into(), "p".into())
            .err()
            .unwrap();
        assert!(matches!(err, InsightsError::Config(_)));
    }
}
