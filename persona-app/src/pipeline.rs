//! fetch timeline → build payload → request profile → print report.
use anyhow::{Context, Result};
use persona_config::Settings;
use persona_insights::{PersonalityInsights, ProfileOptions, content, report};
use persona_social::twitter::client::TWITTER_API_BASE;
use persona_social::{ExhaustionPolicy, OAuthCredentials, TimelinePaginator, TwitterApi};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub posts: usize,
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
    policy: ExhaustionPolicy,
    twitter_base: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            policy: ExhaustionPolicy::from_flag(settings.stop_on_empty_page),
            twitter_base: TWITTER_API_BASE.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_twitter_base(mut self, base: impl Into<String>) -> Self {
        self.twitter_base = base.into();
        self
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let s = self.settings;

        let credentials = OAuthCredentials::new(
            &s.twitter_consumer_key,
            &s.twitter_consumer_secret,
            &s.twitter_access_key,
            &s.twitter_access_secret,
        );
        let twitter = TwitterApi::with_base_url(&self.twitter_base, credentials)?;
        let posts = TimelinePaginator::new(twitter)
            .with_policy(self.policy)
            .fetch(&s.twitter_handle)
            .await
            .with_context(|| format!("fetching timeline for @{}", s.twitter_handle))?;

        writeln!(out, "Number of posts fetched: {}", posts.len())?;

        let payload = content::to_payload(&posts);
        let insights = PersonalityInsights::new(
            &s.watson_pi_url,
            s.watson_pi_username.clone(),
            s.watson_pi_password.clone(),
        )?;
        let options = ProfileOptions {
            version: s.watson_pi_version.clone(),
            ..ProfileOptions::default()
        };
        let profile = insights
            .profile(&payload, &options)
            .await
            .context("requesting personality profile")?;

        report::render(&profile, out)?;
        out.flush()?;

        Ok(RunSummary { posts: posts.len() })
    }
}
