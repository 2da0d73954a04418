//! Loader for `settings.json`: Twitter credentials, the analysis-service endpoint, and
//! a couple of optional knobs.
//!
//! Sources are layered the same way every time: the JSON file first, then
//! `PERSONA__<KEY>` environment overrides, then `${VAR}` expansion inside string
//! values. All eight credential/endpoint keys must be present after layering; the
//! first one missing (in [`REQUIRED_KEYS`] order) is reported by name.
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Default `version` tag sent to the Personality Insights API.
pub const DEFAULT_PI_VERSION: &str = "2017-10-13";

/// Keys that must be present, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 8] = [
    "twitter_handle",
    "twitter_access_key",
    "twitter_access_secret",
    "twitter_consumer_key",
    "twitter_consumer_secret",
    "watson_pi_url",
    "watson_pi_username",
    "watson_pi_password",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find {}, cannot continue!", .0.display())]
    NotFound(PathBuf),

    #[error("Settings is missing key: \"{0}\". Please add it in to continue!")]
    MissingKey(&'static str),

    /// The detail is for logs; the user-facing message stays generic.
    #[error("Could not read settings file, make sure it is formatted correctly!")]
    Malformed(String),
}

/// Immutable runtime settings, built once at startup and passed by reference.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub twitter_handle: String,
    pub twitter_access_key: String,
    pub twitter_access_secret: String,
    pub twitter_consumer_key: String,
    pub twitter_consumer_secret: String,
    pub watson_pi_url: String,
    pub watson_pi_username: String,
    pub watson_pi_password: String,
    #[serde(default = "default_pi_version")]
    pub watson_pi_version: String,
    /// Stop paginating at the first page holding fewer posts than requested.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub stop_on_empty_page: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("twitter_handle", &self.twitter_handle)
            .field("twitter_access_key", &"<redacted>")
            .field("twitter_access_secret", &"<redacted>")
            .field("twitter_consumer_key", &"<redacted>")
            .field("twitter_consumer_secret", &"<redacted>")
            .field("watson_pi_url", &self.watson_pi_url)
            .field("watson_pi_username", &self.watson_pi_username)
            .field("watson_pi_password", &"<redacted>")
            .field("watson_pi_version", &self.watson_pi_version)
            .field("stop_on_empty_page", &self.stop_on_empty_page)
            .finish()
    }
}

fn default_pi_version() -> String {
    DEFAULT_PI_VERSION.into()
}

/// Environment overrides arrive as strings, so accept `"true"`/`"1"` as well as JSON bools.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got {other:?}"
            ))),
        },
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring (JSON + env overrides).
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    file: Option<PathBuf>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Empty builder; the `PERSONA__` environment source is layered last by [`Self::load`].
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            file: None,
        }
    }

    /// Attach the settings file. It is parsed as JSON whatever its extension.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        self.builder = self.builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Json).required(true),
        );
        self.file = Some(path);
        self
    }

    /// Merge an inline JSON document, mostly for tests.
    ///
    /// ```
    /// use persona_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_json_str(r#"{
    ///         "twitter_handle": "ada",
    ///         "twitter_access_key": "ak",
    ///         "twitter_access_secret": "as",
    ///         "twitter_consumer_key": "ck",
    ///         "twitter_consumer_secret": "cs",
    ///         "watson_pi_url": "https://pi.example.com/api",
    ///         "watson_pi_username": "user",
    ///         "watson_pi_password": "pass"
    ///     }"#)
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.twitter_handle, "ada");
    /// assert_eq!(settings.watson_pi_version, "2017-10-13");
    /// assert!(!settings.stop_on_empty_page);
    /// ```
    pub fn with_json_str(mut self, json: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(json, FileFormat::Json));
        self
    }

    /// Layer the sources, validate required keys, and build [`Settings`].
    pub fn load(self) -> Result<Settings, ConfigError> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.clone()));
            }
        }

        let cfg = self
            .builder
            .add_source(Environment::with_prefix("PERSONA").separator("__"))
            .build()
            .map_err(malformed)?;

        let mut v: Value = cfg.try_deserialize().map_err(malformed)?;
        let Some(map) = v.as_object() else {
            return Err(ConfigError::Malformed(
                "settings root is not an object".into(),
            ));
        };

        if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !map.contains_key(**k)) {
            tracing::debug!(key = *missing, "settings.missing_key");
            return Err(ConfigError::MissingKey(*missing));
        }

        expand_env_in_value(&mut v);

        let settings: Settings = serde_json::from_value(v).map_err(malformed)?;
        tracing::debug!(?settings, "settings.loaded");
        Ok(settings)
    }
}

fn malformed<E: fmt::Display>(e: E) -> ConfigError {
    let detail = e.to_string();
    tracing::debug!(%detail, "settings.malformed");
    ConfigError::Malformed(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("PI_PASSWORD", Some("hunter2"), || {
            let mut v = json!("${PI_PASSWORD}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("hunter2"));
        });
    }

    #[test]
    fn expands_nested_values_and_leaves_scalars() {
        temp_env::with_vars([("HOST", Some("pi.example.com")), ("VER", Some("v3"))], || {
            let mut v = json!({
                "watson_pi_url": "https://${HOST}/api",
                "list": ["$VER", 7, true, null]
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "watson_pi_url": "https://pi.example.com/api",
                    "list": ["v3", 7, true, null]
                })
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${PERSONA_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${PERSONA_DOES_NOT_EXIST}"));
    }

    #[test]
    fn flag_accepts_strings_and_bools() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "deserialize_flag")]
            flag: bool,
        }
        let parse = |v: Value| serde_json::from_value::<Probe>(json!({ "flag": v }));

        assert!(parse(json!(true)).unwrap().flag);
        assert!(parse(json!("TRUE")).unwrap().flag);
        assert!(parse(json!("1")).unwrap().flag);
        assert!(!parse(json!("no")).unwrap().flag);
        assert!(parse(json!("maybe")).is_err());
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            ConfigError::MissingKey("watson_pi_url").to_string(),
            "Settings is missing key: \"watson_pi_url\". Please add it in to continue!"
        );
        assert_eq!(
            ConfigError::NotFound(PathBuf::from("settings.json")).to_string(),
            "Could not find settings.json, cannot continue!"
        );
        assert_eq!(
            ConfigError::Malformed("eof".into()).to_string(),
            "Could not read settings file, make sure it is formatted correctly!"
        );
    }
}
