use clap::Parser;
use persona_common::{LogConfig, LogFormat};
use persona_config::DEFAULT_SETTINGS_FILE;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "persona")]
#[command(about = "Export a user's Twitter timeline and print a Personality Insights profile")]
pub struct Cli {
    /// Settings file with Twitter credentials and the Personality Insights endpoint
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Stop paginating at the first empty page instead of spending all 16 requests
    #[arg(long)]
    pub stop_on_empty_page: bool,

    /// Also write log events to stderr
    #[arg(long)]
    pub log_stderr: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            emit_stderr: self.log_stderr,
            format: if self.log_json {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_settings_json_in_cwd() {
        let cli = Cli::parse_from(["persona"]);
        assert_eq!(cli.settings, PathBuf::from("settings.json"));
        assert!(!cli.stop_on_empty_page);
        assert_eq!(cli.log_config().format, LogFormat::Text);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "persona",
            "--settings",
            "/etc/persona.json",
            "--stop-on-empty-page",
            "--log-stderr",
            "--log-json",
        ]);
        assert_eq!(cli.settings, PathBuf::from("/etc/persona.json"));
        assert!(cli.stop_on_empty_page);
        let log = cli.log_config();
        assert!(log.emit_stderr);
        assert_eq!(log.format, LogFormat::Json);
    }
}
