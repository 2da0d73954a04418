//! Logging setup for the `persona` binary and integration tests.
//!
//! Events always land in a daily rolling file; stderr is opt-in so that the report
//! printed on stdout stays readable. Call [`init_logging`] once near process start and
//! keep the returned [`LogHandle`] alive until the process is done; dropping it flushes
//! the background file writer. Later calls are no-ops that hand back the resolved path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Environment variable that relocates the log directory.
pub const LOG_DIR_ENV: &str = "PERSONA_LOG_DIR";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the default directory and the file name.
    pub app_name: &'static str,
    /// Explicit log directory. If `None`, `PERSONA_LOG_DIR` is consulted and
    /// finally `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Duplicate events to `stderr` in addition to the file sink.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "persona",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Owns the file writer's worker. Buffered events are written out when it drops, so
/// call [`LogHandle::flush`] before `std::process::exit`, which skips destructors.
#[must_use = "dropping the handle stops the log file writer"]
#[derive(Debug)]
pub struct LogHandle {
    path: PathBuf,
    guard: Option<WorkerGuard>,
}

impl LogHandle {
    /// Log file for the current day.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(self) {
        drop(self.guard);
    }
}

/// Install the global `tracing` subscriber.
pub fn init_logging(config: LogConfig) -> anyhow::Result<LogHandle> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(LogHandle {
            path: path.clone(),
            guard: None,
        });
    }

    let resolved_dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&resolved_dir)
        .with_context(|| format!("failed to create log directory: {}", resolved_dir.display()))?;

    let log_filename = format!("{}.log", config.app_name);
    let full_path = daily_file_path(&resolved_dir, &log_filename);

    let appender = rolling::daily(&resolved_dir, &log_filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let file_layer = match config.format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    };
    let stderr_layer = config.emit_stderr.then(|| match config.format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(LogHandle {
        path: full_path,
        guard: Some(guard),
    })
}

/// `tracing_appender::rolling::daily` suffixes the file name with the date.
fn daily_file_path(dir: &Path, file_name: &str) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d");
    dir.join(format!("{file_name}.{today}"))
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_env() {
        temp_env::with_var(LOG_DIR_ENV, Some("/tmp/from-env"), || {
            let dir = resolve_log_dir("persona", Some(Path::new("/var/log/persona")));
            assert_eq!(dir, PathBuf::from("/var/log/persona"));
        });
    }

    #[test]
    fn env_dir_used_when_no_explicit_dir() {
        temp_env::with_var(LOG_DIR_ENV, Some("/tmp/from-env"), || {
            assert_eq!(resolve_log_dir("persona", None), PathBuf::from("/tmp/from-env"));
        });
    }

    #[test]
    fn tilde_expands_against_home() {
        temp_env::with_vars([("HOME", Some("/home/ada")), (LOG_DIR_ENV, None)], || {
            assert_eq!(
                resolve_log_dir("persona", Some(Path::new("~/logs"))),
                PathBuf::from("/home/ada/logs")
            );
            assert_eq!(
                resolve_log_dir("persona", None),
                PathBuf::from("/home/ada/.local/share/persona")
            );
        });
    }

    #[test]
    fn flushing_the_handle_writes_pending_events() {
        let dir = tempfile::tempdir().unwrap();
        let handle = temp_env::with_var("RUST_LOG", None::<&str>, || {
            init_logging(LogConfig {
                log_dir: Some(dir.path().to_path_buf()),
                ..LogConfig::default()
            })
        })
        .unwrap();
        let path = handle.path().to_path_buf();

        tracing::warn!("observability.flush_check");
        handle.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("observability.flush_check"));

        let again = init_logging(LogConfig::default()).unwrap();
        assert_eq!(again.path(), path);
    }

    #[test]
    fn daily_path_carries_date_suffix() {
        let path = daily_file_path(Path::new("/logs"), "persona.log");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("persona.log."));
        assert_eq!(name.len(), "persona.log.".len() + "YYYY-MM-DD".len());
    }
}
