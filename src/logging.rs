use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for console output
    pub console_level: Level,
    /// Log level for file output
    pub file_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
    /// Mirror logs to stderr
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: Level::WARN,
            file_level: Level::INFO,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
            console: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "jira-fetch") {
            proj_dirs.cache_dir().to_path_buf()
        } else {
            PathBuf::from("jira-fetch-logs")
        }
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Let environment variables override what is configured so far
    pub fn with_env_overrides(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = var("JIRA_FETCH_LOG_LEVEL").and_then(|l| l.parse::<Level>().ok()) {
            self.console_level = level;
            self.file_level = level;
        }

        if let Some(log_dir) = var("JIRA_FETCH_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(log_dir));
        }

        if var("JIRA_FETCH_NO_FILE_LOGS").is_some() {
            self.log_dir = None;
        }

        if var("JIRA_FETCH_JSON_LOGS").is_some() {
            self.json_format = true;
        }

        if var("JIRA_FETCH_CONSOLE_LOGS").is_some() {
            self.console = true;
        }

        self
    }

    /// Apply a level from the configuration file, e.g. `"debug"`
    pub fn with_level(mut self, level: Option<&str>) -> Self {
        if let Some(level) = level.and_then(|l| l.parse::<Level>().ok()) {
            self.console_level = level;
            self.file_level = level;
        }
        self
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "jira-fetch.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        };

        layers.push(file_layer);
    }

    // stdout carries command output
    if config.console {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(
                EnvFilter::builder()
                    .with_default_directive(config.console_level.into())
                    .from_env_lossy(),
            )
            .boxed();

        layers.push(console_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(guard)
}
