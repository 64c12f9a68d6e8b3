//! Configuration loading.
//!
//! This module handles parsing `port-bot.toml` files and validating the
//! settings they contain.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    BotConfig, BotIdentity, GitSettings, PullRequestSettings, DEFAULT_INITIAL_LABELS,
};

use std::path::Path;
use tracing::{debug, info};

/// Loads the bot configuration.
///
/// When `path` is `None` every setting takes its default value. A review
/// checklist path in the file is resolved relative to the file's directory
/// and its contents are read eagerly so a missing checklist is reported at
/// startup rather than on the first opened pull request.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable, malformed, or
/// fails validation.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let Some(path) = path else {
        debug!("No config file given, using defaults");
        return Ok(BotConfig::default());
    };

    info!(path = %path.display(), "Loading config");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut config: BotConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    if let Some(checklist) = &config.pull_requests.review_checklist {
        let checklist_path = path.parent().unwrap_or(Path::new(".")).join(checklist);
        let text =
            std::fs::read_to_string(&checklist_path).map_err(|e| ConfigError::IoError {
                path: checklist_path.display().to_string(),
                source: e,
            })?;
        config.pull_requests.review_checklist_text = Some(text);
    }

    validate(&config, path)?;
    Ok(config)
}

/// Checks invariants serde cannot express.
fn validate(config: &BotConfig, path: &Path) -> Result<(), ConfigError> {
    let fail = |message: &str| {
        Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            message: message.to_string(),
        })
    };

    if config.bot.name.trim().is_empty() {
        return fail("bot.name must not be empty");
    }
    if config.bot.email.trim().is_empty() {
        return fail("bot.email must not be empty");
    }
    if config.git.concurrency == 0 {
        return fail("git.concurrency must be at least 1");
    }
    if config.git.port_timeout_secs == 0 {
        return fail("git.port-timeout-secs must be greater than 0");
    }
    if !config.git.clone_url.contains("{owner}") || !config.git.clone_url.contains("{repo}") {
        return fail("git.clone-url must contain {owner} and {repo}");
    }
    if let Some(text) = &config.pull_requests.review_checklist_text {
        if text.trim().is_empty() {
            return fail("review checklist is empty");
        }
    }

    Ok(())
}
