//! Runner configuration.

use crate::config::BotConfig;
use std::path::PathBuf;

/// Configuration for handling one event.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Loaded bot settings.
    settings: BotConfig,
    /// GitHub token used for API calls and pushes.
    token: String,
    /// Whether to preview ports without creating anything.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(settings: BotConfig, token: String, dry_run: bool) -> Self {
        Self {
            settings,
            token,
            dry_run,
        }
    }

    /// Overrides the configured workspace root.
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.settings.git.work_dir = Some(work_dir);
        self
    }

    /// Returns the bot settings.
    pub fn settings(&self) -> &BotConfig {
        &self.settings
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
