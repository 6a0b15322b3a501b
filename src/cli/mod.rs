//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod balance;
pub mod config;
pub mod logs;
pub mod period;

use std::path::PathBuf;

use crate::config::{MaboursePaths, Settings};
use crate::crypto::{prompt_password, SecretPassword};
use crate::error::BalanceResult;
use crate::logging::LogStore;

pub use balance::{
    handle_balances_command, handle_forecast_command, handle_statement_command, BalanceSelection,
    OutputFormat,
};
pub use config::{delete_config, handle_config_command, ConfigCommands};
pub use logs::{handle_logs_command, LogsCommands};
pub use period::handle_period_command;

/// State shared by the command handlers
pub struct CliContext {
    /// Settings file in use
    pub config_path: PathBuf,
    pub paths: MaboursePaths,
    pub settings: Settings,
    pub log_store: LogStore,
    /// Password supplied non-interactively; prompted for when absent
    pub password: Option<SecretPassword>,
}

impl CliContext {
    pub fn new(config_path: PathBuf, paths: MaboursePaths, settings: Settings, log_store: LogStore) -> Self {
        Self {
            config_path,
            paths,
            settings,
            log_store,
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<SecretPassword>) -> Self {
        self.password = password;
        self
    }

    /// The supplied password, or one read from the terminal
    pub fn obtain_password(&self, prompt: &str) -> BalanceResult<SecretPassword> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => prompt_password(prompt),
        }
    }

    /// Save the settings to the config file in use
    pub fn save_settings(&self) -> BalanceResult<()> {
        self.settings.save(&self.config_path)
    }
}
