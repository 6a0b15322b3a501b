//! User settings for Mabourse
//!
//! Manages the month convention, the accounts whose balances are computed,
//! ledger file locations, logging preferences and the password protecting
//! config deletion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, BalanceResult};
use crate::logging::{LogLevel, DEFAULT_MAX_ENTRIES};
use crate::models::{AccountId, Money, MonthMode};
use crate::services::PeriodResolver;
use crate::storage::file_io::{read_json, write_json_atomic};

/// An account whose balances can be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    pub id: AccountId,

    #[serde(default)]
    pub name: String,

    /// Day the account was opened; balances start in the period containing it
    pub created_on: NaiveDate,

    #[serde(default = "Money::zero")]
    pub initial_balance: Money,
}

impl AccountSettings {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_on: NaiveDate, initial_balance: Money) -> Self {
        Self {
            id: AccountId::new(id),
            name: name.into(),
            created_on,
            initial_balance,
        }
    }

    /// Display name, falling back to the identifier
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Stored password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHashSettings {
    /// PHC string (`$argon2id$v=19$...`)
    pub hash: String,
}

/// User settings for Mabourse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Calendar or financial months
    #[serde(default)]
    pub month_mode: MonthMode,

    /// First day of a financial month (1-31)
    #[serde(default = "default_financial_start_day")]
    pub financial_start_day: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Minimum level kept in the log store
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,

    /// Transaction ledger; defaults to `transactions.csv` next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions_file: Option<PathBuf>,

    /// Adjustment file; defaults to `adjustments.csv` next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustments_file: Option<PathBuf>,

    #[serde(default)]
    pub accounts: Vec<AccountSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordHashSettings>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_financial_start_day() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_max_log_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            month_mode: MonthMode::default(),
            financial_start_day: default_financial_start_day(),
            currency_symbol: default_currency(),
            log_level: LogLevel::default(),
            max_log_entries: default_max_log_entries(),
            transactions_file: None,
            adjustments_file: None,
            accounts: Vec::new(),
            password: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or default settings if the file doesn't exist
    pub fn load_or_create(path: &Path) -> BalanceResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            // Not saved here; the caller decides when to persist
            Ok(Self::default())
        }
    }

    /// Load and validate settings from `path`
    pub fn load(path: &Path) -> BalanceResult<Self> {
        let settings: Settings = read_json(path).map_err(|e| match e {
            BalanceError::Json(msg) => BalanceError::Config(format!("Failed to parse settings file: {}", msg)),
            other => other,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> BalanceResult<()> {
        self.validate()?;
        write_json_atomic(path, self)
    }

    pub fn validate(&self) -> BalanceResult<()> {
        if !(1..=31).contains(&self.financial_start_day) {
            return Err(BalanceError::Config(format!(
                "financial_start_day must be between 1 and 31, got {}",
                self.financial_start_day
            )));
        }

        if self.max_log_entries == 0 {
            return Err(BalanceError::Config("max_log_entries must be positive".into()));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !seen.insert(&account.id) {
                return Err(BalanceError::Config(format!(
                    "account '{}' is defined more than once",
                    account.id
                )));
            }
        }

        Ok(())
    }

    /// Resolver for the configured month convention
    pub fn resolver(&self) -> BalanceResult<PeriodResolver> {
        PeriodResolver::new(self.month_mode, self.financial_start_day)
    }

    pub fn find_account(&self, id: &AccountId) -> BalanceResult<&AccountSettings> {
        self.accounts
            .iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| BalanceError::account_not_found(id.as_str()))
    }

    /// Earliest creation date over all accounts
    pub fn earliest_creation(&self) -> Option<NaiveDate> {
        self.accounts.iter().map(|a| a.created_on).min()
    }

    /// Sum of the initial balances of all accounts
    pub fn total_initial_balance(&self) -> Money {
        self.accounts.iter().map(|a| a.initial_balance).sum()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn set_password_hash(&mut self, hash: String) {
        self.password = Some(PasswordHashSettings { hash });
    }

    /// Change the month convention
    pub fn set_month_mode(&mut self, mode: MonthMode, financial_start_day: Option<u32>) -> BalanceResult<()> {
        let start_day = financial_start_day.unwrap_or(self.financial_start_day);
        PeriodResolver::new(mode, start_day)?;
        self.month_mode = mode;
        self.financial_start_day = start_day;
        Ok(())
    }
}
