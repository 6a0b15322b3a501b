//! Configuration CLI commands
//!
//! Shows and edits the settings file, and deletes it behind the stored
//! password.

use clap::Subcommand;

use super::CliContext;
use crate::config::AccountSettings;
use crate::crypto::{hash_password, verify_password};
use crate::display::format_settings;
use crate::error::{BalanceError, BalanceResult};
use crate::logging::LogLevel;
use crate::models::{parse_date, AccountId, Money, MonthMode};
use crate::storage::file_io::remove_if_exists;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the settings and configured accounts
    Show,

    /// Set or change the password required to delete the config
    SetPassword,

    /// Choose calendar or financial months
    SetMode {
        /// calendar or financial
        mode: String,

        /// First day of a financial month (1-31)
        #[arg(long)]
        start_day: Option<u32>,
    },

    /// Add an account, or replace one with the same ID
    AddAccount {
        /// Account ID as used in the ledger
        id: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Creation date (YYYY-MM-DD)
        #[arg(short, long)]
        created_on: String,

        /// Initial balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        initial: String,
    },

    /// Remove an account
    RemoveAccount {
        /// Account ID
        id: String,
    },

    /// Set the minimum level of stored log entries
    SetLogLevel {
        /// DEBUG, INFO, WARNING, ERROR or CRITICAL
        level: String,
    },
}

/// Handle a config command
pub fn handle_config_command(ctx: &mut CliContext, cmd: ConfigCommands) -> BalanceResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("Config file: {}", ctx.config_path.display());
            println!();
            print!("{}", format_settings(&ctx.settings));
        }

        ConfigCommands::SetPassword => {
            if let Some(stored) = &ctx.settings.password {
                let current = ctx.obtain_password("Current password: ")?;
                if !verify_password(&current, &stored.hash)? {
                    return Err(BalanceError::Auth("Incorrect password".into()));
                }
            }

            let password = ctx.obtain_password("New password: ")?;
            if ctx.password.is_none() {
                let confirm = ctx.obtain_password("Confirm password: ")?;
                if *password != *confirm {
                    return Err(BalanceError::Auth("Passwords do not match".into()));
                }
            }

            let hash = hash_password(&password)?;
            ctx.settings.set_password_hash(hash);
            ctx.save_settings()?;
            tracing::info!("Password updated");
            println!("Password set.");
        }

        ConfigCommands::SetMode { mode, start_day } => {
            let mode: MonthMode = mode.parse()?;
            ctx.settings.set_month_mode(mode, start_day)?;
            ctx.save_settings()?;
            tracing::info!(mode = %mode, start_day = ctx.settings.financial_start_day, "Month mode changed");

            match mode {
                MonthMode::Calendar => println!("Using calendar months."),
                MonthMode::Financial => println!(
                    "Using financial months starting on day {}.",
                    ctx.settings.financial_start_day
                ),
            }
        }

        ConfigCommands::AddAccount {
            id,
            name,
            created_on,
            initial,
        } => {
            let id: AccountId = id.parse()?;
            let created_on = parse_date(&created_on)?;
            let initial_balance = Money::parse(&initial).map_err(|e| {
                BalanceError::InvalidArgument(format!(
                    "Invalid initial balance '{}'. Use format like '1000.00' or '1000'. Error: {}",
                    initial, e
                ))
            })?;

            let account = AccountSettings {
                id: id.clone(),
                name,
                created_on,
                initial_balance,
            };
            match ctx.settings.accounts.iter_mut().find(|a| a.id == id) {
                Some(existing) => *existing = account,
                None => ctx.settings.accounts.push(account),
            }
            ctx.save_settings()?;
            tracing::info!(account = %id, "Account saved");

            println!("Saved account: {}", id);
            println!("  Created: {}", created_on);
            println!(
                "  Initial Balance: {}",
                initial_balance.format_with_symbol(&ctx.settings.currency_symbol)
            );
        }

        ConfigCommands::RemoveAccount { id } => {
            let id: AccountId = id.parse()?;
            ctx.settings.find_account(&id)?;
            ctx.settings.accounts.retain(|a| a.id != id);
            ctx.save_settings()?;
            tracing::info!(account = %id, "Account removed");
            println!("Removed account: {}", id);
        }

        ConfigCommands::SetLogLevel { level } => {
            let level: LogLevel = level.parse()?;
            ctx.settings.log_level = level;
            ctx.log_store.set_min_level(level);
            ctx.save_settings()?;
            println!("Log level set to {}.", level);
        }
    }

    Ok(())
}

/// Delete the config file after checking the stored password
///
/// Refused when the file does not exist, when no password was ever set, or
/// when the password does not match.
pub fn delete_config(ctx: &CliContext) -> BalanceResult<()> {
    if !ctx.config_path.exists() {
        return Err(BalanceError::NotFound {
            entity_type: "Config file",
            identifier: ctx.config_path.display().to_string(),
        });
    }

    let stored = ctx.settings.password.as_ref().ok_or_else(|| {
        BalanceError::Auth(
            "No password is set; run 'mabourse config set-password' before deleting the config"
                .into(),
        )
    })?;

    println!("Deleting the configuration requires your password.");
    let attempt = ctx.obtain_password("Password: ")?;
    if !verify_password(&attempt, &stored.hash)? {
        tracing::warn!("Config deletion refused: incorrect password");
        return Err(BalanceError::Auth("Incorrect password".into()));
    }

    remove_if_exists(&ctx.config_path)?;
    tracing::info!(path = %ctx.config_path.display(), "Config file deleted");
    println!("Config file '{}' deleted.", ctx.config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MaboursePaths, Settings};
    use crate::logging::LogStore;
    use tempfile::TempDir;
    use zeroize::Zeroizing;

    fn context(dir: &TempDir, password: Option<&str>) -> CliContext {
        let paths = MaboursePaths::with_base_dir(dir.path().to_path_buf());
        CliContext::new(paths.settings_file(), paths, Settings::default(), LogStore::default())
            .with_password(password.map(|p| Zeroizing::new(p.to_string())))
    }

    #[test]
    fn test_set_mode_persists() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir, None);

        handle_config_command(
            &mut ctx,
            ConfigCommands::SetMode {
                mode: "financial".into(),
                start_day: Some(25),
            },
        )
        .unwrap();

        let saved = Settings::load(&ctx.config_path).unwrap();
        assert_eq!(saved.month_mode, MonthMode::Financial);
        assert_eq!(saved.financial_start_day, 25);
    }

    #[test]
    fn test_add_and_remove_account() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir, None);

        handle_config_command(
            &mut ctx,
            ConfigCommands::AddAccount {
                id: "A".into(),
                name: "Checking".into(),
                created_on: "2024-01-01".into(),
                initial: "1000".into(),
            },
        )
        .unwrap();
        assert_eq!(ctx.settings.accounts.len(), 1);
        assert_eq!(ctx.settings.accounts[0].initial_balance, Money::from_units(1000));

        handle_config_command(&mut ctx, ConfigCommands::RemoveAccount { id: "A".into() }).unwrap();
        assert!(ctx.settings.accounts.is_empty());

        let err = handle_config_command(&mut ctx, ConfigCommands::RemoveAccount { id: "A".into() }).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_requires_password_hash() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, Some("correct horse"));
        ctx.save_settings().unwrap();

        assert!(matches!(delete_config(&ctx).unwrap_err(), BalanceError::Auth(_)));
        assert!(ctx.config_path.exists());
    }

    #[test]
    fn test_delete_with_wrong_password() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir, Some("correct horse"));
        handle_config_command(&mut ctx, ConfigCommands::SetPassword).unwrap();

        let ctx = ctx.with_password(Some(Zeroizing::new("wrong horse".to_string())));
        assert!(matches!(delete_config(&ctx).unwrap_err(), BalanceError::Auth(_)));
        assert!(ctx.config_path.exists());
    }

    #[test]
    fn test_delete_with_correct_password() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir, Some("correct horse"));
        handle_config_command(&mut ctx, ConfigCommands::SetPassword).unwrap();
        assert!(Settings::load(&ctx.config_path).unwrap().has_password());

        delete_config(&ctx).unwrap();
        assert!(!ctx.config_path.exists());
    }

    #[test]
    fn test_delete_missing_config() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, Some("correct horse"));
        assert!(delete_config(&ctx).unwrap_err().is_not_found());
    }
}
