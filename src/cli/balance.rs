//! Balance CLI commands
//!
//! Implements the `balances`, `statement` and `forecast` commands.

use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};

use super::CliContext;
use crate::display::{format_forecast, format_monthly_balances, format_statement};
use crate::error::{BalanceError, BalanceResult};
use crate::export::{export_balances_csv, export_json, export_statement_csv, export_yaml, BalanceExport};
use crate::models::{parse_date, AccountId, AdjustmentRecord, Money, MonthKey, MonthMode, Transaction};
use crate::services::{accumulate, forecast_for_month, statement, BalanceRequest, BalanceService, PeriodResolver};
use crate::storage::{load_adjustments, load_transactions, MonthlyBalanceCache};

/// Output format of balance commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    Json,
    Yaml,
    /// CSV rows (not available for forecasts)
    Csv,
}

/// Options selecting what a balance computation covers
#[derive(Args, Debug, Clone, Default)]
pub struct BalanceSelection {
    /// Account ID; all accounts are consolidated when omitted
    #[arg(short, long)]
    pub account: Option<String>,

    /// Last date to include (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Month convention (calendar or financial), overriding the settings
    #[arg(short, long)]
    pub mode: Option<String>,

    /// First day of a financial month (1-31), overriding the settings
    #[arg(long)]
    pub start_day: Option<u32>,

    /// Start date, overriding the account creation date
    #[arg(long)]
    pub since: Option<String>,

    /// Starting balance, overriding the configured one
    #[arg(long, allow_hyphen_values = true)]
    pub initial: Option<String>,

    /// Transaction ledger (CSV or JSON), overriding the settings
    #[arg(long)]
    pub transactions: Option<PathBuf>,

    /// Adjustment file (CSV or JSON), overriding the settings
    #[arg(long)]
    pub adjustments: Option<PathBuf>,

    /// Ignore manual balance adjustments
    #[arg(long)]
    pub no_adjustments: bool,
}

/// Everything a balance computation needs, loaded and validated
#[derive(Debug)]
pub struct BalanceInputs {
    pub transactions: Vec<Transaction>,
    pub adjustments: Option<Vec<AdjustmentRecord>>,
    pub request: BalanceRequest,
}

impl BalanceSelection {
    /// Resolve the month convention from the options and the settings
    pub fn resolver(&self, ctx: &CliContext) -> BalanceResult<PeriodResolver> {
        let mode = match &self.mode {
            Some(mode) => mode.parse::<MonthMode>()?,
            None => ctx.settings.month_mode,
        };
        let start_day = self.start_day.unwrap_or(ctx.settings.financial_start_day);
        PeriodResolver::new(mode, start_day)
    }

    /// Build the balance request from the options and the settings
    pub fn request(&self, ctx: &CliContext) -> BalanceResult<BalanceRequest> {
        let resolver = self.resolver(ctx)?;
        let since = self.since.as_deref().map(parse_date).transpose()?;
        let initial = self
            .initial
            .as_deref()
            .map(|s| {
                Money::parse(s).map_err(|e| {
                    BalanceError::InvalidArgument(format!("Invalid initial balance '{}': {}", s, e))
                })
            })
            .transpose()?;
        let end_date = match &self.end {
            Some(end) => parse_date(end)?,
            None => today(),
        };

        let (account_id, creation_date, initial_balance) = match &self.account {
            Some(id) => {
                let id: AccountId = id.parse()?;
                let (created_on, configured_initial) = match ctx.settings.find_account(&id) {
                    Ok(account) => (Some(account.created_on), account.initial_balance),
                    Err(e) if since.is_some() => {
                        tracing::debug!("{}; using the command line start date", e);
                        (None, Money::zero())
                    }
                    Err(e) => return Err(e),
                };
                let creation = since.or(created_on).ok_or_else(|| {
                    BalanceError::Config(format!("No creation date for account '{}'", id))
                })?;
                (Some(id), creation, initial.unwrap_or(configured_initial))
            }
            None => {
                let creation = since.or_else(|| ctx.settings.earliest_creation()).ok_or_else(|| {
                    BalanceError::Config(
                        "No accounts configured; pass --since to set the start date".into(),
                    )
                })?;
                (None, creation, initial.unwrap_or_else(|| ctx.settings.total_initial_balance()))
            }
        };

        let mut request = BalanceRequest::new(creation_date, initial_balance, resolver, end_date);
        request.account_id = account_id;
        Ok(request)
    }

    fn transactions_path(&self, ctx: &CliContext) -> PathBuf {
        match (&self.transactions, &ctx.settings.transactions_file) {
            (Some(path), _) => path.clone(),
            (None, Some(configured)) => ctx.paths.resolve(configured),
            (None, None) => ctx.paths.transactions_file(),
        }
    }

    fn adjustments_path(&self, ctx: &CliContext) -> PathBuf {
        match (&self.adjustments, &ctx.settings.adjustments_file) {
            (Some(path), _) => path.clone(),
            (None, Some(configured)) => ctx.paths.resolve(configured),
            (None, None) => ctx.paths.adjustments_file(),
        }
    }

    /// Load the ledger and adjustments and build the request
    pub fn load(&self, ctx: &CliContext) -> BalanceResult<BalanceInputs> {
        let request = self.request(ctx)?;
        let transactions = load_transactions(&self.transactions_path(ctx))?;
        let adjustments = if self.no_adjustments {
            None
        } else {
            let path = self.adjustments_path(ctx);
            match load_adjustments(&path) {
                Ok(adjustments) => adjustments,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Ignoring balance adjustments: {}", e);
                    None
                }
            }
        };

        Ok(BalanceInputs {
            transactions,
            adjustments,
            request,
        })
    }
}

/// Handle the `balances` command
///
/// With `month`, prints the balance of that single month.
pub fn handle_balances_command(
    ctx: &CliContext,
    selection: &BalanceSelection,
    month: Option<&str>,
    format: OutputFormat,
) -> BalanceResult<()> {
    let inputs = selection.load(ctx)?;
    let symbol = &ctx.settings.currency_symbol;

    if let Some(month) = month {
        let key = MonthKey::parse(month)?;
        let cache = MonthlyBalanceCache::new();
        let mut service = BalanceService::new(&inputs.transactions, inputs.request.clone(), &cache);
        if let Some(adjustments) = &inputs.adjustments {
            service = service.with_adjustments(adjustments);
        }
        let balance = service.balance_for(&key)?;
        println!("{}  {}", key, balance.format_with_symbol(symbol));
        return Ok(());
    }

    let balances = accumulate(
        &inputs.transactions,
        &inputs.request,
        inputs.adjustments.as_deref(),
    )?;

    match format {
        OutputFormat::Table => print!("{}", format_monthly_balances(&balances, symbol)),
        OutputFormat::Csv => export_balances_csv(&balances, io::stdout().lock())?,
        OutputFormat::Json | OutputFormat::Yaml => {
            let export = BalanceExport {
                account: inputs.request.account_id.clone(),
                mode: inputs.request.resolver.mode(),
                financial_start_day: inputs.request.resolver.financial_start_day(),
                balances,
            };
            if format == OutputFormat::Json {
                export_json(&export, &mut io::stdout().lock())?;
            } else {
                export_yaml(&export, &mut io::stdout().lock())?;
            }
        }
    }

    Ok(())
}

/// Handle the `statement` command
pub fn handle_statement_command(
    ctx: &CliContext,
    selection: &BalanceSelection,
    format: OutputFormat,
) -> BalanceResult<()> {
    let inputs = selection.load(ctx)?;
    let rows = statement(
        &inputs.transactions,
        &inputs.request,
        inputs.adjustments.as_deref(),
    )?;

    match format {
        OutputFormat::Table => print!("{}", format_statement(&rows, &ctx.settings.currency_symbol)),
        OutputFormat::Csv => export_statement_csv(&rows, io::stdout().lock())?,
        OutputFormat::Json => export_json(&rows, &mut io::stdout().lock())?,
        OutputFormat::Yaml => export_yaml(&rows, &mut io::stdout().lock())?,
    }

    Ok(())
}

/// Handle the `forecast` command
pub fn handle_forecast_command(
    ctx: &CliContext,
    month: &str,
    selection: &BalanceSelection,
    format: OutputFormat,
) -> BalanceResult<()> {
    let key = MonthKey::parse(month)?;
    let inputs = selection.load(ctx)?;
    let forecast = forecast_for_month(
        &inputs.transactions,
        &inputs.request,
        key,
        inputs.adjustments.as_deref(),
    )?;

    match format {
        OutputFormat::Table => print!("{}", format_forecast(&forecast, &ctx.settings.currency_symbol)),
        OutputFormat::Json => export_json(&forecast, &mut io::stdout().lock())?,
        OutputFormat::Yaml => export_yaml(&forecast, &mut io::stdout().lock())?,
        OutputFormat::Csv => {
            return Err(BalanceError::InvalidArgument(
                "CSV output is not available for forecasts".into(),
            ))
        }
    }

    Ok(())
}

/// Today in local time
fn today() -> NaiveDate {
    Local::now().date_naive()
}
