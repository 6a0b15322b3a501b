use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use mabourse::cli::{
    delete_config, handle_balances_command, handle_config_command, handle_forecast_command,
    handle_logs_command, handle_period_command, handle_statement_command, BalanceSelection,
    CliContext, ConfigCommands, LogsCommands, OutputFormat,
};
use mabourse::config::{MaboursePaths, Settings};
use mabourse::logging::{init_tracing, LogLevel, LogStore};

#[derive(Parser)]
#[command(
    name = "mabourse",
    version,
    about = "Monthly account balances over calendar or financial months",
    long_about = "Mabourse computes end-of-month balances of your accounts from a \
                  transaction ledger, using either calendar months or financial \
                  months that start on a fixed day (e.g. payday)."
)]
struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "MABOURSE_CONFIG")]
    config_path: Option<PathBuf>,

    /// Delete the settings file (asks for the password)
    #[arg(long)]
    delete_config: bool,

    /// Password for protected operations, instead of prompting
    #[arg(long, global = true, hide = true, env = "MABOURSE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show end-of-month balances
    #[command(alias = "bal")]
    Balances {
        #[command(flatten)]
        selection: BalanceSelection,

        /// Only show the balance of this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show income, expenses and transfers per month
    Statement {
        #[command(flatten)]
        selection: BalanceSelection,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the period of a date or month (YYYY-MM-DD or YYYY-MM)
    Period {
        target: String,

        /// Number of consecutive periods to show
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        #[command(flatten)]
        selection: BalanceSelection,
    },

    /// Forecast the closing balance of a month (YYYY-MM)
    Forecast {
        month: String,

        #[command(flatten)]
        selection: BalanceSelection,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Settings and accounts
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Stored log entries
    #[command(subcommand)]
    Logs(LogsCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (paths, config_path) = match &cli.config_path {
        Some(path) => (MaboursePaths::for_config_file(path), path.clone()),
        None => {
            let paths = MaboursePaths::new()?;
            let path = paths.settings_file();
            (paths, path)
        }
    };
    let settings = Settings::load_or_create(&config_path)?;

    let log_file = paths.log_file();
    let log_store = LogStore::load(&log_file, settings.max_log_entries, settings.log_level)
        .unwrap_or_else(|e| {
            eprintln!("Warning: could not read {}: {}", log_file.display(), e);
            LogStore::new(settings.max_log_entries, settings.log_level)
        });
    // stderr only; the store applies settings.log_level
    init_tracing(&log_store, LogLevel::Warning)?;

    let mut ctx = CliContext::new(config_path, paths, settings, log_store.clone())
        .with_password(cli.password.map(Zeroizing::new));

    let outcome = run(&mut ctx, cli.command, cli.delete_config);
    if let Err(e) = &outcome {
        log_store.error("mabourse", e.to_string());
    }
    if let Err(e) = log_store.persist(&log_file) {
        eprintln!("Warning: could not save logs: {}", e);
    }

    outcome.map_err(Into::into)
}

fn run(ctx: &mut CliContext, command: Option<Commands>, delete: bool) -> mabourse::BalanceResult<()> {
    if delete {
        if command.is_some() {
            return Err(mabourse::BalanceError::InvalidArgument(
                "--delete-config cannot be combined with a command".into(),
            ));
        }
        return delete_config(ctx);
    }

    match command {
        Some(Commands::Balances {
            selection,
            month,
            format,
        }) => handle_balances_command(ctx, &selection, month.as_deref(), format),
        Some(Commands::Statement { selection, format }) => {
            handle_statement_command(ctx, &selection, format)
        }
        Some(Commands::Period {
            target,
            count,
            selection,
        }) => handle_period_command(ctx, &target, count, &selection),
        Some(Commands::Forecast {
            month,
            selection,
            format,
        }) => handle_forecast_command(ctx, &month, &selection, format),
        Some(Commands::Config(cmd)) => handle_config_command(ctx, cmd),
        Some(Commands::Logs(cmd)) => handle_logs_command(ctx, cmd),
        None => {
            println!("Mabourse - monthly account balances");
            println!();
            println!("Run 'mabourse --help' for usage information.");
            println!("Run 'mabourse config add-account' to register an account.");
            Ok(())
        }
    }
}
