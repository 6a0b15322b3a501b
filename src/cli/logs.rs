//! Log CLI commands

use std::io;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::CliContext;
use crate::error::BalanceResult;
use crate::logging::{export_entries, export_to_file, ExportFormat, LogLevel};
use crate::storage::file_io::remove_if_exists;

/// Log export formats accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl From<LogFormat> for ExportFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => ExportFormat::Json,
            LogFormat::Csv => ExportFormat::Csv,
            LogFormat::Txt => ExportFormat::Txt,
        }
    }
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogsCommands {
    /// Export stored log entries
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: LogFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export entries at or above this level
        #[arg(long)]
        level: Option<String>,
    },

    /// Show the most recent entries
    Tail {
        /// Number of entries
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Delete all stored log entries
    Clear,
}

/// Handle a logs command
pub fn handle_logs_command(ctx: &CliContext, cmd: LogsCommands) -> BalanceResult<()> {
    match cmd {
        LogsCommands::Export {
            format,
            output,
            level,
        } => {
            let entries = match level {
                Some(level) => ctx.log_store.entries_at_least(level.parse::<LogLevel>()?),
                None => ctx.log_store.entries(),
            };

            match output {
                Some(path) => {
                    export_to_file(&entries, format.into(), &path)?;
                    println!("Exported {} log entries to {}", entries.len(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    export_entries(&entries, format.into(), &mut handle)?;
                }
            }
        }

        LogsCommands::Tail { count } => {
            let entries = ctx.log_store.entries();
            let skip = entries.len().saturating_sub(count);
            if entries.is_empty() {
                println!("No log entries.");
            }
            for entry in entries.iter().skip(skip) {
                println!("{}", entry.format_line());
            }
        }

        LogsCommands::Clear => {
            let count = ctx.log_store.len();
            ctx.log_store.clear();
            remove_if_exists(ctx.paths.log_file())?;
            println!("Cleared {} log entries.", count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MaboursePaths, Settings};
    use crate::logging::LogStore;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> CliContext {
        let paths = MaboursePaths::with_base_dir(dir.path().to_path_buf());
        let store = LogStore::default();
        store.info("mabourse::services::balance", "computed balances");
        store.warning("mabourse::services::balance", "Ignoring balance adjustments");
        CliContext::new(paths.settings_file(), paths, Settings::default(), store)
    }

    #[test]
    fn test_export_to_file_filters_by_level() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let output = dir.path().join("logs.csv");

        handle_logs_command(
            &ctx,
            LogsCommands::Export {
                format: LogFormat::Csv,
                output: Some(output.clone()),
                level: Some("warning".into()),
            },
        )
        .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "timestamp,level,module,message");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(",WARNING,"));
    }

    #[test]
    fn test_export_rejects_unknown_level() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let err = handle_logs_command(
            &ctx,
            LogsCommands::Export {
                format: LogFormat::Json,
                output: None,
                level: Some("loud".into()),
            },
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        ctx.log_store.persist(&ctx.paths.log_file()).unwrap();
        assert!(ctx.paths.log_file().exists());

        handle_logs_command(&ctx, LogsCommands::Clear).unwrap();
        assert!(ctx.log_store.is_empty());
        assert!(!ctx.paths.log_file().exists());
    }
}
