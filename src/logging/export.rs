//! Log export
//!
//! Writes log entries as pretty JSON, as CSV with the columns
//! `timestamp,level,module,message`, or as plain text lines.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use super::entry::LogEntry;
use crate::error::{BalanceError, BalanceResult};

/// Output format of a log export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(BalanceError::InvalidArgument(format!(
                "unsupported log export format '{}'",
                other
            ))),
        }
    }
}

/// Write entries to a writer in the given format
pub fn export_entries<W: Write>(
    entries: &[LogEntry],
    format: ExportFormat,
    writer: &mut W,
) -> BalanceResult<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, entries)?;
            writeln!(writer).map_err(export_error)?;
        }
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *writer);
            csv_writer.write_record(["timestamp", "level", "module", "message"])?;
            for entry in entries {
                let timestamp = entry.timestamp.to_rfc3339();
                csv_writer.write_record([
                    timestamp.as_str(),
                    entry.level.as_str(),
                    &entry.module,
                    &entry.message,
                ])?;
            }
            csv_writer.flush().map_err(export_error)?;
        }
        ExportFormat::Txt => {
            for entry in entries {
                writeln!(writer, "{}", entry.format_line()).map_err(export_error)?;
            }
        }
    }

    writer.flush().map_err(export_error)
}

/// Write entries to a file, creating or truncating it
pub fn export_to_file(entries: &[LogEntry], format: ExportFormat, path: &Path) -> BalanceResult<()> {
    let file = File::create(path).map_err(|e| {
        BalanceError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export_entries(entries, format, &mut writer)
}

fn export_error(e: std::io::Error) -> BalanceError {
    BalanceError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn entries() -> Vec<LogEntry> {
        let mut first = LogEntry::new(LogLevel::Info, "ledger", "Loaded transactions");
        first.timestamp = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let mut second = LogEntry::new(LogLevel::Warning, "balance", "Field \"AdjustedBalance\" missing, row 2");
        second.timestamp = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 1).unwrap();
        vec![first, second]
    }

    fn render(format: ExportFormat) -> String {
        let mut out = Vec::new();
        export_entries(&entries(), format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("xml".parse::<ExportFormat>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_export_json() {
        let out = render(ExportFormat::Json);
        let parsed: Vec<LogEntry> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, entries());
    }

    #[test]
    fn test_export_csv_quotes_fields() {
        let out = render(ExportFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "timestamp,level,module,message");
        assert_eq!(lines[1], "2024-02-01T09:00:00+00:00,INFO,ledger,Loaded transactions");
        assert_eq!(
            lines[2],
            r#"2024-02-01T09:00:01+00:00,WARNING,balance,"Field ""AdjustedBalance"" missing, row 2""#
        );
    }

    #[test]
    fn test_export_csv_reads_back_multiline_messages() {
        let mut entries = entries();
        entries[0].message = "first line\nsecond, \"quoted\" line".to_string();

        let mut out = Vec::new();
        export_entries(&entries, ExportFormat::Csv, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "first line\nsecond, \"quoted\" line");
        assert_eq!(&rows[1][1], "WARNING");
    }

    #[test]
    fn test_export_txt() {
        let out = render(ExportFormat::Txt);
        assert_eq!(
            out.lines().next().unwrap(),
            "[2024-02-01 09:00:00.000] INFO - ledger: Loaded transactions"
        );
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs.csv");
        export_to_file(&entries(), ExportFormat::Csv, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);
    }
}
