//! Logging for Mabourse
//!
//! The crate emits diagnostics through `tracing`. `LogStore` keeps a bounded
//! history of those events as `LogEntry`s, persisted as JSON lines and
//! exportable as JSON, CSV or text.

pub mod entry;
pub mod export;
pub mod store;
pub mod subscriber;

pub use entry::{LogEntry, LogLevel};
pub use export::{export_entries, export_to_file, ExportFormat};
pub use store::{LogStore, DEFAULT_MAX_ENTRIES};
pub use subscriber::init_tracing;
