//! Bounded in-memory log store
//!
//! `LogStore` is a cheap cloneable handle; every clone shares the same
//! buffer. It is also a `tracing_subscriber::Layer`, so events emitted with
//! the `tracing` macros anywhere in the crate are captured once the store is
//! added to a subscriber.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::entry::{LogEntry, LogLevel};
use crate::error::BalanceResult;
use crate::storage::file_io::{append_json_lines, read_json_lines};

/// Default capacity of a store
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug)]
struct Buffer {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    min_level: LogLevel,
    /// Number of newest entries not yet written by `persist`
    unsaved: usize,
}

/// Shared, bounded store of log entries
#[derive(Debug, Clone)]
pub struct LogStore {
    buffer: Arc<Mutex<Buffer>>,
}

impl LogStore {
    /// Create a store keeping at most `max_entries` entries at or above `min_level`
    pub fn new(max_entries: usize, min_level: LogLevel) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Buffer {
                entries: VecDeque::new(),
                max_entries: max_entries.max(1),
                min_level,
                unsaved: 0,
            })),
        }
    }

    /// Create a store pre-filled with the entries persisted at `path`
    pub fn load(path: &Path, max_entries: usize, min_level: LogLevel) -> BalanceResult<Self> {
        let store = Self::new(max_entries, min_level);
        let entries: Vec<LogEntry> = read_json_lines(path)?;
        {
            let mut buffer = store.lock();
            let skip = entries.len().saturating_sub(buffer.max_entries);
            buffer.entries.extend(entries.into_iter().skip(skip));
        }
        Ok(store)
    }

    /// Append entries recorded since the last persist to a JSON lines file
    pub fn persist(&self, path: &Path) -> BalanceResult<()> {
        let pending: Vec<LogEntry> = {
            let buffer = self.lock();
            let start = buffer.entries.len() - buffer.unsaved;
            buffer.entries.iter().skip(start).cloned().collect()
        };

        append_json_lines(path, &pending)?;
        let mut buffer = self.lock();
        buffer.unsaved = buffer.unsaved.saturating_sub(pending.len());
        Ok(())
    }

    /// Record an entry; entries below the minimum level are dropped
    pub fn push(&self, entry: LogEntry) {
        let mut buffer = self.lock();
        if entry.level < buffer.min_level {
            return;
        }

        buffer.entries.push_back(entry);
        buffer.unsaved += 1;
        while buffer.entries.len() > buffer.max_entries {
            buffer.entries.pop_front();
        }
        buffer.unsaved = buffer.unsaved.min(buffer.entries.len());
    }

    pub fn log(&self, level: LogLevel, module: &str, message: impl Into<String>) {
        self.push(LogEntry::new(level, module, message));
    }

    pub fn debug(&self, module: &str, message: impl Into<String>) {
        self.log(LogLevel::Debug, module, message);
    }

    pub fn info(&self, module: &str, message: impl Into<String>) {
        self.log(LogLevel::Info, module, message);
    }

    pub fn warning(&self, module: &str, message: impl Into<String>) {
        self.log(LogLevel::Warning, module, message);
    }

    pub fn error(&self, module: &str, message: impl Into<String>) {
        self.log(LogLevel::Error, module, message);
    }

    pub fn critical(&self, module: &str, message: impl Into<String>) {
        self.log(LogLevel::Critical, module, message);
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Entries at or above `level`, oldest first
    pub fn entries_at_least(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.level >= level)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut buffer = self.lock();
        buffer.entries.clear();
        buffer.unsaved = 0;
    }

    pub fn min_level(&self) -> LogLevel {
        self.lock().min_level
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.lock().min_level = level;
    }

    pub fn max_entries(&self) -> usize {
        self.lock().max_entries
    }

    fn lock(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, LogLevel::Debug)
    }
}

impl<S: Subscriber> Layer<S> for LogStore {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = LogLevel::from(*metadata.level());
        if level < self.min_level() {
            return;
        }

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let mut entry = LogEntry::new(level, metadata.target(), visitor.message);
        if !visitor.fields.is_empty() {
            entry = entry.with_data(Value::Object(visitor.fields));
        }
        self.push(entry);
    }
}

/// Collects the message and structured fields of an event
#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EntryVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}
