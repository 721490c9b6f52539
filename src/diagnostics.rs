//! Recent log — a `log` backend that keeps the last few records in memory
//! and echoes them to stderr.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::SystemTime;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// One captured log record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Bounded buffer of recent log records.
#[derive(Debug)]
pub struct RecentLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    level: LevelFilter,
    echo: bool,
}

impl RecentLog {
    /// Keep up to `capacity` records at `level` or more severe.
    pub fn new(capacity: usize, level: LevelFilter) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            level,
            echo: true,
        }
    }

    /// Whether records are also written to stderr.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Install as the global logger. Can only succeed once per process.
    pub fn install(self) -> Result<&'static RecentLog, SetLoggerError> {
        let level = self.level;
        let logger: &'static RecentLog = Box::leak(Box::new(self));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(logger)
    }

    fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The `n` most recent records, newest last.
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Log for RecentLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        if self.echo {
            eprintln!("[{}] {}", record.level(), message);
        }
        self.push(LogEntry {
            timestamp: SystemTime::now(),
            level: record.level(),
            target: record.target().to_string(),
            message,
        });
    }

    fn flush(&self) {}
}
