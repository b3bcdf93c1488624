//! Context system for grid operations providing logging and profiling
//!
//! Builders and persistence accept a context so hosting code can inspect what
//! a build did and where the time went without wiring up a global logger.

use std::collections::HashMap;
use std::time::Duration;
use web_time::Instant;

/// Log level for context messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug level messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warning messages
    Warning = 2,
    /// Error messages
    Error = 3,
}

/// Timer categories for performance profiling
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerCategory {
    /// Total grid generation time
    Total,
    /// Column raycast sampling
    Sampling,
    /// Node emission from column stacks
    NodeGeneration,
    /// Neighbor wiring
    Adjacency,
    /// Grid save/load
    Persistence,
    /// Custom user-defined timer
    Custom(String),
}

/// Log entry containing message and metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp when the log was created
    pub timestamp: Instant,
    /// Log message
    pub message: String,
}

/// Completed timer measurement
#[derive(Debug, Clone)]
struct TimerEntry {
    duration: Duration,
    count: usize,
}

/// Context for grid operations providing logging and profiling
#[derive(Debug)]
pub struct BuildContext {
    logs: Vec<LogEntry>,
    active_timers: HashMap<TimerCategory, Instant>,
    timers: HashMap<TimerCategory, TimerEntry>,
    min_log_level: LogLevel,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    /// Creates a new context recording Info and above
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            active_timers: HashMap::new(),
            timers: HashMap::new(),
            min_log_level: LogLevel::Info,
        }
    }

    /// Creates a context recording only messages at or above `level`
    pub fn with_min_level(level: LogLevel) -> Self {
        Self {
            min_log_level: level,
            ..Self::new()
        }
    }

    /// Records a log message at the given level
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if level < self.min_log_level {
            return;
        }
        self.logs.push(LogEntry {
            level,
            timestamp: Instant::now(),
            message: message.into(),
        });
    }

    /// Records a debug message
    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    /// Records an informational message
    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Records a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Records an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Starts (or restarts) the timer for a category
    pub fn start_timer(&mut self, category: TimerCategory) {
        self.active_timers.insert(category, Instant::now());
    }

    /// Stops the timer for a category, accumulating its duration
    pub fn stop_timer(&mut self, category: TimerCategory) {
        if let Some(start) = self.active_timers.remove(&category) {
            let elapsed = start.elapsed();
            let entry = self.timers.entry(category).or_insert(TimerEntry {
                duration: Duration::ZERO,
                count: 0,
            });
            entry.duration += elapsed;
            entry.count += 1;
        }
    }

    /// Accumulated duration for a category, if it was ever stopped
    pub fn timer(&self, category: &TimerCategory) -> Option<Duration> {
        self.timers.get(category).map(|t| t.duration)
    }

    /// Number of times a category's timer completed
    pub fn timer_count(&self, category: &TimerCategory) -> usize {
        self.timers.get(category).map_or(0, |t| t.count)
    }

    /// All recorded log entries, oldest first
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Drops all recorded logs and timers
    pub fn clear(&mut self) {
        self.logs.clear();
        self.active_timers.clear();
        self.timers.clear();
    }
}
