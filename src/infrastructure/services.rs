//! Logging sinks and clocks behind the domain logging traits.

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use std::sync::{Arc, Mutex};

/// Writes to the browser console on wasm32, stderr elsewhere
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.format_line();

        #[cfg(target_arch = "wasm32")]
        {
            let value = wasm_bindgen::JsValue::from_str(&line);
            match entry.level {
                LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&value),
                LogLevel::Info => web_sys::console::info_1(&value),
                LogLevel::Warn => web_sys::console::warn_1(&value),
                LogLevel::Error => web_sys::console::error_1(&value),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{}", line);
    }
}

/// Keeps entries in memory; cloned handles share the same buffer
#[derive(Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

/// Wall-clock milliseconds: `Date.now()` in the browser, `SystemTime` natively
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTimeProvider;

impl ClockTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for ClockTimeProvider {
    fn current_timestamp(&self) -> u64 {
        #[cfg(target_arch = "wasm32")]
        {
            js_sys::Date::now() as u64
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        }
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        chrono::DateTime::from_timestamp_millis(timestamp as i64)
            .map(|time| time.format("%H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| timestamp.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logging::LogComponent;

    #[test]
    fn memory_logger_captures_entries() {
        let logger = MemoryLogger::new();
        logger.warn(LogComponent::Infrastructure("Test"), "slow settlement");
        logger.info(LogComponent::Infrastructure("Test"), "ok");
        assert_eq!(logger.messages_at(LogLevel::Warn), vec!["slow settlement".to_string()]);
        logger.clear();
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn clock_formats_milliseconds() {
        assert_eq!(ClockTimeProvider.format_timestamp(3_723_004), "01:02:03.004");
    }
}
