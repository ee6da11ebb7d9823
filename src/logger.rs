use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// One log line written by a step.
#[derive(Clone, Debug, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Destination for step log records.
pub trait LogSink: Send + Sync {
    fn write(&self, record: LogRecord);
}

/// Forwards step logs to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: LogRecord) {
        let step = record.step.as_deref().unwrap_or("-");
        let data = record
            .data
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();
        match record.level {
            LogLevel::Debug => {
                tracing::debug!(trace_id = %record.trace_id, step, data = %data, "{}", record.message)
            }
            LogLevel::Info => {
                tracing::info!(trace_id = %record.trace_id, step, data = %data, "{}", record.message)
            }
            LogLevel::Warn => {
                tracing::warn!(trace_id = %record.trace_id, step, data = %data, "{}", record.message)
            }
            LogLevel::Error => {
                tracing::error!(trace_id = %record.trace_id, step, data = %data, "{}", record.message)
            }
        }
    }
}

/// Step-facing logger. Stamps every record with the trace id and step name.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    trace_id: String,
    step: Option<String>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>, trace_id: impl Into<String>) -> Self {
        Self {
            sink,
            trace_id: trace_id.into(),
            step: None,
        }
    }

    pub fn with_step(&self, step: impl Into<String>) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            trace_id: self.trace_id.clone(),
            step: Some(step.into()),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn log(&self, level: LogLevel, message: &str, data: Option<Value>) {
        self.sink.write(LogRecord {
            level,
            trace_id: self.trace_id.clone(),
            step: self.step.clone(),
            message: message.to_string(),
            data,
        });
    }

    pub fn debug(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Debug, message, data);
    }

    pub fn info(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Info, message, data);
    }

    pub fn warn(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    pub fn error(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Error, message, data);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("trace_id", &self.trace_id)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct Capture(Mutex<Vec<LogRecord>>);

    impl LogSink for Capture {
        fn write(&self, record: LogRecord) {
            self.0.lock().push(record);
        }
    }

    #[test]
    fn records_carry_trace_and_step() {
        let sink = Arc::new(Capture::default());
        let logger = Logger::new(sink.clone(), "trace-1").with_step("Audit");

        logger.warn("late order", Some(json!({"id": 7})));
        logger.info("done", None);

        let records = sink.0.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[0].trace_id, "trace-1");
        assert_eq!(records[0].step.as_deref(), Some("Audit"));
        assert_eq!(records[0].data, Some(json!({"id": 7})));
        assert!(records[1].data.is_none());
    }
}
