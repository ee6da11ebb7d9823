use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StepFlowError};
use crate::logger::{LogSink, Logger, TracingSink};
use crate::state::StateStore;

/// An event published by a step, tagged with the trace it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub topic: String,
    pub data: Value,
    pub trace_id: String,
}

/// What a step sees while it runs: logger, state and trace id.
///
/// Cloning is cheap; clones share the state store, the log sink and the
/// emit buffer.
#[derive(Clone)]
pub struct StepContext {
    trace_id: String,
    step: Option<String>,
    sink: Arc<dyn LogSink>,
    logger: Logger,
    state: Arc<dyn StateStore>,
    emits: Arc<[String]>,
    emitted: Arc<Mutex<Vec<Event>>>,
}

impl StepContext {
    pub fn new(state: Arc<dyn StateStore>) -> Self {
        let trace_id = new_trace_id();
        let sink: Arc<dyn LogSink> = Arc::new(TracingSink);
        Self {
            logger: Logger::new(Arc::clone(&sink), trace_id.clone()),
            trace_id,
            step: None,
            sink,
            state,
            emits: Arc::from(Vec::new()),
            emitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self.rebuild_logger();
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self.rebuild_logger();
        self
    }

    /// Per-invocation view for one step: step-tagged logger, the step's declared
    /// topics and a fresh emit buffer.
    pub fn for_step(&self, step: &str, emits: Vec<String>) -> Self {
        let mut scoped = Self {
            trace_id: self.trace_id.clone(),
            step: Some(step.to_string()),
            sink: Arc::clone(&self.sink),
            logger: self.logger.clone(),
            state: Arc::clone(&self.state),
            emits: Arc::from(emits),
            emitted: Arc::new(Mutex::new(Vec::new())),
        };
        scoped.rebuild_logger();
        scoped
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn state(&self) -> &dyn StateStore {
        self.state.as_ref()
    }

    pub fn declared_emits(&self) -> &[String] {
        &self.emits
    }

    /// Buffers an event for the runtime. Only topics the step declared are accepted.
    pub fn emit(&self, topic: &str, data: Value) -> Result<()> {
        if !self.emits.iter().any(|declared| declared == topic) {
            return Err(StepFlowError::UndeclaredTopic {
                step: self.step.clone().unwrap_or_default(),
                topic: topic.to_string(),
            });
        }
        tracing::debug!(trace_id = %self.trace_id, topic, "event emitted");
        self.emitted.lock().push(Event {
            topic: topic.to_string(),
            data,
            trace_id: self.trace_id.clone(),
        });
        Ok(())
    }

    pub fn take_emitted(&self) -> Vec<Event> {
        std::mem::take(&mut *self.emitted.lock())
    }

    fn rebuild_logger(&mut self) {
        let logger = Logger::new(Arc::clone(&self.sink), self.trace_id.clone());
        self.logger = match &self.step {
            Some(step) => logger.with_step(step.clone()),
            None => logger,
        };
    }
}

impl fmt::Debug for StepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("trace_id", &self.trace_id)
            .field("step", &self.step)
            .field("emits", &self.emits)
            .finish_non_exhaustive()
    }
}

static TRACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Time-based trace id with a process-wide sequence suffix.
pub fn new_trace_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seq = TRACE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("trace-{}-{}-{}", now.as_secs(), now.subsec_nanos(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use serde_json::json;

    fn context() -> StepContext {
        StepContext::new(Arc::new(MemoryStateStore::new())).with_trace_id("t-1")
    }

    #[test]
    fn trace_ids_are_unique() {
        assert_ne!(new_trace_id(), new_trace_id());
    }

    #[test]
    fn scoped_context_keeps_trace_and_isolates_buffer() {
        let root = context();
        let scoped = root.for_step("Audit", vec!["order-audit-warning".into()]);

        assert_eq!(scoped.trace_id(), "t-1");
        assert_eq!(scoped.step(), Some("Audit"));
        scoped
            .emit("order-audit-warning", json!({"message": "late"}))
            .unwrap();

        assert!(root.take_emitted().is_empty());
        let events = scoped.take_emitted();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trace_id, "t-1");
        assert!(scoped.take_emitted().is_empty());
    }

    #[test]
    fn undeclared_topic_is_rejected() {
        let scoped = context().for_step("Audit", Vec::new());
        let err = scoped.emit("anything", json!(null)).unwrap_err();
        assert!(matches!(
            err,
            StepFlowError::UndeclaredTopic { ref step, ref topic } if step == "Audit" && topic == "anything"
        ));
    }
}
