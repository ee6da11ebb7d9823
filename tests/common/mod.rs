#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use stepflow::{LogRecord, LogSink, MemoryStateStore, StateStore, StepContext};

#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, record: LogRecord) {
        self.records.lock().push(record);
    }
}

/// Memory store that remembers every `get` it served.
#[derive(Default)]
pub struct RecordingStateStore {
    inner: MemoryStateStore,
    gets: Mutex<Vec<(String, String)>>,
}

impl RecordingStateStore {
    pub fn gets(&self) -> Vec<(String, String)> {
        self.gets.lock().clone()
    }
}

#[async_trait]
impl StateStore for RecordingStateStore {
    async fn get(&self, group_id: &str, key: &str) -> stepflow::Result<Option<Value>> {
        self.gets
            .lock()
            .push((group_id.to_string(), key.to_string()));
        self.inner.get(group_id, key).await
    }

    async fn set(&self, group_id: &str, key: &str, value: Value) -> stepflow::Result<Option<Value>> {
        self.inner.set(group_id, key, value).await
    }

    async fn delete(&self, group_id: &str, key: &str) -> stepflow::Result<Option<Value>> {
        self.inner.delete(group_id, key).await
    }

    async fn get_group(&self, group_id: &str) -> stepflow::Result<Vec<Value>> {
        self.inner.get_group(group_id).await
    }

    async fn clear(&self, group_id: &str) -> stepflow::Result<()> {
        self.inner.clear(group_id).await
    }
}

pub struct Harness {
    pub sink: Arc<RecordingSink>,
    pub state: Arc<RecordingStateStore>,
    pub ctx: StepContext,
}

pub fn harness(trace_id: &str) -> Harness {
    let sink = Arc::new(RecordingSink::default());
    let state = Arc::new(RecordingStateStore::default());
    let ctx = StepContext::new(state.clone())
        .with_trace_id(trace_id)
        .with_log_sink(sink.clone());
    Harness { sink, state, ctx }
}
