use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{Result, StepFlowError};

/// 步骤状态存储 trait，按 group 与 key 两级寻址
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, group_id: &str, key: &str) -> Result<Option<Value>>;
    /// 返回该 key 之前存储的值
    async fn set(&self, group_id: &str, key: &str, value: Value) -> Result<Option<Value>>;
    async fn delete(&self, group_id: &str, key: &str) -> Result<Option<Value>>;
    async fn get_group(&self, group_id: &str) -> Result<Vec<Value>>;
    async fn clear(&self, group_id: &str) -> Result<()>;
}

/// 内存存储实现
///
/// 空 key 不会命中任何条目：调用方可用 `""` 表示缺失的 key，读取时得到 `None`
#[derive(Default)]
pub struct MemoryStateStore {
    inner: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, group_id: &str, key: &str) -> Result<Option<Value>> {
        if key.is_empty() {
            return Ok(None);
        }
        Ok(self
            .inner
            .read()
            .get(group_id)
            .and_then(|group| group.get(key))
            .cloned())
    }

    async fn set(&self, group_id: &str, key: &str, value: Value) -> Result<Option<Value>> {
        if key.is_empty() {
            return Err(StepFlowError::State(format!(
                "empty key in group `{group_id}`"
            )));
        }
        Ok(self
            .inner
            .write()
            .entry(group_id.to_string())
            .or_default()
            .insert(key.to_string(), value))
    }

    async fn delete(&self, group_id: &str, key: &str) -> Result<Option<Value>> {
        let mut inner = self.inner.write();
        let removed = inner.get_mut(group_id).and_then(|group| group.remove(key));
        if inner.get(group_id).is_some_and(HashMap::is_empty) {
            inner.remove(group_id);
        }
        Ok(removed)
    }

    async fn get_group(&self, group_id: &str) -> Result<Vec<Value>> {
        let inner = self.inner.read();
        let Some(group) = inner.get(group_id) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<_> = group.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Ok(entries.into_iter().map(|(_, value)| value.clone()).collect())
    }

    async fn clear(&self, group_id: &str) -> Result<()> {
        self.inner.write().remove(group_id);
        Ok(())
    }
}
