// 状态存储模块

mod store;

pub use store::{MemoryStateStore, StateStore};
