use crate::error::{Result, StepFlowError};
use anyhow::anyhow;
use std::env;
use std::path::PathBuf;

pub const DEBUG_ENV: &str = "STEPFLOW_DEBUG";
pub const MANIFEST_ENV: &str = "STEPFLOW_MANIFEST";
pub const DEFAULT_MANIFEST: &str = "steps.json";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            StepFlowError::Other(anyhow!("environment variable `{}` is not set", key))
        })
    }

    /// 获取可选的环境变量，空值视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var(DEBUG_ENV).is_ok()
    }

    /// 清单路径优先级：
    /// 1. 命令行参数
    /// 2. 环境变量 STEPFLOW_MANIFEST
    /// 3. 默认 steps.json
    pub fn resolve_manifest_path(cli_value: Option<PathBuf>) -> PathBuf {
        cli_value
            .or_else(|| Self::get_env_optional(MANIFEST_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST))
    }
}
