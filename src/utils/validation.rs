use crate::error::{Result, StepFlowError};
use anyhow::anyhow;

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证步骤名称
    pub fn validate_step_name(name: &str, max_len: usize) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StepFlowError::Other(anyhow!("step name must not be empty")));
        }

        if name.chars().count() > max_len {
            return Err(StepFlowError::Other(anyhow!(
                "step name is too long. Maximum is {max_len} characters."
            )));
        }

        Ok(())
    }

    /// 验证路由路径
    pub fn validate_route_path(path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(StepFlowError::Other(anyhow!(
                "route path `{path}` must start with `/`"
            )));
        }

        if path.contains(char::is_whitespace) {
            return Err(StepFlowError::Other(anyhow!(
                "route path `{path}` must not contain whitespace"
            )));
        }

        Ok(())
    }

    /// 验证事件主题
    pub fn validate_topic(topic: &str) -> Result<()> {
        if topic.is_empty() {
            return Err(StepFlowError::Other(anyhow!("topic must not be empty")));
        }

        if topic.contains(char::is_whitespace) {
            tracing::warn!(topic = %topic, "topic contains whitespace");
        }

        Ok(())
    }
}
