//! 通用工具：日志初始化与配置校验

pub mod logging;
pub mod validation;

pub use logging::LoggingConfig;
pub use validation::ConfigValidator;
