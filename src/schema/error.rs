use thiserror::Error;

/// Schema 错误类型
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema validation failed at `{}`: {message}", display_path(path))]
    Validation { message: String, path: Vec<String> },
}

impl SchemaError {
    pub(crate) fn validation(message: impl Into<String>, path: &[String]) -> Self {
        SchemaError::Validation {
            message: message.into(),
            path: path.to_vec(),
        }
    }

    pub fn path(&self) -> &[String] {
        match self {
            SchemaError::Validation { path, .. } => path,
        }
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        format!("$.{}", path.join("."))
    }
}
