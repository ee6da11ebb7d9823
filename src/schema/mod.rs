// 输入校验 Schema 模块

mod error;
mod schema;
mod validation;

pub use error::SchemaError;
pub use schema::{ObjectSchemaBuilder, Schema, SchemaKind};
