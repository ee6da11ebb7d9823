pub mod env;

pub use env::{EnvConfig, DEFAULT_MANIFEST, MANIFEST_ENV};
