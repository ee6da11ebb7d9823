use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StepFlowError};

use super::method::HttpMethod;

/// Route key: `"<METHOD> <path>"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    method: HttpMethod,
    path: String,
}

impl RouteKey {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(StepFlowError::InvalidRouteKey(format!("{method} {path}")));
        }
        Ok(Self { method, path })
    }

    /// Splits on the first run of whitespace; the method part is case-insensitive.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (method, path) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| StepFlowError::InvalidRouteKey(raw.to_string()))?;
        let method: HttpMethod = method
            .parse()
            .map_err(|_| StepFlowError::InvalidRouteKey(raw.to_string()))?;
        let path = path.trim_start();
        if path.is_empty() || !path.starts_with('/') || path.contains(char::is_whitespace) {
            return Err(StepFlowError::InvalidRouteKey(raw.to_string()));
        }
        Ok(Self {
            method,
            path: path.to_string(),
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.as_upper(), self.path)
    }
}

impl FromStr for RouteKey {
    type Err = StepFlowError;

    fn from_str(raw: &str) -> Result<Self> {
        RouteKey::parse(raw)
    }
}

impl Serialize for RouteKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RouteKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RouteKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}
