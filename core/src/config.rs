//! Client configuration.
//!
//! The library reads no files or environment variables; `ClientConfig` is
//! deserializable so a host application can embed it in its own settings.

use serde::{Deserialize, Serialize};

use crate::routes::DEFAULT_API_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address, e.g. `http://chat.example.com`, without a trailing slash.
    pub base_url: Option<String>,
    /// API version path segment appended to `base_url`.
    pub api_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }
}
