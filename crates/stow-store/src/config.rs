use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// What a [`MultiStore`](crate::MultiStore) does when a store fails with
/// something other than not-found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure and keep probing later stores.
    #[default]
    Continue,
    /// Stop at the first such failure and report the aggregate so far.
    FailFast,
}

/// Configuration for a [`MultiStore`](crate::MultiStore).
///
/// Loadable from TOML:
///
/// ```toml
/// failure_policy = "fail-fast"
/// verify_content = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiStoreConfig {
    pub failure_policy: FailurePolicy,
    /// Re-hash the winning store's content before returning it.
    pub verify_content: bool,
}

impl MultiStoreConfig {
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}
