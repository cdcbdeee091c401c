//! Account resource reporting: storage consumption and per-service usage.

use serde::Deserialize;

use crate::errors::Result;
use crate::session::Session;

/// Usage reporting adapter. Obtained via [`crate::Puter::usage`].
#[derive(Debug, Clone)]
pub struct Usage {
    session: Session,
}

impl Usage {
    /// Construct from an existing session. Equivalent to [`crate::Puter::usage`].
    pub fn new(session: Session) -> Usage {
        Usage { session }
    }

    /// Storage consumption for the signed-in account (`POST /df`).
    pub async fn disk_usage(&self) -> Result<DiskUsage> {
        self.session.post_json("df", &serde_json::json!({})).await
    }

    /// Metered usage across the platform's services (`GET /drivers/usage`).
    pub async fn usage_info(&self) -> Result<UsageInfo> {
        self.session.get_json("drivers/usage").await
    }
}

/// Storage consumption, in bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct DiskUsage {
    /// Bytes currently used.
    #[serde(default)]
    pub used: u64,
    /// Total bytes available to the account.
    #[serde(default)]
    pub capacity: u64,
    /// Any additional fields the backend returned, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Metered usage across services. Entry shapes vary by driver, so they are
/// passed through as JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageInfo {
    /// One entry per metered service.
    #[serde(default)]
    pub usages: Vec<serde_json::Value>,
    /// Any additional fields the backend returned, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
