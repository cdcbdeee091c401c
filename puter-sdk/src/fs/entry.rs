use serde::Deserialize;

use crate::errors::{Error, RequestError, Result};

/// One file or directory, as returned by `/readdir`, `/mkdir`, `/stat` and
/// the batch upload endpoint.
///
/// Puter attaches a fair number of bookkeeping fields to entries; the common
/// ones are typed here and everything else is kept verbatim in
/// [`FsEntry::extra`].
#[derive(Debug, Clone, Deserialize)]
pub struct FsEntry {
    /// Stable identifier of the entry.
    #[serde(default)]
    pub uid: String,
    /// Base name of the entry.
    #[serde(default)]
    pub name: String,
    /// Absolute path of the entry.
    #[serde(default)]
    pub path: String,
    /// Whether the entry is a directory.
    #[serde(default)]
    pub is_dir: bool,
    /// Size in bytes; absent for directories.
    #[serde(default)]
    pub size: Option<u64>,
    /// Creation time as a unix timestamp.
    #[serde(default)]
    pub created: Option<f64>,
    /// Last modification time as a unix timestamp.
    #[serde(default)]
    pub modified: Option<f64>,
    /// Any additional fields returned by the server, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reject empty or relative paths before they reach the network.
///
/// Puter addresses everything by absolute path (`/{username}/...`); relative
/// resolution is a shell concern the API does not provide.
pub(crate) fn check_abs_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::from(RequestError::Validation {
            message: "Path must not be empty.".into(),
        }));
    }
    if !path.starts_with('/') {
        return Err(Error::from(RequestError::Validation {
            message: format!("Path must be absolute (start with '/'): {path}"),
        }));
    }
    Ok(())
}
