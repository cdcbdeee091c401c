use serde::Deserialize;

/// A Puter application record.
///
/// Records are never cached locally; every read re-fetches from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct AppRecord {
    /// Stable identifier of the app.
    #[serde(default)]
    pub uid: String,
    /// Unique app name (also the app's handle in URLs and driver calls).
    #[serde(default)]
    pub name: String,
    /// The account owning this app.
    #[serde(default)]
    pub owner: Option<AppOwner>,
    /// URL the app is served from.
    #[serde(default)]
    pub index_url: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation time, as the server formats it.
    #[serde(default)]
    pub created_at: Option<String>,
    /// App metadata bag (window behavior and similar).
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Any additional fields returned by the server, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Owner stub embedded in an [`AppRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppOwner {
    /// Username of the owning account.
    #[serde(default)]
    pub username: String,
    /// Any additional fields returned by the server, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_with_nested_owner() {
        let record: AppRecord = serde_json::from_str(
            r#"{
                "uid": "app-9f3b2c1a-77aa",
                "name": "test-app",
                "owner": { "username": "alice", "uuid": "u-1" },
                "index_url": "",
                "stats": { "open_count": 0 }
            }"#,
        )
        .unwrap();
        assert_eq!(record.uid, "app-9f3b2c1a-77aa");
        assert_eq!(
            record.owner.as_ref().map(|o| o.username.as_str()),
            Some("alice")
        );
        assert!(record.extra.contains_key("stats"));
    }

    #[test]
    fn record_tolerates_missing_owner() {
        let record: AppRecord = serde_json::from_str(r#"{ "name": "bare" }"#).unwrap();
        assert!(record.owner.is_none());
        assert!(record.uid.is_empty());
    }
}
