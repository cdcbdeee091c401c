//! Key-value storage scoped to the signed-in user and calling app.
//!
//! All operations go through the `puter-kvstore` driver interface. Values are
//! arbitrary JSON; keys are limited to 1024 characters.

use serde::Serialize;

use crate::errors::{Error, RequestError, Result};
use crate::session::Session;

/// Longest accepted key, in characters. Longer keys fail locally.
pub const MAX_KEY_LENGTH: usize = 1024;

const INTERFACE: &str = "puter-kvstore";

/// Key-value adapter. Obtained via [`crate::Puter::kv`].
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::with_token("my-token")?;
/// let kv = puter.kv();
/// kv.set("greeting", &"hello").await?;
/// let value = kv.get("greeting").await?;
/// assert_eq!(value.as_ref().and_then(|v| v.as_str()), Some("hello"));
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct KeyValue {
    session: Session,
}

impl KeyValue {
    /// Construct from an existing session. Equivalent to [`crate::Puter::kv`].
    pub fn new(session: Session) -> KeyValue {
        KeyValue { session }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set<V: Serialize>(&self, key: &str, value: &V) -> Result<()> {
        check_key(key)?;
        self.session
            .driver_call_unit(INTERFACE, "set", &SetArgs { key, value })
            .await
    }

    /// Fetch the value stored under `key`, or `None` if the key is unset.
    ///
    /// Reading has no side effects; repeated gets return the same value until
    /// a `set`/`del` intervenes.
    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        check_key(key)?;
        self.session
            .driver_call(INTERFACE, "get", &KeyArgs { key })
            .await
    }

    /// Remove `key`. Removing an unset key is not an error.
    pub async fn del(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.session
            .driver_call_unit(INTERFACE, "del", &KeyArgs { key })
            .await
    }

    /// Increment the numeric value under `key` by 1 and return the new value.
    ///
    /// Unset keys count from zero.
    pub async fn incr(&self, key: &str) -> Result<i64> {
        self.incr_by(key, 1).await
    }

    /// Increment the numeric value under `key` by `amount` and return the new
    /// value.
    pub async fn incr_by(&self, key: &str, amount: i64) -> Result<i64> {
        check_key(key)?;
        self.session
            .driver_call(INTERFACE, "incr", &AmountArgs { key, amount })
            .await
    }

    /// Decrement the numeric value under `key` by 1 and return the new value.
    pub async fn decr(&self, key: &str) -> Result<i64> {
        self.decr_by(key, 1).await
    }

    /// Decrement the numeric value under `key` by `amount` and return the new
    /// value.
    pub async fn decr_by(&self, key: &str, amount: i64) -> Result<i64> {
        check_key(key)?;
        self.session
            .driver_call(INTERFACE, "decr", &AmountArgs { key, amount })
            .await
    }

    /// Remove **all** keys of this app/user pair.
    pub async fn flush(&self) -> Result<()> {
        self.session
            .driver_call_unit(INTERFACE, "flush", &serde_json::json!({}))
            .await
    }

    /// List stored keys, optionally filtered by a glob `pattern` (e.g. `user:*`).
    pub async fn list(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        self.session
            .driver_call(INTERFACE, "list", &ListArgs { pattern })
            .await
    }
}

/// Local key validation: non-empty, at most [`MAX_KEY_LENGTH`] characters.
fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::from(RequestError::Validation {
            message: "Key must not be empty.".into(),
        }));
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(Error::from(RequestError::Validation {
            message: format!("Key too large. Max key size is {MAX_KEY_LENGTH} characters."),
        }));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct KeyArgs<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct SetArgs<'a, V: Serialize> {
    key: &'a str,
    value: &'a V,
}

#[derive(Debug, Serialize)]
struct AmountArgs<'a> {
    key: &'a str,
    amount: i64,
}

#[derive(Debug, Serialize)]
struct ListArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<&'a str>,
}
