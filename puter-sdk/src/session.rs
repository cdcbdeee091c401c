use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use crate::{
    PuterHttpClient,
    errors::{BackendError, RequestError, Result},
    util::check_http_status,
};

/// Stateful API driver shared by every resource adapter.
///
/// A `Session` pairs a [`PuterHttpClient`] with the current bearer token. It is
/// the single place where:
/// - endpoint paths are resolved against the configured API origin,
/// - the `Authorization: Bearer` header is attached (whenever a token is held),
/// - responses are status-checked and the `{success, result, error}` driver
///   envelope is decoded into typed results or typed errors.
///
/// Adapters ([`crate::Auth`], [`crate::FileSystem`], [`crate::KeyValue`], …)
/// hold a clone of the session and are otherwise stateless; the token is the
/// only shared mutable state, written by sign-in/sign-out and read by every
/// request.
///
/// Concurrency:
/// - `Session` is cheap to clone and thread-safe; clones share the underlying
///   client and token.
#[derive(Clone, Debug)]
pub struct Session {
    pub(crate) client: PuterHttpClient,

    /// Current bearer token, if signed in. Shared across adapter clones.
    pub(crate) token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Pair a transport client with an optional existing token.
    pub(crate) fn new(client: PuterHttpClient, token: Option<String>) -> Session {
        Session {
            client,
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Returns a reference to the internal `PuterHttpClient`.
    pub fn client(&self) -> &PuterHttpClient {
        &self.client
    }

    /// The API origin requests are issued against.
    pub fn api_url(&self) -> &Url {
        self.client.api_url()
    }

    /// Returns the current bearer token, if one is held.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Whether a bearer token is currently held.
    ///
    /// This is a local check; it does not verify the token with the server.
    pub async fn is_signed_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Replace (or clear) the bearer token for all clones of this session.
    pub(crate) async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Build a request for `path`, attaching the bearer token when present.
    pub(crate) async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.client.endpoint(path)?;
        tracing::debug!(%method, %url, "puter api request");
        let mut rb = self.client.http.request(method, url);
        if let Some(token) = self.token().await {
            rb = rb.bearer_auth(token);
        }
        Ok(rb)
    }

    /// Build a request that never carries the bearer token (sign-in endpoints).
    ///
    /// Sign-in replaces whatever token is held; login requests go out bare so
    /// a stale or revoked token cannot fail the exchange meant to replace it.
    pub(crate) fn request_anonymous(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.client.endpoint(path)?;
        tracing::debug!(%method, %url, "puter api request (anonymous)");
        Ok(self.client.http.request(method, url))
    }

    /// GET and deserialize JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .request(Method::GET, path)
            .await?
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let resp = check_http_status(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    /// POST a JSON body and deserialize the JSON response.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .request(Method::POST, path)
            .await?
            .json(body)
            .send()
            .await?;
        let resp = check_http_status(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    /// POST one `{interface, method, args}` envelope to `drivers/call` and
    /// return the raw, status-checked response.
    ///
    /// Used directly for streaming driver calls; most callers want
    /// [`Session::driver_call`] instead.
    pub(crate) async fn driver_call_raw<A: Serialize>(
        &self,
        interface: &str,
        method: &str,
        args: &A,
    ) -> Result<Response> {
        tracing::debug!(interface, method, "driver call");
        let body = DriverCall {
            interface,
            method,
            args,
        };
        let resp = self
            .request(Method::POST, "drivers/call")
            .await?
            .json(&body)
            .send()
            .await?;
        check_http_status(resp).await
    }

    /// Issue a driver call and unwrap the `{success, result, error}` envelope.
    ///
    /// A reported failure (`success == false` or a present `error` object)
    /// becomes [`RequestError::Backend`]; on success the `result` field is
    /// deserialized into `T`.
    pub(crate) async fn driver_call<A, T>(
        &self,
        interface: &str,
        method: &str,
        args: &A,
    ) -> Result<T>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let resp = self.driver_call_raw(interface, method, args).await?;
        let envelope = resp.json::<DriverEnvelope>().await?;
        decode_driver_envelope(envelope)
    }

    /// Driver call whose result payload is irrelevant (delete/flush style).
    pub(crate) async fn driver_call_unit<A: Serialize>(
        &self,
        interface: &str,
        method: &str,
        args: &A,
    ) -> Result<()> {
        let _: serde_json::Value = self.driver_call(interface, method, args).await?;
        Ok(())
    }
}

/// Wire shape of the generic RPC dispatch endpoint.
#[derive(Debug, Serialize)]
struct DriverCall<'a, A: Serialize> {
    interface: &'a str,
    method: &'a str,
    args: &'a A,
}

/// The `{success, result, error}` wrapper most RPC-style endpoints reply with.
#[derive(Debug, serde::Deserialize)]
struct DriverEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<BackendError>,
}

fn decode_driver_envelope<T: DeserializeOwned>(envelope: DriverEnvelope) -> Result<T> {
    if envelope.success == Some(false) || envelope.error.is_some() {
        let error = envelope.error.unwrap_or_else(|| BackendError {
            code: crate::errors::MISSING_ERROR_BODY.into(),
            message: "The driver call failed without an error body.".into(),
            details: serde_json::Map::new(),
        });
        tracing::warn!(code = %error.code, "driver call failed");
        return Err(RequestError::Backend(error).into());
    }

    let result = envelope.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result)
        .map_err(|e| RequestError::DecodeJson { message: e.to_string() }.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(raw: serde_json::Value) -> DriverEnvelope {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn success_envelope_yields_the_result() {
        let value: i64 = decode_driver_envelope(envelope(serde_json::json!({
            "success": true,
            "result": 42
        })))
        .unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn missing_result_decodes_as_none() {
        let value: Option<serde_json::Value> =
            decode_driver_envelope(envelope(serde_json::json!({ "success": true }))).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn reported_failure_surfaces_the_backend_error() {
        let err = decode_driver_envelope::<serde_json::Value>(envelope(serde_json::json!({
            "success": false,
            "error": { "code": "key_too_large", "message": "Key is too large." }
        })))
        .unwrap_err();
        match err {
            crate::Error::Request(RequestError::Backend(e)) => {
                assert_eq!(e.code, "key_too_large");
                assert_eq!(e.message, "Key is too large.");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn failure_without_error_body_gets_a_placeholder() {
        let err = decode_driver_envelope::<serde_json::Value>(envelope(serde_json::json!({
            "success": false
        })))
        .unwrap_err();
        match err {
            crate::Error::Request(RequestError::Backend(e)) => {
                assert_eq!(e.code, crate::errors::MISSING_ERROR_BODY);
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn type_mismatch_is_a_decode_error() {
        let err = decode_driver_envelope::<i64>(envelope(serde_json::json!({
            "success": true,
            "result": "not a number"
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Request(RequestError::DecodeJson { .. })
        ));
    }
}
