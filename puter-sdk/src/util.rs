use reqwest::Response;

use crate::errors::{BackendError, Error, RequestError, Result, SUBJECT_DOES_NOT_EXIST};

/// Convert non-2xx responses into a structured error that includes the server body.
///
/// If the status is successful (2xx), the original response is returned.
/// If the status is an error (4xx or 5xx), the response body is consumed: the
/// backend's missing-subject envelope becomes `RequestError::NotFound`, any
/// other structured Puter error envelope becomes `RequestError::Backend`, and
/// anything else becomes `RequestError::Server` carrying the raw body.
pub(crate) async fn check_http_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Some(backend) = backend_error_from_body(&body) {
        tracing::warn!(code = %backend.code, %status, "backend reported an error");
        let err = if backend.code == SUBJECT_DOES_NOT_EXIST {
            RequestError::NotFound {
                message: backend.message,
            }
        } else {
            RequestError::Backend(backend)
        };
        return Err(Error::from(err));
    }

    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string()
    } else {
        body
    };

    Err(Error::from(RequestError::Server { status, message }))
}

/// Try to read a structured backend error out of a response body.
///
/// Accepts both the enveloped form `{"success":false,"error":{...}}` and a
/// bare `{"code":...,"message":...}` object. Returns `None` for anything that
/// does not carry at least a code or a message.
pub(crate) fn backend_error_from_body(body: &str) -> Option<BackendError> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = match value.get("error") {
        Some(inner) => inner.clone(),
        None => value,
    };
    let parsed: BackendError = serde_json::from_value(error).ok()?;
    if parsed.code.is_empty() && parsed.message.is_empty() {
        return None;
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_enveloped_backend_errors() {
        let body = r#"{"success":false,"error":{"code":"item_with_same_name_exists","message":"A file with this name already exists."}}"#;
        let err = backend_error_from_body(body).unwrap();
        assert_eq!(err.code, "item_with_same_name_exists");
    }

    #[test]
    fn reads_bare_backend_errors() {
        let body = r#"{"code":"token_auth_failed","message":"Authentication failed."}"#;
        let err = backend_error_from_body(body).unwrap();
        assert_eq!(err.message, "Authentication failed.");
    }

    #[test]
    fn ignores_bodies_without_error_shape() {
        assert!(backend_error_from_body("not json").is_none());
        assert!(backend_error_from_body(r#"{"proceed":false}"#).is_none());
        assert!(backend_error_from_body("").is_none());
    }
}
