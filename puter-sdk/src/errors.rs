//! Unified error types for the `puter` crate.
//!
//! This module centralizes all failures that can occur while using the SDK and
//! provides a single top-level [`Error`] enum plus the convenient [`Result`] alias.
//! Errors from lower layers (`reqwest`, URL parsing, JSON decoding, the Puter
//! backend's own error envelope) are mapped into structured variants so callers
//! can handle them precisely.

use thiserror::Error;

// --- Build-Time Error ---

/// Errors that can occur while building a [`PuterHttpClient`](crate::PuterHttpClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured API base URL is not a valid URL.
    #[error("Invalid API base URL: {0}")]
    ApiUrl(#[from] url::ParseError),
}

// --- The Main Operational Error Enum ---

/// The crate’s top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`]: HTTP transport/server/validation issues
/// - [`Error::Authentication`]: sign-in and OTP issues
/// - [`Error::Parse`]: URL parsing failures
/// - [`Error::Build`]: construction of the client failed
///
/// Most lower-level errors automatically convert into this enum via `From`.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, server, validation, JSON).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// Authentication flow failed (credentials or OTP).
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// URL parsing failed while preparing a request or path.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Building the client failed (reqwest configuration).
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

impl Error {
    /// Returns true if the backend rejected an operation because the target
    /// name is already taken (e.g. creating an app whose name exists).
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Error::Request(RequestError::Backend(e)) if e.is_already_in_use()
        )
    }

    /// Returns true if the failure was a "not found" response, either as a
    /// typed [`RequestError::NotFound`] (REST endpoints) or as the backend's
    /// missing-subject code in a driver envelope.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Request(RequestError::NotFound { .. }) => true,
            Error::Request(RequestError::Backend(e)) => e.code == SUBJECT_DOES_NOT_EXIST,
            _ => false,
        }
    }
}

// --- Consolidated Authentication Error ---

/// Errors originating from the sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the supplied credentials.
    #[error("Sign-in rejected: {0}")]
    Rejected(String),

    /// The account requires a one-time password; retry with
    /// [`Auth::sign_in_with_otp`](crate::Auth::sign_in_with_otp).
    #[error("A one-time password is required to complete sign-in.")]
    OtpRequired,

    /// The supplied one-time password was not accepted.
    #[error("The one-time password was rejected.")]
    OtpInvalid,
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status without a structured error
    /// envelope. Includes status and body message.
    #[error("Server responded with an error: {status} - {message}")]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// Short description or the server response body captured for context.
        message: String,
    },

    /// The backend reported a structured failure in its error envelope.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Caller supplied an invalid path/argument for this API.
    #[error("Invalid request: {message}")]
    Validation {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// The addressed resource does not exist. Produced when the backend
    /// answers with its `subject_does_not_exist` code.
    #[error("Not found: {message}")]
    NotFound {
        /// Which resource was missing.
        message: String,
    },

    /// JSON decoding failed when parsing a server response.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer (with context if available).
        message: String,
    },
}

// --- The Backend Error Envelope ---

/// A structured error reported by the Puter backend.
///
/// Driver calls and several REST endpoints wrap failures in a
/// `{ "success": false, "error": { "code", "message", ... } }` envelope; this
/// type carries that envelope verbatim. `code` is the stable, machine-readable
/// discriminator; `message` is human-readable; `details` holds any extra
/// fields the backend attached (delegate errors, field names, limits).
#[derive(Debug, Clone, Error, serde::Deserialize)]
#[error("{code}: {message}")]
pub struct BackendError {
    /// Stable machine-readable error code (e.g. `already_in_use`).
    #[serde(default)]
    pub code: String,
    /// Human-readable description from the backend.
    #[serde(default)]
    pub message: String,
    /// Any additional fields the backend attached to the error, verbatim.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Code of the placeholder error synthesized when a failed driver call
/// carried no error body. Such errors have no real backend message.
pub(crate) const MISSING_ERROR_BODY: &str = "missing_error_body";

/// The backend's code for addressing a resource that does not exist. REST
/// endpoints reporting it decode to [`RequestError::NotFound`].
pub(crate) const SUBJECT_DOES_NOT_EXIST: &str = "subject_does_not_exist";

impl BackendError {
    /// Returns true if this is the backend's name-collision code.
    pub fn is_already_in_use(&self) -> bool {
        self.code == "already_in_use"
    }
}

/// A specialized `Result` type for `puter` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::DecodeJson {
            message: err.to_string(),
        }
    }
}

// Request Errors
impl_from_for_error!(reqwest::Error, Error::Request);
impl_from_for_error!(BackendError, Error::Request);
impl_from_for_error!(serde_json::Error, Error::Request);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_keeps_extra_fields() {
        let raw = serde_json::json!({
            "code": "already_in_use",
            "message": "An app with this name already exists.",
            "which": "name",
            "entry_name": "my-app"
        });
        let err: BackendError = serde_json::from_value(raw).unwrap();
        assert!(err.is_already_in_use());
        assert_eq!(err.details.get("which").unwrap(), "name");
        assert_eq!(err.to_string(), "already_in_use: An app with this name already exists.");
    }

    #[test]
    fn already_exists_check_matches_only_the_collision_code() {
        let collision: Error = BackendError {
            code: "already_in_use".into(),
            message: "taken".into(),
            details: serde_json::Map::new(),
        }
        .into();
        assert!(collision.is_already_exists());

        let other: Error = BackendError {
            code: "permission_denied".into(),
            message: "no".into(),
            details: serde_json::Map::new(),
        }
        .into();
        assert!(!other.is_already_exists());
    }

    #[test]
    fn not_found_matches_typed_and_backend_shapes() {
        let typed = Error::Request(RequestError::NotFound {
            message: "no such key".into(),
        });
        assert!(typed.is_not_found());

        let backend: Error = BackendError {
            code: "subject_does_not_exist".into(),
            message: "missing".into(),
            details: serde_json::Map::new(),
        }
        .into();
        assert!(backend.is_not_found());

        // A bare 404 with no structured envelope is not a missing-subject reply.
        let plain = Error::Request(RequestError::Server {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "route not found".into(),
        });
        assert!(!plain.is_not_found());
    }
}
