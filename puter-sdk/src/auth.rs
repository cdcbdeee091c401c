//! Sign-in, sign-out and account lookup.
//!
//! Puter authenticates with a username/password pair (optionally guarded by a
//! one-time password) and hands back a bearer token; that token is stored on
//! the shared [`Session`] and attached to every subsequent request.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::errors::AuthError;
use crate::session::Session;
use crate::util::backend_error_from_body;

/// Authentication adapter. Obtained via [`crate::Puter::auth`].
///
/// Holds a clone of the shared [`Session`]; signing in or out here changes the
/// token used by every other adapter minted from the same [`crate::Puter`].
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::new()?;
/// puter.auth().sign_in("alice", "hunter2").await?;
/// let me = puter.auth().get_user().await?;
/// println!("signed in as {}", me.username);
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Auth {
    session: Session,
}

/// The account behind the current session, as reported by `/whoami`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Account username.
    #[serde(default)]
    pub username: String,
    /// Stable account identifier.
    #[serde(default)]
    pub uuid: String,
    /// Primary email address, when one is attached to the account.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the email address has been confirmed.
    #[serde(default)]
    pub email_confirmed: bool,
    /// Whether this is an auto-provisioned temporary account.
    #[serde(default)]
    pub is_temp: bool,
    /// Any additional fields returned by the server, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Auth {
    /// Construct from an existing session. Equivalent to [`crate::Puter::auth`].
    pub fn new(session: Session) -> Auth {
        Auth { session }
    }

    /// Sign in with a username and password.
    ///
    /// On success the received bearer token is stored on the session and used
    /// for all subsequent requests. Accounts protected by two-factor
    /// authentication fail with [`AuthError::OtpRequired`]; retry with
    /// [`Auth::sign_in_with_otp`].
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<()> {
        match self.submit_password(username, password).await? {
            PasswordOutcome::Token(token) => {
                self.session.set_token(Some(token)).await;
                Ok(())
            }
            PasswordOutcome::OtpChallenge(_) => Err(AuthError::OtpRequired.into()),
        }
    }

    /// Sign in with a username, password and a one-time password.
    ///
    /// Runs the two-step flow (`/login`, then `/login/otp`). Accounts without
    /// two-factor authentication complete after the first step; `code` is then
    /// ignored. A rejected code fails with [`AuthError::OtpInvalid`].
    pub async fn sign_in_with_otp(&self, username: &str, password: &str, code: &str) -> Result<()> {
        let token = match self.submit_password(username, password).await? {
            PasswordOutcome::Token(token) => token,
            PasswordOutcome::OtpChallenge(jwt) => self.complete_otp(&jwt, code).await?,
        };
        self.session.set_token(Some(token)).await;
        Ok(())
    }

    /// Drop the bearer token.
    ///
    /// Purely local: the server is not contacted, and the token itself is not
    /// revoked. After this call [`Auth::is_signed_in`] is `false` and requests
    /// go out without an `Authorization` header.
    pub async fn sign_out(&self) {
        self.session.set_token(None).await;
    }

    /// Whether the session currently holds a bearer token.
    pub async fn is_signed_in(&self) -> bool {
        self.session.is_signed_in().await
    }

    /// Returns the current bearer token, if one is held.
    pub async fn token(&self) -> Option<String> {
        self.session.token().await
    }

    /// Fetch the account behind the current token (`GET /whoami`).
    pub async fn get_user(&self) -> Result<UserInfo> {
        self.session.get_json("whoami").await
    }

    /// First login step: submit the credentials, yielding either a bearer
    /// token or an OTP challenge to complete in a second step.
    async fn submit_password(&self, username: &str, password: &str) -> Result<PasswordOutcome> {
        let response = self
            .session
            .request_anonymous(Method::POST, "login")?
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = LoginResponse::from_body(&body);

        if status.is_success() && parsed.proceed {
            if parsed.next_step.as_deref() == Some("otp") {
                if let Some(jwt) = parsed.otp_jwt_token {
                    return Ok(PasswordOutcome::OtpChallenge(jwt));
                }
            }
            if let Some(token) = parsed.token {
                return Ok(PasswordOutcome::Token(token));
            }
        }

        let message = backend_error_from_body(&body)
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "The username or password was not accepted.".into());
        Err(AuthError::Rejected(message).into())
    }

    /// Second login step: answer the OTP challenge from [`Self::submit_password`].
    async fn complete_otp(&self, jwt: &str, code: &str) -> Result<String> {
        let response = self
            .session
            .request_anonymous(Method::POST, "login/otp")?
            .json(&OtpRequest { token: jwt, code })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = LoginResponse::from_body(&body);

        if status.is_success() && parsed.proceed {
            if let Some(token) = parsed.token {
                return Ok(token);
            }
        }
        Err(AuthError::OtpInvalid.into())
    }
}

enum PasswordOutcome {
    /// Credentials accepted; a bearer token was issued.
    Token(String),
    /// Credentials accepted, but the account requires a one-time password.
    /// Carries the challenge token for `/login/otp`.
    OtpChallenge(String),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    token: &'a str,
    code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    proceed: bool,
    #[serde(default)]
    next_step: Option<String>,
    #[serde(default)]
    otp_jwt_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl LoginResponse {
    /// Tolerant parse; malformed bodies read as a rejection.
    fn from_body(body: &str) -> LoginResponse {
        serde_json::from_str(body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_body_parses_as_accepted() {
        let parsed = LoginResponse::from_body(r#"{"proceed":true,"token":"abc"}"#);
        assert!(parsed.proceed);
        assert_eq!(parsed.token.as_deref(), Some("abc"));
        assert!(parsed.next_step.is_none());
    }

    #[test]
    fn otp_challenge_body_parses_with_jwt() {
        let parsed = LoginResponse::from_body(
            r#"{"proceed":true,"next_step":"otp","otp_jwt_token":"jwt-123"}"#,
        );
        assert!(parsed.proceed);
        assert_eq!(parsed.next_step.as_deref(), Some("otp"));
        assert_eq!(parsed.otp_jwt_token.as_deref(), Some("jwt-123"));
    }

    #[test]
    fn malformed_body_reads_as_rejection() {
        let parsed = LoginResponse::from_body("<html>nope</html>");
        assert!(!parsed.proceed);
        assert!(parsed.token.is_none());
    }
}
