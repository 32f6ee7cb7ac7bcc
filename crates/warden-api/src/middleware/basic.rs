//! # Basic Credential Gate
//!
//! The simpler of the two gates: a static username/password pair compared
//! against the standard `Authorization: Basic` flow. Used for routes that
//! do not participate in the access-token scheme. This gate only passes
//! requests through — it never attaches an identity.
//!
//! Open-access rules: development mode skips the gate entirely, and so
//! does an unset username or password (mirroring the access gate's
//! unconfigured posture). E2e-test mode deliberately does NOT skip it, so
//! tests keep exercising the credential comparison path.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use base64::prelude::{Engine, BASE64_STANDARD};

use warden_core::{AuthMode, GateConfig};

use crate::error::{basic_challenge, AuthError};

/// The basic gate: configuration only, no collaborators.
#[derive(Clone)]
pub struct BasicGate {
    config: Arc<GateConfig>,
}

impl BasicGate {
    /// Build a gate from configuration.
    pub fn new(config: Arc<GateConfig>) -> Self {
        Self { config }
    }

    /// Gate one request: `Ok(())` forwards, `Err` is the terminal response.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), Response> {
        // Only development mode bypasses this gate; e2e-test mode does not.
        if AuthMode::resolve(&self.config) == AuthMode::Development {
            return Ok(());
        }

        let (Some(username), Some(password)) = (
            self.config.basic_username.as_deref(),
            self.config.basic_password.as_deref(),
        ) else {
            // Credentials not configured: open access.
            return Ok(());
        };

        match self.matches(headers, username, password) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(reason = %err, "basic auth denied");
                Err(basic_challenge())
            }
        }
    }

    /// Decode and compare the presented credentials.
    ///
    /// The comparison is plain equality, not constant-time. That matches
    /// the behavior this gate replicates; revisit under a threat model
    /// where timing probes against the static pair matter.
    fn matches(&self, headers: &HeaderMap, username: &str, password: &str) -> Result<(), AuthError> {
        let payload = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(basic_payload)
            .ok_or(AuthError::MissingCredential)?;

        let decoded = BASE64_STANDARD
            .decode(payload)
            .map_err(|_| AuthError::CredentialMismatch)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::CredentialMismatch)?;

        // Split on the first colon only; passwords may contain colons.
        let (user, pass) = decoded
            .split_once(':')
            .ok_or(AuthError::CredentialMismatch)?;

        if user == username && pass == password {
            Ok(())
        } else {
            Err(AuthError::CredentialMismatch)
        }
    }
}

/// Pull the base64 payload out of a `Basic` authorization header.
///
/// Scheme match is case-insensitive with any amount of whitespace after
/// it, per RFC 7617.
fn basic_payload(header_value: &str) -> Option<&str> {
    let (scheme, rest) = header_value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let payload = rest.trim();
    (!payload.is_empty()).then_some(payload)
}

/// Middleware wrapper around [`BasicGate::check`].
///
/// ```ignore
/// let gate = BasicGate::new(config);
/// router.layer(from_fn(move |request: Request, next: Next| {
///     let gate = gate.clone();
///     async move { basic_gate_request(&gate, request, next).await }
/// }))
/// ```
pub async fn basic_gate_request(gate: &BasicGate, request: Request, next: Next) -> Response {
    match gate.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(response) => response,
    }
}
