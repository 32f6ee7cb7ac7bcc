//! # Authentication Errors & Response Policy
//!
//! The failure taxonomy for both gates and the builders that turn a
//! failure into a protocol-correct HTTP response. All of these are
//! expected, routine outcomes — terminal for the request, non-retriable,
//! and never propagated as faults.
//!
//! Response shapes (per route class):
//! - JSON routes: 401 with flat body `{"error": "Unauthorized", ...}`
//!   carrying a `hint` (missing credential) or `details` (verification
//!   failure).
//! - HTML routes: 401 with an `<h1>Unauthorized</h1>` page and a login
//!   link, or a 302 redirect to the provider login domain when the caller
//!   opted into redirect-on-missing.
//! - Basic gate: 401 with a `WWW-Authenticate: Basic` challenge and the
//!   literal body `Unauthorized`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Realm advertised in the basic gate's `WWW-Authenticate` challenge.
pub const BASIC_REALM: &str = "warden";

/// Hint returned to JSON callers when no access token was presented.
pub const MISSING_TOKEN_HINT: &str =
    "Missing access token. Ensure this route is protected by the access provider.";

/// Why a gate denied a request.
///
/// Every variant maps deterministically to an HTTP response; none of them
/// are programming errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was found in any transport location.
    #[error("missing credential")]
    MissingCredential,

    /// The verifier collaborator rejected the token. The reason text comes
    /// from the verifier and may be surfaced to JSON callers — the
    /// verifying party is presumed to control its own error taxonomy.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// Basic credentials did not match the configured pair (covers
    /// malformed and missing `Authorization` headers too).
    #[error("credential mismatch")]
    CredentialMismatch,
}

/// Flat JSON body for 401 responses on JSON routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnauthorizedBody {
    /// Always the string `Unauthorized`.
    pub error: String,
    /// Operator-facing hint, present when the credential was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Verifier failure detail, present when verification failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl UnauthorizedBody {
    /// Body for a missing credential on a JSON route.
    pub fn missing_credential() -> Self {
        Self {
            error: "Unauthorized".to_string(),
            hint: Some(MISSING_TOKEN_HINT.to_string()),
            details: None,
        }
    }

    /// Body for a verification failure on a JSON route.
    pub fn verification_failed(details: impl Into<String>) -> Self {
        Self {
            error: "Unauthorized".to_string(),
            hint: None,
            details: Some(details.into()),
        }
    }
}

/// 401 with a JSON body.
pub fn unauthorized_json(body: UnauthorizedBody) -> Response {
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// 401 with an HTML page: `<h1>Unauthorized</h1>`, a message, and a link
/// to the provider login domain.
pub fn unauthorized_html(team_domain: &str, message: &str, link_text: &str) -> Response {
    let page = format!(
        "<html>\n  <body>\n    <h1>Unauthorized</h1>\n    <p>{message}</p>\n    <a href=\"https://{team_domain}\">{link_text}</a>\n  </body>\n</html>\n"
    );
    (StatusCode::UNAUTHORIZED, Html(page)).into_response()
}

/// 302 redirect to the provider login domain.
///
/// Built by hand: axum's `Redirect` helpers emit 303/307/308, and the
/// wire contract here is 302 Found.
pub fn login_redirect(team_domain: &str) -> Response {
    let location = format!("https://{team_domain}");
    match HeaderValue::from_str(&location) {
        Ok(value) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        // A team domain that is not a valid header value cannot be
        // redirected to; fall back to the HTML deny page semantics.
        Err(_) => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// 401 with the `WWW-Authenticate: Basic` challenge and body `Unauthorized`.
pub fn basic_challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Basic realm=\"warden\""),
        )],
        "Unauthorized",
    )
        .into_response()
}
