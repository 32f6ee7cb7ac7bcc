//! # Demo Route Surface
//!
//! A minimal set of handlers exercising each gate: a JSON session
//! endpoint and an HTML landing page behind the access gate, and an
//! internal status page behind the basic gate.

use axum::response::Html;
use axum::Json;

use warden_core::AccessIdentity;

use crate::middleware::access::Caller;

/// JSON: return the identity the access gate attached to this request.
pub async fn whoami(Caller(identity): Caller) -> Json<AccessIdentity> {
    Json(identity)
}

/// HTML: landing page greeting the authenticated caller.
pub async fn index(Caller(identity): Caller) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>warden</h1>\n    <p>Signed in as {} &lt;{}&gt;.</p>\n  </body>\n</html>\n",
        identity.name, identity.email
    ))
}

/// Plain status for operators behind the basic gate.
pub async fn internal_status() -> &'static str {
    "ok"
}
