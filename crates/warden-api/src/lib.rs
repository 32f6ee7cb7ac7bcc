//! # warden-api — Request Authentication Gate for Axum
//!
//! An authentication layer that sits in front of an application's HTTP
//! handlers and decides, per request, whether the caller is authenticated,
//! under which scheme, and what identity to attach downstream — without
//! coupling the application to any one provider.
//!
//! ## Gates
//!
//! | Gate                               | Credential                       | On success            |
//! |------------------------------------|----------------------------------|-----------------------|
//! | [`middleware::access::AccessGate`] | provider token (header or cookie) | identity in extensions |
//! | [`middleware::basic::BasicGate`]   | `Authorization: Basic` pair       | pass-through only      |
//!
//! Each request passes through at most one gate. Failure responses are
//! route-class aware: JSON bodies for API routes, HTML pages or a login
//! redirect for browser routes, a `WWW-Authenticate` challenge for the
//! basic gate.
//!
//! ## Open-access posture
//!
//! This layer deliberately fails OPEN when unconfigured: no provider
//! parameters means anonymous access, no basic credentials means an
//! ungated route group. That is the intended posture for local and
//! preview deployments — production enforcement requires setting the
//! provider domain and audience. [`app`] logs a warning for every gate
//! that assembles in an open state outside development mode.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → gate (access or basic) → Handler
//! ```

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod verifier;

use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{from_fn, Next};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use warden_core::{AuthMode, GateConfig};

use crate::middleware::access::{gate_request, AccessGate, GateOptions};
use crate::middleware::basic::{basic_gate_request, BasicGate};
use crate::verifier::AccessVerifier;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside both gates so they
/// remain reachable without credentials.
pub fn app(config: GateConfig, verifier: Arc<dyn AccessVerifier>) -> Router {
    let config = Arc::new(config);
    warn_if_open(&config);

    let access_gate = AccessGate::new(Arc::clone(&config), verifier);
    let basic_gate = BasicGate::new(Arc::clone(&config));

    // JSON API routes behind the access gate.
    let json_gate = access_gate.clone();
    let api = Router::new()
        .route("/v1/session/whoami", get(routes::whoami))
        .layer(from_fn(move |request: Request, next: Next| {
            let gate = json_gate.clone();
            async move { gate_request(&gate, GateOptions::json_api(), request, next).await }
        }));

    // Browser routes behind the access gate; missing credentials bounce
    // to the provider login domain.
    let ui = Router::new()
        .route("/", get(routes::index))
        .layer(from_fn(move |request: Request, next: Next| {
            let gate = access_gate.clone();
            async move { gate_request(&gate, GateOptions::html_ui(true), request, next).await }
        }));

    // Operator routes behind the basic gate.
    let internal = Router::new()
        .route("/internal/status", get(routes::internal_status))
        .layer(from_fn(move |request: Request, next: Next| {
            let gate = basic_gate.clone();
            async move { basic_gate_request(&gate, request, next).await }
        }));

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .merge(ui)
        .merge(internal)
        .layer(TraceLayer::new_for_http())
}

/// Log every gate that assembles in an open state outside dev mode.
///
/// The open posture is intentional (see crate docs); the warning exists so
/// production operators notice a missing provider or credential pair.
fn warn_if_open(config: &GateConfig) {
    let mode = AuthMode::resolve(config);
    if mode == AuthMode::Unconfigured {
        tracing::warn!(
            "access gate is OPEN: provider domain/audience not configured; \
             all requests get the anonymous identity"
        );
    }
    if !config.dev_mode && !config.basic_credentials_configured() {
        tracing::warn!(
            "basic gate is OPEN: BASIC_AUTH_USERNAME/BASIC_AUTH_PASSWORD not set"
        );
    }
}

/// Liveness probe — 200 whenever the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 when the router is serving.
async fn readiness() -> &'static str {
    "ready"
}
