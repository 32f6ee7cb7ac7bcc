//! # Access Gate Middleware
//!
//! The authentication decision engine for provider-asserted access tokens.
//! Per request: resolve the [`AuthMode`], locate the credential, call the
//! [`AccessVerifier`] collaborator, and either forward the request with an
//! [`AccessIdentity`] attached or short-circuit with a route-class-
//! appropriate response. A gate invocation ends in exactly one
//! [`AuthDecision`] — never both.
//!
//! Everything here except the verifier call is pure and local; the
//! verifier call is the only await point and inherits cancellation from
//! the inbound request. No retries: a failed verification is terminal for
//! the request.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use warden_core::{AccessIdentity, AuthMode, GateConfig};

use crate::error::{
    login_redirect, unauthorized_html, unauthorized_json, UnauthorizedBody,
};
use crate::extract;
use crate::verifier::{AccessVerifier, VerifyError};

// ── Route classification ────────────────────────────────────────────────────

/// Expected response shape of a route group on authentication failure.
///
/// Supplied by the caller at router assembly; never inferred from the
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// API routes: structured JSON error bodies.
    Json,
    /// Browser-facing routes: HTML error pages or a login redirect.
    Html,
}

/// Per-route-group options for the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOptions {
    /// Response shape on failure.
    pub route_class: RouteClass,
    /// For [`RouteClass::Html`] only: redirect to the provider login
    /// domain when the credential is missing, instead of a 401 page.
    pub redirect_on_missing: bool,
}

impl GateOptions {
    /// Options for a JSON API route group.
    pub fn json_api() -> Self {
        Self {
            route_class: RouteClass::Json,
            redirect_on_missing: false,
        }
    }

    /// Options for an HTML UI route group.
    pub fn html_ui(redirect_on_missing: bool) -> Self {
        Self {
            route_class: RouteClass::Html,
            redirect_on_missing,
        }
    }
}

// ── Decision ────────────────────────────────────────────────────────────────

/// Outcome of a gate invocation.
///
/// The caller forwards the request on `Allow` and returns the response on
/// `Deny`; the gate itself never does both.
#[derive(Debug)]
pub enum AuthDecision {
    /// Authenticated: attach this identity and forward.
    Allow(AccessIdentity),
    /// Denied: short-circuit with this terminal response.
    Deny(Response),
}

// ── Gate ────────────────────────────────────────────────────────────────────

/// The access gate: configuration plus the verifier collaborator.
///
/// Cheap to clone; shared read-only across all in-flight requests.
#[derive(Clone)]
pub struct AccessGate {
    config: Arc<GateConfig>,
    verifier: Arc<dyn AccessVerifier>,
}

impl AccessGate {
    /// Build a gate from configuration and a verifier.
    pub fn new(config: Arc<GateConfig>, verifier: Arc<dyn AccessVerifier>) -> Self {
        Self { config, verifier }
    }

    /// Authenticate one request.
    ///
    /// Mode resolution comes first: development and e2e-test modes
    /// short-circuit to a synthetic developer identity, an unconfigured
    /// provider short-circuits to the anonymous identity (open by
    /// design), and only enforced mode extracts and verifies a token.
    pub async fn authenticate(&self, headers: &HeaderMap, options: GateOptions) -> AuthDecision {
        let mode = AuthMode::resolve(&self.config);
        match mode {
            AuthMode::Development | AuthMode::E2ETest => {
                AuthDecision::Allow(AccessIdentity::developer())
            }
            AuthMode::Unconfigured => AuthDecision::Allow(AccessIdentity::anonymous()),
            AuthMode::Enforced => self.authenticate_enforced(headers, options).await,
        }
    }

    async fn authenticate_enforced(
        &self,
        headers: &HeaderMap,
        options: GateOptions,
    ) -> AuthDecision {
        // Enforced mode implies both provider parameters are present
        // (that is what AuthMode::resolve checks); stay open otherwise.
        let (Some(team_domain), Some(audience)) =
            (self.config.team_domain.as_deref(), self.config.audience.as_deref())
        else {
            return AuthDecision::Allow(AccessIdentity::anonymous());
        };

        let Some(token) = extract::access_token(headers) else {
            tracing::warn!(
                route_class = ?options.route_class,
                "access denied: no token in header or cookie"
            );
            return AuthDecision::Deny(missing_credential_response(options, team_domain));
        };

        match self.verifier.verify(&token, team_domain, audience).await {
            Ok(claims) => AuthDecision::Allow(AccessIdentity::new(claims.email, claims.name)),
            Err(err) => {
                // Unavailable is an operational defect, not a bad caller.
                match &err {
                    VerifyError::Unavailable(reason) => {
                        tracing::error!(%reason, "access token verification unavailable");
                    }
                    other => {
                        tracing::warn!(reason = %other, "access token verification failed");
                    }
                }
                AuthDecision::Deny(verification_failed_response(options, team_domain, &err))
            }
        }
    }
}

/// Response for a missing credential, per route class.
fn missing_credential_response(options: GateOptions, team_domain: &str) -> Response {
    match (options.route_class, options.redirect_on_missing) {
        (RouteClass::Html, true) => login_redirect(team_domain),
        (RouteClass::Json, _) => unauthorized_json(UnauthorizedBody::missing_credential()),
        (RouteClass::Html, false) => {
            unauthorized_html(team_domain, "Missing access token.", "Login")
        }
    }
}

/// Response for a failed verification, per route class.
///
/// Never a redirect: the caller presented a credential, so bounce pages
/// would loop. HTML callers get a re-login link instead.
fn verification_failed_response(
    options: GateOptions,
    team_domain: &str,
    err: &VerifyError,
) -> Response {
    match options.route_class {
        RouteClass::Json => {
            unauthorized_json(UnauthorizedBody::verification_failed(err.to_string()))
        }
        RouteClass::Html => unauthorized_html(
            team_domain,
            "Your access session is invalid or expired.",
            "Login again",
        ),
    }
}

// ── Middleware wrapper ──────────────────────────────────────────────────────

/// Run the gate for one request: forward with the identity attached on
/// `Allow`, return the terminal response on `Deny`.
///
/// Wire it up with a closure so each route group gets its own options:
///
/// ```ignore
/// let gate = AccessGate::new(config, verifier);
/// let options = GateOptions::json_api();
/// router.layer(from_fn(move |request: Request, next: Next| {
///     let gate = gate.clone();
///     async move { gate_request(&gate, options, request, next).await }
/// }))
/// ```
pub async fn gate_request(
    gate: &AccessGate,
    options: GateOptions,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.authenticate(request.headers(), options).await {
        AuthDecision::Allow(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        AuthDecision::Deny(response) => response,
    }
}

/// Extractor for the identity the access gate attached to the request.
///
/// A local wrapper around [`AccessIdentity`] so the axum extractor trait
/// can be implemented in this crate while `warden-core` stays HTTP-free.
/// Handlers destructure it: `Caller(identity): Caller`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub AccessIdentity);

/// Returns 401 if no identity is present, which means the route was
/// mounted outside the gate.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Caller {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessIdentity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| {
                unauthorized_json(UnauthorizedBody::verification_failed(
                    "no identity in request context",
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::AccessClaims;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Accepts exactly one token value; everything else is malformed.
    struct StaticVerifier {
        accept: &'static str,
    }

    #[async_trait]
    impl AccessVerifier for StaticVerifier {
        async fn verify(
            &self,
            token: &str,
            _team_domain: &str,
            _audience: &str,
        ) -> Result<AccessClaims, VerifyError> {
            if token == self.accept {
                Ok(AccessClaims {
                    email: "jane@example.com".to_string(),
                    name: "Jane".to_string(),
                })
            } else {
                Err(VerifyError::Malformed("signature check failed".to_string()))
            }
        }
    }

    /// Fails every verification with a fixed error.
    struct FailingVerifier(VerifyError);

    #[async_trait]
    impl AccessVerifier for FailingVerifier {
        async fn verify(
            &self,
            _token: &str,
            _team_domain: &str,
            _audience: &str,
        ) -> Result<AccessClaims, VerifyError> {
            Err(self.0.clone())
        }
    }

    fn enforced_config() -> GateConfig {
        GateConfig {
            team_domain: Some("team.example.com".to_string()),
            audience: Some("aud-tag".to_string()),
            ..GateConfig::default()
        }
    }

    /// Echo the attached identity's email.
    async fn whoami(Caller(identity): Caller) -> String {
        identity.email
    }

    fn test_app(
        config: GateConfig,
        verifier: Arc<dyn AccessVerifier>,
        options: GateOptions,
    ) -> Router {
        let gate = AccessGate::new(Arc::new(config), verifier);
        Router::new().route("/test", get(whoami)).layer(from_fn(
            move |request: Request<Body>, next: Next| {
                let gate = gate.clone();
                async move { gate_request(&gate, options, request, next).await }
            },
        ))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dev_mode_allows_with_developer_identity() {
        let config = GateConfig {
            dev_mode: true,
            ..enforced_config()
        };
        let app = test_app(config, Arc::new(FailingVerifier(VerifyError::Expired)), GateOptions::json_api());

        // Garbage token present; it must never reach the verifier.
        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "garbage")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "dev@localhost");
    }

    #[tokio::test]
    async fn e2e_mode_allows_without_verification() {
        let config = GateConfig {
            e2e_test_mode: true,
            ..enforced_config()
        };
        let app = test_app(config, Arc::new(FailingVerifier(VerifyError::Expired)), GateOptions::json_api());

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "dev@localhost");
    }

    #[tokio::test]
    async fn unconfigured_provider_allows_anonymous() {
        // No team domain / audience: open access even with a garbage token.
        let app = test_app(
            GateConfig::default(),
            Arc::new(FailingVerifier(VerifyError::Expired)),
            GateOptions::json_api(),
        );

        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "garbage")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous@local");
    }

    #[tokio::test]
    async fn enforced_valid_token_attaches_claim_identity() {
        let app = test_app(
            enforced_config(),
            Arc::new(StaticVerifier { accept: "good" }),
            GateOptions::json_api(),
        );

        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "good")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "jane@example.com");
    }

    #[tokio::test]
    async fn header_token_wins_over_cookie_token() {
        let verifier = Arc::new(StaticVerifier { accept: "good" });

        // Good header, bad cookie: verification runs on the header value.
        let app = test_app(enforced_config(), verifier.clone(), GateOptions::json_api());
        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "good")
            .header(header::COOKIE, "CF_Authorization=bad")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Bad header, good cookie: still denied, proving the header won.
        let app = test_app(enforced_config(), verifier, GateOptions::json_api());
        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "bad")
            .header(header::COOKIE, "CF_Authorization=good")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_on_json_route_is_401_with_hint() {
        let app = test_app(
            enforced_config(),
            Arc::new(StaticVerifier { accept: "good" }),
            GateOptions::json_api(),
        );

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Unauthorized");
        assert!(body["hint"].as_str().unwrap().contains("Missing access token"));
    }

    #[tokio::test]
    async fn missing_token_on_html_route_redirects_when_asked() {
        let app = test_app(
            enforced_config(),
            Arc::new(StaticVerifier { accept: "good" }),
            GateOptions::html_ui(true),
        );

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://team.example.com"
        );
    }

    #[tokio::test]
    async fn missing_token_on_html_route_serves_login_page_otherwise() {
        let app = test_app(
            enforced_config(),
            Arc::new(StaticVerifier { accept: "good" }),
            GateOptions::html_ui(false),
        );

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("<h1>Unauthorized</h1>"));
        assert!(body.contains("Missing access token."));
        assert!(body.contains("https://team.example.com"));
        assert!(body.contains(">Login</a>"));
    }

    #[tokio::test]
    async fn verification_failure_on_json_route_surfaces_details() {
        let app = test_app(
            enforced_config(),
            Arc::new(FailingVerifier(VerifyError::Expired)),
            GateOptions::json_api(),
        );

        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "some-token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["details"], "token expired");
    }

    #[tokio::test]
    async fn verification_failure_on_html_route_is_never_a_redirect() {
        // Even with redirect_on_missing set: the credential was present.
        let app = test_app(
            enforced_config(),
            Arc::new(FailingVerifier(VerifyError::AudienceMismatch)),
            GateOptions::html_ui(true),
        );

        let request = Request::builder()
            .uri("/test")
            .header(extract::ACCESS_TOKEN_HEADER, "some-token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("invalid or expired"));
        assert!(body.contains(">Login again</a>"));
    }

    #[tokio::test]
    async fn same_request_yields_same_decision() {
        let app = test_app(
            enforced_config(),
            Arc::new(StaticVerifier { accept: "good" }),
            GateOptions::json_api(),
        );

        for _ in 0..3 {
            let request = Request::builder()
                .uri("/test")
                .header(extract::ACCESS_TOKEN_HEADER, "good")
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn caller_extractor_yields_the_attached_identity() {
        async fn full_identity(Caller(identity): Caller) -> String {
            format!("{} <{}>", identity.name, identity.email)
        }

        let config = GateConfig {
            dev_mode: true,
            ..GateConfig::default()
        };
        let gate = AccessGate::new(
            Arc::new(config),
            Arc::new(StaticVerifier { accept: "good" }),
        );
        let app = Router::new().route("/test", get(full_identity)).layer(from_fn(
            move |request: Request<Body>, next: Next| {
                let gate = gate.clone();
                async move { gate_request(&gate, GateOptions::json_api(), request, next).await }
            },
        ));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Dev User <dev@localhost>");
    }

    #[tokio::test]
    async fn extractor_rejects_route_mounted_outside_the_gate() {
        let app = Router::new().route("/test", get(whoami));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
