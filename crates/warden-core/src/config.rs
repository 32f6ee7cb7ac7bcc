//! # Gate Configuration
//!
//! Read-only configuration for both gates, captured once at process
//! startup and injected by value. All fields are optional; absence has
//! defined fallback behavior (see [`crate::mode::AuthMode`]).
//!
//! ## Environment surface
//!
//! | Variable              | Field            | Meaning                          |
//! |-----------------------|------------------|----------------------------------|
//! | `DEV_MODE`            | `dev_mode`       | skip all verification            |
//! | `E2E_TEST_MODE`       | `e2e_test_mode`  | skip access verification only    |
//! | `ACCESS_TEAM_DOMAIN`  | `team_domain`    | access provider login domain     |
//! | `ACCESS_AUD`          | `audience`       | expected token audience          |
//! | `BASIC_AUTH_USERNAME` | `basic_username` | basic gate expected username     |
//! | `BASIC_AUTH_PASSWORD` | `basic_password` | basic gate expected password     |
//!
//! Boolean flags are truthy only for the exact string `true`.

use serde::{Deserialize, Serialize};

/// Read-only configuration for the access and basic gates.
///
/// Set once at process startup, never mutated during request handling.
/// Any number of in-flight requests may read it concurrently.
///
/// Custom `Debug` redacts the basic password to prevent credential
/// leakage in logs.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Development mode: every gate allows unconditionally.
    pub dev_mode: bool,
    /// End-to-end test mode: the access gate allows without verification,
    /// but the basic gate still compares credentials.
    pub e2e_test_mode: bool,
    /// Access provider team/realm domain, e.g. `example.cloudflareaccess.com`.
    /// Also the login target for redirects and HTML login links.
    pub team_domain: Option<String>,
    /// Expected audience of the access token.
    pub audience: Option<String>,
    /// Expected username for the basic gate.
    pub basic_username: Option<String>,
    /// Expected password for the basic gate.
    pub basic_password: Option<String>,
}

impl GateConfig {
    /// Snapshot configuration from the process environment.
    ///
    /// Intended to be called exactly once, from the binary entry point.
    pub fn from_env() -> Self {
        Self {
            dev_mode: truthy(std::env::var("DEV_MODE").ok()),
            e2e_test_mode: truthy(std::env::var("E2E_TEST_MODE").ok()),
            team_domain: non_empty(std::env::var("ACCESS_TEAM_DOMAIN").ok()),
            audience: non_empty(std::env::var("ACCESS_AUD").ok()),
            basic_username: non_empty(std::env::var("BASIC_AUTH_USERNAME").ok()),
            basic_password: non_empty(std::env::var("BASIC_AUTH_PASSWORD").ok()),
        }
    }

    /// True when both access provider parameters are present.
    pub fn access_provider_configured(&self) -> bool {
        self.team_domain.is_some() && self.audience.is_some()
    }

    /// True when both basic credentials are present.
    pub fn basic_credentials_configured(&self) -> bool {
        self.basic_username.is_some() && self.basic_password.is_some()
    }
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("dev_mode", &self.dev_mode)
            .field("e2e_test_mode", &self.e2e_test_mode)
            .field("team_domain", &self.team_domain)
            .field("audience", &self.audience)
            .field("basic_username", &self.basic_username)
            .field(
                "basic_password",
                &self.basic_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Flag parsing: truthy only for the exact string `true`.
fn truthy(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Treat empty environment values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
