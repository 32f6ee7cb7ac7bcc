//! # Authentication Mode Resolution
//!
//! [`AuthMode`] replaces scattered boolean flag checks with a single
//! enum computed per request from the immutable [`GateConfig`]. The
//! precedence order lives in exactly one function, [`AuthMode::resolve`],
//! so it can be tested exhaustively and matched exhaustively.

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;

/// Which authentication scheme applies to a request.
///
/// Precedence: `Development > E2ETest > Unconfigured > Enforced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Development flag set. Every gate allows unconditionally; the access
    /// gate attaches the fixed developer identity. Takes absolute
    /// precedence over all other configuration.
    Development,
    /// End-to-end test flag set. The access gate behaves like
    /// [`AuthMode::Development`]; the basic gate is deliberately
    /// unaffected, so tests still exercise credential comparison.
    E2ETest,
    /// Access provider parameters absent. The access gate allows with the
    /// fixed anonymous identity — the default posture is open access until
    /// a provider is deliberately configured, not closed.
    Unconfigured,
    /// Provider fully configured: extract and verify a credential.
    Enforced,
}

impl AuthMode {
    /// Resolve the mode from configuration.
    ///
    /// This is the only place the precedence order is encoded.
    pub fn resolve(config: &GateConfig) -> Self {
        if config.dev_mode {
            Self::Development
        } else if config.e2e_test_mode {
            Self::E2ETest
        } else if !config.access_provider_configured() {
            Self::Unconfigured
        } else {
            Self::Enforced
        }
    }

    /// String form for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::E2ETest => "e2e_test",
            Self::Unconfigured => "unconfigured",
            Self::Enforced => "enforced",
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
