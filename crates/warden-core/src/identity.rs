//! # Request Identity
//!
//! The identity record attached to a request after successful
//! authentication. Produced either from a verified access token claim or
//! synthetically in development / test / unconfigured modes. Lives for one
//! request; never persisted.

use serde::{Deserialize, Serialize};

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessIdentity {
    /// The caller's email address, as asserted by the access provider
    /// (or a fixed synthetic value outside enforced mode).
    pub email: String,
    /// The caller's display name.
    pub name: String,
}

impl AccessIdentity {
    /// Build an identity from a verified claim.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Fixed synthetic identity for development and e2e-test modes.
    pub fn developer() -> Self {
        Self::new("dev@localhost", "Dev User")
    }

    /// Fixed synthetic identity for unconfigured-provider deployments.
    pub fn anonymous() -> Self {
        Self::new("anonymous@local", "Anonymous")
    }
}
