//! # Access Token Verifier Contract
//!
//! The access gate does not verify tokens itself. Verification — signature
//! check, issuer and audience validation, expiry — belongs to an external
//! collaborator behind the [`AccessVerifier`] trait. This is the only
//! point in the gate that may await, fail for non-local reasons, or incur
//! network latency; cancellation of the inbound request propagates through
//! the `verify` future. Timeouts, if any, are the implementor's concern
//! and must surface as a [`VerifyError`], never a hang.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated claim returned by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Email address asserted by the provider.
    pub email: String,
    /// Display name asserted by the provider.
    pub name: String,
}

/// Why a token failed verification.
///
/// The rendered text is surfaced to JSON callers in the 401 `details`
/// field — the verifying party is trusted to control its own error
/// taxonomy. Implementors must fail (not allow) on expired, wrong-audience,
/// wrong-issuer, and malformed tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The token has expired.
    #[error("token expired")]
    Expired,

    /// The token's audience does not match the expected audience.
    #[error("audience mismatch")]
    AudienceMismatch,

    /// The token was not issued by the configured team domain.
    #[error("issuer mismatch")]
    IssuerMismatch,

    /// The token could not be parsed or its signature is invalid.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The verifier could not complete the check (key fetch failure,
    /// timeout, no verifier wired). Still a 401 for the caller.
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

/// Contract for the external token verification collaborator.
#[async_trait]
pub trait AccessVerifier: Send + Sync {
    /// Verify `token` against the provider at `team_domain` with the
    /// expected `audience`, returning the validated identity claim.
    async fn verify(
        &self,
        token: &str,
        team_domain: &str,
        audience: &str,
    ) -> Result<AccessClaims, VerifyError>;
}

/// Verifier for deployments that have not wired a real one.
///
/// Rejects every token. Open-access modes (development, e2e-test,
/// unconfigured provider) never reach the verifier, so a binary built with
/// this verifier still serves those postures correctly; an enforced
/// deployment must supply its own [`AccessVerifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllVerifier;

#[async_trait]
impl AccessVerifier for RejectAllVerifier {
    async fn verify(
        &self,
        _token: &str,
        _team_domain: &str,
        _audience: &str,
    ) -> Result<AccessClaims, VerifyError> {
        Err(VerifyError::Unavailable(
            "no token verifier configured".to_string(),
        ))
    }
}
