#![deny(missing_docs)]

//! # warden-core — Foundational Types for the Warden Authentication Gate
//!
//! This crate holds the pure, HTTP-free half of the gate: configuration,
//! mode resolution, and the identity record attached to authenticated
//! requests. It depends only on `serde` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Configuration is an injected value.** [`GateConfig`] is read from
//!    the process environment exactly once at startup and passed to every
//!    gate by value. Nothing in this workspace reads ambient global state
//!    during request handling.
//!
//! 2. **Mode is an enum, resolved in one place.** [`AuthMode::resolve`]
//!    owns the precedence `Development > E2ETest > Unconfigured > Enforced`.
//!    Callers `match` exhaustively; there are no scattered boolean checks.
//!
//! 3. **Fail-open is deliberate.** An unconfigured access provider or an
//!    unset basic credential pair means open access, not denial. This suits
//!    local and preview deployments; production operators must set the
//!    provider parameters to get enforcement. See [`AuthMode::Unconfigured`].

pub mod config;
pub mod identity;
pub mod mode;

// Re-export primary types at crate root for ergonomic imports.
pub use config::GateConfig;
pub use identity::AccessIdentity;
pub use mode::AuthMode;
