//! # Middleware
//!
//! The two request gates. Each request passes through at most one of them
//! before reaching its handler; the gate either forwards the request or
//! short-circuits with a terminal response.

pub mod access;
pub mod basic;
