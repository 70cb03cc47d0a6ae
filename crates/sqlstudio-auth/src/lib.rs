//! Authentication gate for SQLStudio.
//!
//! A single pre-shared secret guards the whole console. This crate owns
//! everything in front of the credential check:
//! - Per-address sliding-window throttling of login attempts
//! - Constant-time verification of the presented secret
//! - An append-only audit trail of login outcomes
//!
//! The [`AuthGate`] ties the three together and decides every login
//! request; it has no HTTP types so the web layer stays a thin mapping
//! from outcomes to status codes.

pub mod audit;
pub mod gate;
pub mod limiter;
pub mod secret;

pub use audit::{AuditError, AuditLog, LoginResult};
pub use gate::{AuthGate, LoginOutcome};
pub use limiter::{RateDecision, RateLimitConfig, RateLimiter};
pub use secret::SharedSecret;
