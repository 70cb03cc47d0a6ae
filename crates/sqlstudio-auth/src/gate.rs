//! The gate itself: throttle, verify, audit, decide.

use std::time::Duration;

use crate::audit::{AuditLog, LoginResult};
use crate::limiter::{RateDecision, RateLimiter};
use crate::secret::SharedSecret;

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credential accepted; present `token` on subsequent requests.
    Granted { token: String },
    /// Credential rejected; `remaining` attempts left in the window.
    Denied { remaining: u32 },
    /// Too many attempts from this address; try again after `retry_after`.
    Throttled { retry_after: Duration },
}

/// Orchestrates the rate limiter, credential verifier and audit sink.
///
/// Every login runs throttle -> verify -> audit. A throttled attempt
/// never reaches the verifier and leaves no audit line; the audit trail
/// records verification outcomes only. Throttling shows up in the
/// service log instead.
pub struct AuthGate {
    secret: SharedSecret,
    limiter: RateLimiter,
    audit: AuditLog,
}

impl AuthGate {
    pub fn new(secret: SharedSecret, limiter: RateLimiter, audit: AuditLog) -> Self {
        Self {
            secret,
            limiter,
            audit,
        }
    }

    /// Decide a login attempt from `addr` presenting `presented`.
    pub fn login(&self, addr: &str, presented: &str) -> LoginOutcome {
        match self.limiter.check_and_record(addr) {
            RateDecision::Throttled { retry_after } => {
                tracing::warn!(
                    addr,
                    retry_after_secs = retry_after.as_secs(),
                    "login throttled"
                );
                LoginOutcome::Throttled { retry_after }
            }
            RateDecision::Allowed { remaining } => {
                if self.secret.verify(presented) {
                    self.audit.record(addr, LoginResult::Success);
                    // A granted login gives the address its full budget back.
                    self.limiter.reset(addr);
                    tracing::info!(addr, "admin login succeeded");
                    LoginOutcome::Granted {
                        token: self.secret.token().to_string(),
                    }
                } else {
                    self.audit.record(addr, LoginResult::Failed);
                    tracing::warn!(addr, remaining, "admin login failed");
                    LoginOutcome::Denied { remaining }
                }
            }
        }
    }

    /// Check the bearer token presented on a non-login request.
    ///
    /// No rate limiting, no audit line, no state change: a plain
    /// constant-time equality check against the configured secret.
    pub fn authorize(&self, token: &str) -> bool {
        self.secret.verify(token)
    }

    /// Recent audit lines, most recent first.
    pub fn audit_recent(&self, limit: usize) -> Vec<String> {
        self.audit.recent(limit)
    }
}
