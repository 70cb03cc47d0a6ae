//! Sliding-window rate limiting of login attempts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

/// Throttling knobs, injected at construction.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed within the window.
    pub max_attempts: u32,
    /// Duration of the sliding window.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of a rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The attempt was recorded; `remaining` more fit in the window.
    Allowed { remaining: u32 },
    /// Over the limit; a slot frees up after `retry_after`.
    Throttled { retry_after: Duration },
}

/// Per-address sliding window of login attempt timestamps.
///
/// An attempt at time T counts against every check performed before
/// T + window, so the limit cannot be gamed by waiting for a bucket
/// boundary. Expired timestamps are pruned from the front of each
/// window on the next check; each window holds at most `max_attempts`
/// entries. The map entry guard serializes concurrent checks for the
/// same address, so two racing attempts cannot both slip under the
/// limit.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, VecDeque<Instant>>,
    last_gc: Mutex<Instant>,
}

/// How often, at most, the full table is swept for idle addresses.
const GC_INTERVAL: Duration = Duration::from_secs(300);

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
            last_gc: Mutex::new(Instant::now()),
        }
    }

    /// Check whether an attempt from `addr` is allowed, recording it if so.
    ///
    /// A throttled attempt is not recorded: it does not extend the
    /// window it is already locked out of.
    pub fn check_and_record(&self, addr: &str) -> RateDecision {
        self.check_and_record_at(addr, Instant::now())
    }

    /// Timestamp-taking variant of [`check_and_record`], used by tests to
    /// drive window expiry deterministically.
    ///
    /// [`check_and_record`]: RateLimiter::check_and_record
    pub fn check_and_record_at(&self, addr: &str, now: Instant) -> RateDecision {
        self.maybe_gc(now);

        let mut window = self.windows.entry(addr.to_string()).or_default();

        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) >= self.config.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() as u32 >= self.config.max_attempts {
            // The oldest in-window attempt decides when a slot frees up.
            let retry_after = match window.front().copied() {
                Some(oldest) => self.config.window - now.duration_since(oldest),
                None => self.config.window,
            };
            return RateDecision::Throttled { retry_after };
        }

        window.push_back(now);
        let remaining = self.config.max_attempts - window.len() as u32;
        RateDecision::Allowed { remaining }
    }

    /// Forget all attempts for `addr`. Called after a successful login so
    /// a granted session does not eat into the failure budget.
    pub fn reset(&self, addr: &str) {
        self.windows.remove(addr);
    }

    /// Number of addresses currently tracked.
    pub fn tracked_addresses(&self) -> usize {
        self.windows.len()
    }

    /// Drop addresses whose windows have fully expired. Runs at most once
    /// per [`GC_INTERVAL`]; called from the check path so no background
    /// task is needed.
    fn maybe_gc(&self, now: Instant) {
        {
            let mut last = self.last_gc.lock();
            if now.duration_since(*last) < GC_INTERVAL {
                return;
            }
            *last = now;
        }

        let window = self.config.window;
        self.windows.retain(|_, attempts| {
            while let Some(oldest) = attempts.front() {
                if now.duration_since(*oldest) >= window {
                    attempts.pop_front();
                } else {
                    break;
                }
            }
            !attempts.is_empty()
        });
        tracing::debug!(active = self.windows.len(), "rate limiter gc completed");
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn allowed(decision: RateDecision) -> bool {
        matches!(decision, RateDecision::Allowed { .. })
    }

    #[test]
    fn first_three_attempts_allowed_fourth_throttled() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for i in 0..3 {
            let decision = limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(i));
            assert_eq!(
                decision,
                RateDecision::Allowed { remaining: 2 - i as u32 },
            );
        }

        let fourth = limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(3));
        assert!(matches!(fourth, RateDecision::Throttled { .. }));
    }

    #[test]
    fn window_slides_rather_than_resetting() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        limiter.check_and_record_at("10.0.0.1", start);
        limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(30));
        limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(50));

        // 59s: the first attempt is still inside the trailing window.
        assert!(!allowed(
            limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(59))
        ));

        // 61s: the first attempt has slid out, the later two remain.
        let decision = limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(61));
        assert_eq!(decision, RateDecision::Allowed { remaining: 0 });
    }

    #[test]
    fn throttled_attempts_are_not_recorded() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.check_and_record_at("10.0.0.1", start);
        }
        // Hammering while throttled must not extend the lockout.
        for i in 0..10 {
            let decision =
                limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(10 + i));
            assert!(!allowed(decision));
        }

        assert!(allowed(
            limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(61))
        ));
    }

    #[test]
    fn retry_after_counts_down_to_oldest_expiry() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.check_and_record_at("10.0.0.1", start);
        }

        match limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(45)) {
            RateDecision::Throttled { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(15));
            }
            other => panic!("expected throttled, got {other:?}"),
        }
    }

    #[test]
    fn addresses_are_tracked_independently() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.check_and_record_at("10.0.0.1", start);
        }
        assert!(!allowed(limiter.check_and_record_at("10.0.0.1", start)));
        assert!(allowed(limiter.check_and_record_at("10.0.0.2", start)));
    }

    #[test]
    fn reset_clears_the_window() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.check_and_record_at("10.0.0.1", start);
        }
        limiter.reset("10.0.0.1");
        assert_eq!(limiter.tracked_addresses(), 0);

        assert_eq!(
            limiter.check_and_record_at("10.0.0.1", start + Duration::from_secs(1)),
            RateDecision::Allowed { remaining: 2 },
        );
    }

    #[test]
    fn custom_config_is_honored() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_attempts: 1,
            window: Duration::from_secs(5),
        });
        let start = Instant::now();

        assert!(allowed(limiter.check_and_record_at("a", start)));
        assert!(!allowed(limiter.check_and_record_at("a", start + Duration::from_secs(4))));
        assert!(allowed(limiter.check_and_record_at("a", start + Duration::from_secs(5))));
    }

    #[test]
    fn concurrent_attempts_never_exceed_the_limit() {
        let limiter = Arc::new(RateLimiter::default());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                allowed(limiter.check_and_record("10.9.9.9"))
            }));
        }

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 3);
    }
}
