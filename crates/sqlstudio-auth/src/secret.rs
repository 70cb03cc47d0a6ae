//! Shared-secret credential verification.

use std::fmt;

use subtle::ConstantTimeEq;

/// The single pre-shared admin secret.
///
/// Possession of the secret grants full administrative access. It doubles
/// as the bearer token handed back on a successful login, so there is one
/// credential in the system and one comparison routine for it.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Compare `presented` against the configured secret in constant time.
    ///
    /// Comparison cost does not depend on where the first mismatching byte
    /// occurs, so response timing leaks nothing about near-misses.
    pub fn verify(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    /// The opaque bearer token issued to authenticated clients.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_verifies() {
        let secret = SharedSecret::new("admin123");
        assert!(secret.verify("admin123"));
    }

    #[test]
    fn near_misses_are_rejected() {
        let secret = SharedSecret::new("admin123");
        assert!(!secret.verify("admin124"));
        assert!(!secret.verify("Admin123"));
        assert!(!secret.verify("admin123 "));
        assert!(!secret.verify("admin12"));
        assert!(!secret.verify(""));
    }

    #[test]
    fn token_round_trips_through_verify() {
        let secret = SharedSecret::new("s3cr3t");
        assert!(secret.verify(secret.token()));
    }

    #[test]
    fn debug_output_redacts_the_value() {
        let secret = SharedSecret::new("hunter2");
        assert!(!format!("{secret:?}").contains("hunter2"));
    }
}
