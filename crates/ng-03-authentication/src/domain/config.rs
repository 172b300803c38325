//! Authentication configuration.

use shared_types::VerdictBinding;
use std::time::Duration;

/// How identifiers are held locally and reported to the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierProtection {
    /// Store and wire carry raw tag identifiers.
    #[default]
    Plain,
    /// Store holds hex SHA-256 digests; records carry `encrypted_uid`.
    Encrypted,
}

impl std::str::FromStr for IdentifierProtection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "encrypted" => Ok(Self::Encrypted),
            other => Err(format!("unknown identifier protection mode: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticationConfig {
    /// Indicator toggle period while waiting on the edge.
    pub poll_interval: Duration,
    /// Number of intervals before an edge query gives up.
    pub poll_attempts: u32,
    /// How long the relay stays energized, and how long the result LED shows.
    pub relay_pulse: Duration,
    pub protection: IdentifierProtection,
    /// Reject verdicts that carry no valid edge signature.
    pub require_signed_verdicts: bool,
    /// Bytes the edge's verdict signature covers.
    pub verdict_binding: VerdictBinding,
    /// Insert identifiers the edge confirmed into the local store.
    pub cache_confirmed: bool,
}

impl AuthenticationConfig {
    /// Total time an edge query may stay open.
    #[must_use]
    pub fn edge_window(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }
}

impl Default for AuthenticationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            poll_attempts: 10,
            relay_pulse: Duration::from_secs(2),
            protection: IdentifierProtection::Plain,
            require_signed_verdicts: true,
            verdict_binding: VerdictBinding::Uid,
            cache_confirmed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_edge_window_is_five_seconds() {
        assert_eq!(AuthenticationConfig::default().edge_window(), Duration::from_secs(5));
    }

    #[test]
    fn test_protection_parse() {
        assert_eq!("Encrypted".parse::<IdentifierProtection>(), Ok(IdentifierProtection::Encrypted));
        assert_eq!(" plain ".parse::<IdentifierProtection>(), Ok(IdentifierProtection::Plain));
        assert!("hashed".parse::<IdentifierProtection>().is_err());
    }
}
