use super::errors::CryptoError;

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub valid: bool,
    /// Reason for rejection (if verification failed)
    pub error: Option<CryptoError>,
}

impl VerificationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    #[must_use]
    pub fn invalid(error: CryptoError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }

    /// Convert into a `Result` for `?` chains.
    pub fn into_result(self) -> Result<(), CryptoError> {
        match (self.valid, self.error) {
            (true, _) => Ok(()),
            (false, Some(e)) => Err(e),
            (false, None) => Err(CryptoError::VerificationFailed),
        }
    }
}
