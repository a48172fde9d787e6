use crate::credential::{AuthError, CredentialValidator};

/// Shared secret accepted when no token is configured.
pub const DEFAULT_TOKEN: &str = "token2019";

/// Single shared-secret validator.
///
/// The credential must equal the configured token byte-for-byte; there is no
/// scheme prefix (`Bearer ...`) handling, no expiry and no per-user identity.
#[derive(Debug, Clone)]
pub struct StaticTokenValidator {
    token: String,
}

impl StaticTokenValidator {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl Default for StaticTokenValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN)
    }
}

impl CredentialValidator for StaticTokenValidator {
    fn validate(&self, credential: Option<&[u8]>) -> Result<(), AuthError> {
        let credential = credential.ok_or(AuthError::MissingCredential)?;
        if credential == self.token.as_bytes() {
            Ok(())
        } else {
            Err(AuthError::InvalidCredential)
        }
    }
}
