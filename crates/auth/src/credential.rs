use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential")]
    InvalidCredential,
}

/// Decides whether a request credential grants access.
///
/// The credential is the raw header value as bytes, untouched; it need not be
/// valid UTF-8. Implementations must not
/// perform I/O; the check runs before every request.
pub trait CredentialValidator: Send + Sync {
    fn validate(&self, credential: Option<&[u8]>) -> Result<(), AuthError>;
}
