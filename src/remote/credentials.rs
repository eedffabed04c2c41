//! Credential capability for the remote toggle call.
//!
//! The identity provider's token lifecycle lives upstream; this seam only
//! asks for "the current credential, or a failure". An unauthenticated
//! viewer fails here before any request leaves the process.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("no current credential: {message}")]
pub struct CredentialError {
    message: String,
}

impl CredentialError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A bearer token for the remote toggle endpoint.
#[derive(Clone)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Tokens never appear in logs or error chains.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Source of the viewer's current credential.
pub trait CredentialProvider: Send + Sync {
    fn current(&self) -> Result<Credential, CredentialError>;
}

/// Fixed-token provider for tests and service-to-service callers.
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn current(&self) -> Result<Credential, CredentialError> {
        Ok(Credential::new(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_returns_token() {
        let provider = StaticCredentials::new("tok_123");
        let credential = provider.current().expect("credential");
        assert_eq!(credential.token(), "tok_123");
    }

    #[test]
    fn debug_redacts_token() {
        let credential = Credential::new("tok_secret");
        assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
    }
}
