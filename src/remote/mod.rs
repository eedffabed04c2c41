//! Remote toggle call and the credential capability it authenticates with.
//!
//! The server-side route, auth check, and persistence write are external
//! collaborators: this module only owns the client-side seam.

mod credentials;
mod http;

pub use credentials::{Credential, CredentialError, CredentialProvider, StaticCredentials};
pub use http::HttpToggleClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::likes::ToggleOutcome;

/// Errors a toggle call can surface to the executor.
///
/// The executor rolls back on any of these and re-raises unchanged; the
/// caller decides how to report it.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("toggle endpoint could not be built for post `{post_id}`")]
    Endpoint { post_id: String },
    #[error("toggle endpoint returned status {status}")]
    Http { status: u16 },
    #[error("toggle request failed in transit")]
    Transport(#[source] reqwest::Error),
    #[error("toggle response could not be decoded")]
    Payload(#[source] reqwest::Error),
}

/// A single network request that flips the viewer's like relation
/// server-side and returns the authoritative state.
#[async_trait]
pub trait RemoteToggle: Send + Sync {
    async fn toggle(&self, post_id: &str) -> Result<ToggleOutcome, RemoteError>;
}
