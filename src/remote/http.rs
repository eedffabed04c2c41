//! HTTP implementation of the remote toggle call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::RemoteSettings;
use crate::domain::likes::ToggleOutcome;
use crate::infra::error::InfraError;

use super::credentials::CredentialProvider;
use super::{RemoteError, RemoteToggle};

/// Reqwest-backed toggle client.
///
/// `PUT {base_url}/api/posts/{id}/like` with bearer auth; the endpoint
/// responds `{"liked": bool, "likeCount": number}`. The request timeout is
/// the client's own; the toggle executor above adds none.
pub struct HttpToggleClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpToggleClient {
    pub fn new(
        settings: &RemoteSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("toggle client could not be built: {err}"))
            })?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            credentials,
        })
    }

    fn endpoint_for(&self, post_id: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(&format!("api/posts/{post_id}/like"))
            .map_err(|_| RemoteError::Endpoint {
                post_id: post_id.to_string(),
            })
    }
}

#[async_trait]
impl RemoteToggle for HttpToggleClient {
    async fn toggle(&self, post_id: &str) -> Result<ToggleOutcome, RemoteError> {
        let credential = self.credentials.current()?;
        let endpoint = self.endpoint_for(post_id)?;

        debug!(post_id, endpoint = %endpoint, "Issuing like toggle request");

        let response = self
            .http
            .put(endpoint)
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<ToggleOutcome>()
            .await
            .map_err(RemoteError::Payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StaticCredentials;

    fn client() -> HttpToggleClient {
        let settings = RemoteSettings {
            base_url: Url::parse("https://blog.example.org/").expect("base url"),
            timeout_secs: 5,
        };
        HttpToggleClient::new(&settings, Arc::new(StaticCredentials::new("tok")))
            .expect("client builds")
    }

    #[test]
    fn endpoint_joins_post_id() {
        let endpoint = client().endpoint_for("post_1").expect("endpoint");
        assert_eq!(
            endpoint.as_str(),
            "https://blog.example.org/api/posts/post_1/like"
        );
    }
}
