//! Direct HTTP binding to the targeted content service.
//!
//! Sends a trigger-point event and reads back the matching content:
//!
//! ```text
//! POST {base_url}/{organization_code}/targeted-content-events
//! {"type":"trigger-point","userId":"u1","userIdVerification":"…",
//!  "triggerPoint":"payments","platform":"desktop","contentTypes":["featurette"]}
//!
//! 201 Created
//! {"content":[{"triggerPoint":"payments","viewUrl":"…","presentationType":"popup"}]}
//! ```
//!
//! Only `201` is success. Every other status is a failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waypoint_core::{ContentItem, ContentRequest, ContentSource, FetchError, Platform};

/// Maximum number of error-body bytes kept in a [`FetchError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Content source that talks to the service over plain HTTP.
#[derive(Clone)]
pub struct HttpContentSource {
    base_url: String,
    organization_code: String,
    client: reqwest::Client,
}

impl HttpContentSource {
    /// Create a new HTTP content source.
    pub fn new(
        base_url: impl Into<String>,
        organization_code: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization_code: organization_code.into(),
            client,
        })
    }

    /// The URL trigger-point events are posted to.
    pub fn events_url(&self) -> String {
        format!(
            "{}/{}/targeted-content-events",
            self.base_url, self.organization_code
        )
    }
}

/// Request body of a trigger-point event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerPointEvent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    user_id: &'a str,
    user_id_verification: &'a str,
    trigger_point: &'a str,
    platform: Platform,
    content_types: &'a [String],
}

impl<'a> From<&'a ContentRequest> for TriggerPointEvent<'a> {
    fn from(request: &'a ContentRequest) -> Self {
        Self {
            kind: "trigger-point",
            user_id: request.identity.as_str(),
            user_id_verification: request.token.as_str(),
            trigger_point: request.trigger_point.as_str(),
            platform: request.platform,
            content_types: &request.content_types,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Vec<ContentItem>,
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn request_content(
        &self,
        request: &ContentRequest,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let url = self.events_url();
        debug!(
            url = %url,
            user = %request.identity,
            trigger_point = %request.trigger_point,
            "Posting trigger-point event"
        );

        let response = self
            .client
            .post(&url)
            .json(&TriggerPointEvent::from(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(e.to_string())
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 201 {
            let mut error_body = response.text().await.unwrap_or_default();
            error_body.truncate(
                error_body
                    .char_indices()
                    .nth(MAX_ERROR_BODY)
                    .map(|(i, _)| i)
                    .unwrap_or(error_body.len()),
            );
            warn!(status, body = %error_body, "Content service returned error");
            return Err(FetchError::Status {
                status_code: status,
                message: error_body,
            });
        }

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(items = body.content.len(), "Content received");
        Ok(body.content)
    }
}
