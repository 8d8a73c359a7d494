//! Remote provider: JSON over HTTP

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use timesheet_api::{TimesheetRequest, TimesheetResult, TIMESHEET_ENDPOINT};
use tracing::{debug, warn};

use crate::{ProviderError, ProviderResult, TimesheetProvider};

/// Header carrying the session token
pub const SESSION_HEADER: &str = "sessionId";

/// Parse a service base URL: absolute, http(s), with a host
pub fn parse_base_url(base_url: &str) -> Result<Url, String> {
    let url = Url::parse(base_url.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}', expected http or https", url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("missing host".into());
    }

    Ok(url)
}

/// Timesheet endpoint under `base`, keeping any base path and query
pub fn endpoint_url(mut base: Url) -> Result<Url, String> {
    base.set_fragment(None);
    base.path_segments_mut()
        .map_err(|_| "URL cannot be a base".to_string())?
        .pop_if_empty()
        .extend(TIMESHEET_ENDPOINT.split('/').filter(|s| !s.is_empty()));
    Ok(base)
}

/// Provider that posts to `{base_url}/api/student/timesheet`
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: Client,
    endpoint: Url,
}

impl RemoteProvider {
    pub fn new(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        let endpoint = parse_base_url(base_url)
            .and_then(endpoint_url)
            .map_err(|message| ProviderError::InvalidUrl {
                value: base_url.to_string(),
                message,
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("timesheet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl TimesheetProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, request: &TimesheetRequest) -> ProviderResult<TimesheetResult> {
        debug!(
            endpoint = %self.endpoint,
            student_id = %request.student_id,
            "Requesting timesheet"
        );

        // `.json()` also sets `Content-Type: application/json`
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(SESSION_HEADER, request.session_id.as_str())
            .json(&request.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Timesheet request rejected");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
