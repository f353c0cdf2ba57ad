use aishub_core::BoundingBox;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::{
    Result,
    error::{BodySnafu, FailedRequestSnafu, RequestSnafu},
};

/// Client for the AisHub web service.
#[derive(Debug, Clone)]
pub struct AisHubClient {
    client: ClientWithMiddleware,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct AisHubQuery<'a> {
    username: &'a str,
    /// 1 = human readable field values.
    format: u8,
    output: &'a str,
    compress: u8,
    latmin: f64,
    latmax: f64,
    lonmin: f64,
    lonmax: f64,
}

impl AisHubClient {
    pub fn new(url: String, api_key: String, max_retries: u32) -> AisHubClient {
        let client = ClientBuilder::new(Client::new())
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(max_retries),
            ))
            .build();

        AisHubClient {
            client,
            url,
            api_key,
        }
    }

    /// Fetches the raw response body for all vessels within `bbox`.
    pub async fn fetch(&self, bbox: &BoundingBox) -> Result<String> {
        let query = AisHubQuery {
            username: &self.api_key,
            format: 1,
            output: "json",
            compress: 0,
            latmin: bbox.latmin,
            latmax: bbox.latmax,
            lonmin: bbox.lonmin,
            lonmax: bbox.lonmax,
        };

        let response = self
            .client
            .get(&self.url)
            .query(&query)
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: response.url().to_string(),
                status,
                body: response.text().await.context(BodySnafu)?,
            }
            .fail();
        }

        response.text().await.context(BodySnafu)
    }
}
