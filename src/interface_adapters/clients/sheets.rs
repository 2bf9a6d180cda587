use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::errors::SheetsError;
use crate::domain::ports::{Access, Grid, RangeUpdate, SheetsGateway};
use crate::interface_adapters::clients::config::SheetsConfig;

// Thin reqwest client for the Sheets v4 values API.
#[derive(Clone)]
pub struct SheetsClient {
    http: Client,
    config: Arc<SheetsConfig>,
}

#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    // Google omits `values` entirely for an empty range.
    #[serde(default)]
    values: Grid,
}

#[derive(Serialize)]
struct ValuesBody<'a> {
    values: &'a Grid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateBody<'a> {
    value_input_option: &'static str,
    data: Vec<BatchEntry<'a>>,
}

#[derive(Serialize)]
struct BatchEntry<'a> {
    range: &'a str,
    values: &'a Grid,
}

#[derive(Clone, Copy)]
enum Direction {
    Read,
    Write,
}

impl SheetsClient {
    pub fn new(config: Arc<SheetsConfig>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    // {base}/{spreadsheetId}/{segments...}; segments are percent-encoded.
    fn url(&self, spreadsheet_id: &str, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|err| SheetsError::Config(format!("invalid sheets base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Config("sheets base url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(spreadsheet_id)
            .extend(segments);
        Ok(url)
    }
}

// API key goes in the query string, a bearer credential in the header.
fn authorize(
    mut url: Url,
    api_key: &str,
    access: Access<'_>,
    build: impl FnOnce(Url) -> RequestBuilder,
) -> RequestBuilder {
    match access {
        Access::ApiKey => {
            url.query_pairs_mut().append_pair("key", api_key);
            build(url)
        }
        Access::Bearer(credential) => build(url).bearer_auth(&credential.access_token),
    }
}

async fn send(request: RequestBuilder, direction: Direction) -> Result<Response, SheetsError> {
    let response = request
        .send()
        .await
        .map_err(|err| SheetsError::Transport(err.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Keep upstream status and body text for the caller's error message.
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "sheets request rejected");
    let status = status.as_u16();
    Err(match direction {
        Direction::Read => SheetsError::UpstreamRead { status, body },
        Direction::Write => SheetsError::UpstreamWrite { status, body },
    })
}

#[async_trait]
impl SheetsGateway for SheetsClient {
    async fn read_range(&self, range: &str, access: Access<'_>) -> Result<Grid, SheetsError> {
        let required = self.config.require()?;
        let url = self.url(required.spreadsheet_id, &["values", range])?;
        let request = authorize(url, required.api_key, access, |url| self.http.get(url));

        tracing::debug!(range, "reading sheet range");
        let response = send(request, Direction::Read).await?;
        let payload = response
            .json::<ValueRangeResponse>()
            .await
            .map_err(|err| SheetsError::Decode(err.to_string()))?;
        Ok(payload.values)
    }

    async fn write_range(
        &self,
        range: &str,
        values: Grid,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        let required = self.config.require()?;
        let mut url = self.url(required.spreadsheet_id, &["values", range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let request = authorize(url, required.api_key, access, |url| self.http.put(url))
            .json(&ValuesBody { values: &values });

        tracing::debug!(range, "writing sheet range");
        send(request, Direction::Write).await?;
        Ok(())
    }

    async fn batch_write(
        &self,
        updates: Vec<RangeUpdate>,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        let required = self.config.require()?;
        let url = self.url(required.spreadsheet_id, &["values:batchUpdate"])?;
        let body = BatchUpdateBody {
            value_input_option: "RAW",
            data: updates
                .iter()
                .map(|update| BatchEntry {
                    range: &update.range,
                    values: &update.values,
                })
                .collect(),
        };
        let request = authorize(url, required.api_key, access, |url| self.http.post(url))
            .json(&body);

        tracing::debug!(ranges = updates.len(), "batch writing sheet ranges");
        send(request, Direction::Write).await?;
        Ok(())
    }
}
