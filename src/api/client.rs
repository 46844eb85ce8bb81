//! HTTP client for the Henrik Valorant API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::types::{Account, Envelope, ErrorBody, LifetimeMatch, MatchDetails, Page};
use crate::common::error::{ApiError, ApiResult};
use crate::common::{Region, RiotId};
use crate::config::ApiConfig;

/// Optional filters for the lifetime match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub page: u32,
    pub size: u32,
    pub map: Option<String>,
    pub mode: Option<String>,
}

impl Default for MatchQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            map: None,
            mode: None,
        }
    }
}

impl MatchQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(ref map) = self.map {
            params.push(("map", map.clone()));
        }
        if let Some(ref mode) = self.mode {
            params.push(("mode", mode.clone()));
        }
        params
    }
}

/// The API calls the bot makes.
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn account(&self, id: &RiotId, force: bool) -> ApiResult<Account>;

    async fn lifetime_matches(
        &self,
        region: Region,
        id: &RiotId,
        query: &MatchQuery,
    ) -> ApiResult<Page<LifetimeMatch>>;

    async fn match_details(&self, match_id: &str) -> ApiResult<MatchDetails>;
}

/// `reqwest`-backed [`StatsApi`].
pub struct HenrikClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HenrikClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("sova/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base = Url::parse(&config.base_url)?;
        let token = Some(config.token.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self { http, base, token })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> ApiResult<Envelope<T>> {
        debug!("GET {} {:?}", url, params);

        let mut request = self.http.get(url).query(params);
        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let error = status_error(status.as_u16(), &body);
            warn!("Henrik API error: {}", error);
            return Err(error);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        if envelope.status != 200 {
            return Err(ApiError::Status {
                status: envelope.status,
                message: None,
            });
        }
        Ok(envelope)
    }
}

/// Build a status error, pulling the first message out of the error body.
fn status_error(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .map(|e| e.message);
    ApiError::Status { status, message }
}

#[async_trait]
impl StatsApi for HenrikClient {
    async fn account(&self, id: &RiotId, force: bool) -> ApiResult<Account> {
        let url = self.endpoint(&["v1", "account", &id.name, &id.tag])?;
        let params = [("force", force.to_string())];
        Ok(self.fetch(url, &params).await?.data)
    }

    async fn lifetime_matches(
        &self,
        region: Region,
        id: &RiotId,
        query: &MatchQuery,
    ) -> ApiResult<Page<LifetimeMatch>> {
        let url = self.endpoint(&[
            "v1",
            "lifetime",
            "matches",
            region.as_str(),
            &id.name,
            &id.tag,
        ])?;
        let envelope = self.fetch(url, &query.to_params()).await?;
        Ok(Page {
            items: envelope.data,
            results: envelope.results,
        })
    }

    async fn match_details(&self, match_id: &str) -> ApiResult<MatchDetails> {
        let url = self.endpoint(&["v2", "match", match_id])?;
        Ok(self.fetch(url, &[]).await?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HenrikClient {
        HenrikClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://api.henrikdev.xyz/");
        let url = client
            .endpoint(&["v1", "account", "some name", "EU W"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.henrikdev.xyz/v1/account/some%20name/EU%20W"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://proxy.example.com/henrik");
        let url = client.endpoint(&["v2", "match", "abc"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/henrik/v2/match/abc");
    }

    #[test]
    fn test_empty_token_is_not_sent() {
        let client = client("https://api.henrikdev.xyz/");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_query_params() {
        let query = MatchQuery {
            page: 2,
            size: 5,
            map: Some("Ascent".to_string()),
            mode: None,
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "2".to_string()),
                ("size", "5".to_string()),
                ("map", "Ascent".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_error_extracts_message() {
        let body = br#"{"status":404,"errors":[{"message":"Account not found","code":22}]}"#;
        match status_error(404, body) {
            ApiError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message.as_deref(), Some("Account not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_tolerates_garbage_body() {
        assert!(matches!(
            status_error(502, b"<html>bad gateway</html>"),
            ApiError::Status { status: 502, message: None }
        ));
    }
}
