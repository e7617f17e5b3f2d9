// ABOUTME: Blocking HTTP client for the ClickUp Docs API
// ABOUTME: Handles request pacing, auth headers, and retry with exponential backoff

use crate::model::{self, Document, PageNode, Workspace};
use crate::util::truncate_str;
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.clickup.com/api";

const USER_AGENT: &str = concat!("clickup-docs-export/", env!("CARGO_PKG_VERSION"));

/// Retry policy for rate-limited (429) and failing (5xx) responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub rate_limit_cap: Duration,
    pub server_error_cap: Duration,
    pub max_server_retries: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            initial: Duration::from_millis(1000),
            rate_limit_cap: Duration::from_millis(60_000),
            server_error_cap: Duration::from_millis(30_000),
            max_server_retries: 3,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (1-based), or `None` if the
    /// response should be surfaced. 429 is retried without limit.
    pub fn delay_for(&self, status: u16, attempt: u32) -> Option<Duration> {
        let cap = match status {
            429 => self.rate_limit_cap,
            500..=599 if attempt <= self.max_server_retries => self.server_error_cap,
            _ => return None,
        };

        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        Some(self.initial.saturating_mul(factor).min(cap))
    }
}

/// Picks the most specific message a failed response offers.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["err", "error"].iter().find_map(|field| {
            json.get(*field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    });

    from_body
        .or_else(|| {
            status
                .canonical_reason()
                .map(|reason| format!("Request failed with status code {} ({})", status.as_u16(), reason))
        })
        .unwrap_or_else(|| "ClickUp API error".to_string())
}

/// Deserializes each list entry on its own, dropping the ones that don't fit.
/// A `null` list reads as empty.
fn parse_entries<T: DeserializeOwned>(entries: Option<Vec<Value>>, what: &str) -> Vec<T> {
    entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<T>(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping malformed {} entry: {}", what, e);
                None
            }
        })
        .collect()
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    request_delay: Duration,
    backoff: Backoff,
}

impl ApiClient {
    pub fn new(token: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE.into());

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            request_delay: Duration::from_millis(100),
            backoff: Backoff::default(),
        })
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn disable_throttle(mut self) -> Self {
        self.request_delay = Duration::ZERO;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    fn pace(&self) {
        if !self.request_delay.is_zero() {
            std::thread::sleep(self.request_delay);
        }
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        self.get_with(endpoint, query, &self.backoff)
    }

    fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        backoff: &Backoff,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt: u32 = 0;

        loop {
            self.pace();
            tracing::debug!(%url, attempt, "GET");

            let response = self
                .client
                .get(&url)
                .query(query)
                .header("Authorization", self.token.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .header("User-Agent", USER_AGENT)
                .send()?;

            let status = response.status();
            if status.is_success() {
                let body = response.text()?;
                return serde_json::from_str(&body).map_err(|e| {
                    tracing::debug!(
                        endpoint,
                        body = %truncate_str(&body, 500),
                        "failed to parse response: {}",
                        e
                    );
                    Error::Parse(e)
                });
            }

            attempt += 1;
            if let Some(delay) = backoff.delay_for(status.as_u16(), attempt) {
                tracing::warn!(
                    endpoint,
                    status = status.as_u16(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "request throttled or failed, backing off"
                );
                std::thread::sleep(delay);
                continue;
            }

            let body = response.text().unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), error_message(status, &body)));
        }
    }

    /// Lists accessible workspaces, falling back to the legacy `/v2/team` listing.
    ///
    /// The primary endpoint gets no 5xx retries so an outage there falls
    /// through to the legacy listing right away; 429s are still waited out.
    pub fn get_workspaces(&self) -> Result<Vec<Workspace>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            workspaces: Option<Vec<Value>>,
        }

        #[derive(Deserialize)]
        struct LegacyResponse {
            #[serde(default)]
            teams: Option<Vec<Value>>,
        }

        let primary = Backoff {
            max_server_retries: 0,
            ..self.backoff
        };

        match self.get_with::<Response>("/v3/workspaces", &[], &primary) {
            Ok(resp) => Ok(parse_entries(resp.workspaces, "workspace")),
            Err(e) => {
                tracing::debug!(error = %e, "workspace listing failed, trying /v2/team");
                let resp: LegacyResponse = self.get("/v2/team", &[])?;
                Ok(parse_entries(resp.teams, "workspace"))
            }
        }
    }

    /// First page (up to 100) of live docs in a workspace.
    pub fn get_docs(&self, workspace_id: &str) -> Result<Vec<Document>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            docs: Option<Vec<Value>>,
        }

        let endpoint = format!("/v3/workspaces/{}/docs", workspace_id);
        let resp: Response = self.get(
            &endpoint,
            &[("deleted", "false"), ("archived", "false"), ("limit", "100")],
        )?;

        Ok(parse_entries(resp.docs, "doc"))
    }

    pub fn get_doc(&self, workspace_id: &str, doc_id: &str) -> Result<Document> {
        let endpoint = format!("/v3/workspaces/{}/docs/{}", workspace_id, doc_id);
        let resp: Value = self.get(&endpoint, &[])?;

        let doc = match resp {
            Value::Object(mut map) => match map.remove("doc") {
                Some(inner @ Value::Object(_)) => inner,
                _ => Value::Object(map),
            },
            other => other,
        };
        Ok(serde_json::from_value(doc)?)
    }

    /// Full page hierarchy of a doc, normalized to its top-level nodes.
    pub fn get_page_listing(&self, workspace_id: &str, doc_id: &str) -> Result<Vec<PageNode>> {
        let endpoint = format!("/v3/workspaces/{}/docs/{}/page_listing", workspace_id, doc_id);
        let resp: Value = self.get(&endpoint, &[("max_page_depth", "-1")])?;
        Ok(model::page_listing(resp))
    }

    /// Raw page response; use [`model::page_content`] to pull the markdown out.
    pub fn get_page_content(&self, workspace_id: &str, doc_id: &str, page_id: &str) -> Result<Value> {
        let endpoint = format!(
            "/v3/workspaces/{}/docs/{}/pages/{}",
            workspace_id, doc_id, page_id
        );
        self.get(&endpoint, &[("content_format", "text/md")])
    }
}
