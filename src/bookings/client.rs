// client.rs
use crate::bookings::fetcher::{Page, PageSource};
use crate::bookings::FetchError;
use crate::domain::complaints::{summarize_complaints, ComplaintSummary};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("courier-dashboard/", env!("CARGO_PKG_VERSION"));

// Upstream error bodies can be whole HTML pages; keep log lines short.
const MAX_ERROR_BODY: usize = 200;

/// Blocking client for the corporate booking API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl ApiClient {
    pub fn new(api_base: Url, token: String, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// `GET {api_base}/complaints`, tallied by status.
    pub fn fetch_complaints(&self) -> Result<ComplaintSummary, FetchError> {
        let body = self.get_json("complaints", &[])?;
        parse_complaints(&body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.api_base
            .join(path)
            .map_err(|e| FetchError::Network(format!("bad endpoint '{path}': {e}")))
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.endpoint(path)?;
        debug!(%url, ?query, "GET");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16(), truncate(&text)));
        }

        serde_json::from_str(&text).map_err(|e| FetchError::JsonParse(e.to_string()))
    }
}

impl PageSource for ApiClient {
    /// `GET {api_base}/bookings?page={page}&limit={page_size}`
    fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page, FetchError> {
        let body = self.get_json(
            "bookings",
            &[("page", page.to_string()), ("limit", page_size.to_string())],
        )?;
        Page::from_json(body)
    }
}

/// Complaints arrive as a bare array or under `data` / `complaints`.
pub fn parse_complaints(body: &Value) -> Result<ComplaintSummary, FetchError> {
    let items = body
        .as_array()
        .or_else(|| body.get("data").and_then(Value::as_array))
        .or_else(|| body.get("complaints").and_then(Value::as_array))
        .ok_or_else(|| FetchError::UnexpectedShape("complaints array missing".to_string()))?;

    Ok(summarize_complaints(
        items
            .iter()
            .map(|item| item.get("status").and_then(Value::as_str)),
    ))
}

fn truncate(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
