//! HTTP sheet fetcher.
//!
//! Reads the provider's published JSON list feed. Each feed entry is one row;
//! each cell is an object whose text lives under `$t`, keyed by the column
//! name with a `gsx$` prefix:
//!
//! ```json
//! {"feed": {"entry": [
//!     {"gsx$npm": {"$t": "111"}, "content": {"$t": "nama: Budi, modul1: 90"}}
//! ]}}
//! ```

use crate::SheetFetcher;
use crate::error::{ErrorKind, Result};
use crate::models::Record;
use async_trait::async_trait;
use exn::ResultExt;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::instrument;

const FIELD_PREFIX: &str = "gsx$";
const USER_AGENT: &str = concat!("sheetdex/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct Feed {
    feed: FeedBody,
}

#[derive(Deserialize)]
struct FeedBody {
    // The provider omits `entry` entirely for a sheet with no data rows.
    #[serde(default)]
    entry: Vec<BTreeMap<String, serde_json::Value>>,
}

/// Parse a list feed body into rows.
///
/// Only fields shaped like `{"$t": "..."}` are cells. A `gsx$`-prefixed
/// field wins over an unprefixed field of the same name.
pub(crate) fn parse_feed(body: &str) -> Result<Vec<Record>> {
    let feed: Feed = serde_json::from_str(body).or_raise(|| ErrorKind::InvalidData("list feed"))?;
    let rows = feed
        .feed
        .entry
        .into_iter()
        .map(|entry| {
            let mut plain = Vec::new();
            let mut prefixed = Vec::new();
            for (field, value) in entry {
                let Some(text) = value.get("$t").and_then(serde_json::Value::as_str) else {
                    continue;
                };
                match field.strip_prefix(FIELD_PREFIX) {
                    Some(column) => prefixed.push((column.to_string(), text.to_string())),
                    None => plain.push((field, text.to_string())),
                }
            }
            // Later pairs overwrite earlier ones when collected.
            plain.into_iter().chain(prefixed).collect::<Record>()
        })
        .collect();
    Ok(rows)
}

/// Fetches sheets over HTTP(S) from a URL template.
///
/// The template must contain `{sheet_id}` and `{tab_id}` placeholders.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url_template: String,
}

impl HttpFetcher {
    pub fn new(url_template: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .or_raise(|| ErrorKind::Network("failed to create HTTP client".to_string()))?;
        Ok(Self::with_client(client, url_template))
    }

    /// Use an already configured client (timeouts, proxies, ...).
    pub fn with_client(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    fn url(&self, sheet_id: &str, tab_id: &str) -> String {
        self.url_template.replace("{sheet_id}", sheet_id).replace("{tab_id}", tab_id)
    }
}

#[async_trait]
impl SheetFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, sheet_id: &str, tab_id: &str) -> Result<Vec<Record>> {
        let url = self.url(sheet_id, tab_id);
        let response = self.client.get(&url).send().await.or_raise(|| ErrorKind::Network(url.clone()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            exn::bail!(ErrorKind::NotFound(sheet_id.to_string(), tab_id.to_string()));
        }
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response.text().await.or_raise(|| ErrorKind::Network(url.clone()))?;
        let rows = parse_feed(&body)?;
        tracing::debug!(rows = rows.len(), "Fetched sheet");
        Ok(rows)
    }
}
