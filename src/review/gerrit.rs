//! Gerrit REST implementation of [`ReviewClient`].

use super::{ChangeStatus, RemoteChange, ReviewClient};
use crate::config::Config;
use crate::error::{ClError, Result};
use serde::Deserialize;
use tracing::debug;

/// Gerrit prefixes JSON bodies with this line to defeat XSSI.
const XSSI_PREFIX: &str = ")]}'";

/// The subset of Gerrit's `ChangeInfo` this tool reads.
#[derive(Debug, Deserialize)]
struct ChangeInfo {
    #[serde(rename = "_number")]
    number: u64,
    status: String,
}

/// Blocking HTTP client for one Gerrit server.
#[derive(Debug)]
pub struct GerritClient {
    http: reqwest::blocking::Client,
    review_url: String,
    config: Config,
}

impl GerritClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("gerrit-cl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClError::ReviewError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            review_url: config.review_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| ClError::ReviewError(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClError::ReviewError(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }
        Ok(response)
    }
}

/// Decode a Gerrit change-list body into `(number, status)` pairs.
pub(crate) fn parse_change_list(body: &str) -> Result<Vec<(u64, ChangeStatus)>> {
    let json = body.trim_start().strip_prefix(XSSI_PREFIX).unwrap_or(body);
    let changes: Vec<ChangeInfo> = serde_json::from_str(json.trim_start())
        .map_err(|e| ClError::ReviewError(format!("malformed change list: {}", e)))?;

    Ok(changes
        .into_iter()
        .map(|c| (c.number, ChangeStatus::from_remote(&c.status)))
        .collect())
}

impl ReviewClient for GerritClient {
    fn query_changes(&self, project: &str, change_id: &str) -> Result<Vec<RemoteChange>> {
        let url = format!("{}/changes/", self.review_url);
        let query = format!("project:{} change:{}", project, change_id);
        let body = self
            .get(&url, &[("q", query.as_str())])?
            .text()
            .map_err(|e| ClError::ReviewError(format!("failed to read response: {}", e)))?;

        let changes: Vec<RemoteChange> = parse_change_list(&body)?
            .into_iter()
            .map(|(number, status)| RemoteChange {
                number,
                status,
                short_url: self.config.short_url(number),
            })
            .collect();

        debug!(project, change_id, matches = changes.len(), "queried review server");
        Ok(changes)
    }

    fn fetch_commit_msg_hook(&self) -> Result<Vec<u8>> {
        let bytes = self
            .get(&self.config.hook_url, &[])?
            .bytes()
            .map_err(|e| ClError::ReviewError(format!("failed to download hook: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
