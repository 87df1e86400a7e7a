//! Mist REST client
//!
//! Blocking reqwest client (no Tokio runtime required). Every call is a
//! single authenticated GET; failures surface as [`ApiError`] and abort the
//! run.

use crate::error::ApiError;
use crate::mist::models::{parse_switch_stats, NetworkTemplate, Site, SwitchStats};
use crate::mist::traits::MistApi;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("switch-ip-check/", env!("CARGO_PKG_VERSION"));

/// Mist API client for one organization
pub struct MistClient {
    http: Client,
    base_url: String,
    org_id: String,
    token: String,
}

impl MistClient {
    /// Create a new client
    ///
    /// `host` is either a bare host name (`api.mist.com`, `api.eu.mist.com`)
    /// reached over HTTPS, or a full base URL.
    pub fn new(
        host: &str,
        org_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url(host),
            org_id: org_id.into(),
            token: token.into(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized(endpoint.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        resp.json::<T>().map_err(|e| ApiError::Parse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

impl MistApi for MistClient {
    fn org_id(&self) -> &str {
        &self.org_id
    }

    fn sites(&self) -> Result<Vec<Site>, ApiError> {
        self.get(&format!("/api/v1/orgs/{}/sites", self.org_id), &[])
    }

    fn network_templates(&self) -> Result<Vec<NetworkTemplate>, ApiError> {
        self.get(&format!("/api/v1/orgs/{}/networktemplates", self.org_id), &[])
    }

    fn switch_stats(&self, site_id: &str) -> Result<Vec<SwitchStats>, ApiError> {
        let entries: Vec<serde_json::Value> = self.get(
            &format!("/api/v1/sites/{}/stats/devices", site_id),
            &[("type", "switch")],
        )?;
        Ok(parse_switch_stats(entries))
    }
}

fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
