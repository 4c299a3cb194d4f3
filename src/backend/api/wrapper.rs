#![cfg_attr(test, allow(dead_code))]

use reqwest::blocking::{Client, Response};

use super::helpers::{ApiZone, RrsetChangeset, SearchHit};
use crate::backend::BackendError;

const API_KEY_HEADER: &str = "X-API-Key";
const SEARCH_MAX_RESULTS: u32 = 100;

/// Thin wrapper around the PowerDNS HTTP API (api/v1). One method per
/// endpoint, no interpretation of the payloads beyond deserialization.
pub struct PdnsApi {
    client: Client,
    base_url: String,
    api_key: String,
    server_id: String,
}

impl PdnsApi {
    pub fn try_new(api_url: &str, api_key: &str, server_id: &str) -> Result<PdnsApi, BackendError> {
        let client = Client::builder().build()?;
        Ok(PdnsApi {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            server_id: server_id.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/servers/{}{}",
            self.base_url, self.server_id, path
        )
    }

    // Convert non-success statuses into Api errors, with the response body
    // for context (PowerDNS puts its error message there)
    fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(BackendError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            })
        }
    }

    pub fn list_zones(&self) -> Result<Vec<ApiZone>, BackendError> {
        let response = self
            .client
            .get(self.url("/zones"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    pub fn search_records(&self, query: &str) -> Result<Vec<SearchHit>, BackendError> {
        let max = SEARCH_MAX_RESULTS.to_string();
        let response = self
            .client
            .get(self.url("/search-data"))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("q", query),
                ("object_type", "record"),
                ("max", max.as_str()),
            ])
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    pub fn patch_rrsets(
        &self,
        zone_id: &str,
        change: &RrsetChangeset,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .patch(self.url(&format!("/zones/{}", zone_id)))
            .header(API_KEY_HEADER, &self.api_key)
            .json(change)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    pub fn rectify(&self, zone_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .put(self.url(&format!("/zones/{}/rectify", zone_id)))
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

#[cfg(test)]
use mockall::mock;

#[cfg(test)]
mock! {
    pub PdnsApi {
        pub fn try_new(api_url: &str, api_key: &str, server_id: &str) -> Result<Self, BackendError>;
        pub fn list_zones(&self) -> Result<Vec<ApiZone>, BackendError>;
        pub fn search_records(&self, query: &str) -> Result<Vec<SearchHit>, BackendError>;
        pub fn patch_rrsets(&self, zone_id: &str, change: &RrsetChangeset) -> Result<(), BackendError>;
        pub fn rectify(&self, zone_id: &str) -> Result<(), BackendError>;
    }
}
