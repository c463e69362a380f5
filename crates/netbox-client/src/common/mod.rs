//! Common utilities for NetBox API client
//!
//! Provides shared functionality used across all API modules.

pub mod query;

use crate::error::NetBoxError;
use query::QueryFilter;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Paginated response wrapper from NetBox API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// A single page holding every result
    pub fn single_page(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

/// HTTP client wrapper with authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Map a non-success response to the matching error variant
    pub async fn error_for_status(method: &str, path: &str, response: Response) -> NetBoxError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => {
                NetBoxError::NotFound(format!("{} {} - {}", method, path, body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NetBoxError::Authentication(
                format!("{} {} failed: {} - {}", method, path, status, body),
            ),
            StatusCode::BAD_REQUEST => NetBoxError::InvalidRequest(format!(
                "{} {} rejected: {}",
                method, path, body
            )),
            _ => NetBoxError::Api(format!("{} {} failed: {} - {}", method, path, status, body)),
        }
    }

    /// Fetch all pages of a paginated response
    pub async fn fetch_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        mut url: String,
    ) -> Result<Vec<T>, NetBoxError> {
        let mut all_results = Vec::new();

        loop {
            let page: PaginatedResponse<T> = self.get(&url).await?;
            all_results.extend(page.results);

            match page.next {
                Some(next_url) => {
                    url = self.build_url(&next_url);
                }
                None => break,
            }
        }

        Ok(all_results)
    }

    /// Fetch the first page of a list endpoint
    pub async fn list<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        filter: &dyn QueryFilter,
    ) -> Result<PaginatedResponse<T>, NetBoxError> {
        self.get(&list_path(endpoint, filter)).await
    }

    /// Fetch every page of a list endpoint
    pub async fn list_all<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        filter: &dyn QueryFilter,
    ) -> Result<Vec<T>, NetBoxError> {
        self.fetch_all_pages(self.build_url(&list_path(endpoint, filter))).await
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, NetBoxError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(NetBoxError::Http)?;

        if !response.status().is_success() {
            return Err(Self::error_for_status("GET", path, response).await);
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            NetBoxError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Send a JSON body and return the raw response, whatever its status
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<Response, NetBoxError> {
        let url = self.build_url(path);
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("{} {} with body: {}", method, url, serde_json::to_string(body)?);
        }

        self.client
            .request(method, &url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(NetBoxError::Http)
    }

    /// Make a POST request
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NetBoxError> {
        let response = self.send_json(reqwest::Method::POST, path, body).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status("POST", path, response).await);
        }
        response.json().await.map_err(NetBoxError::Http)
    }

    /// Make a PATCH request
    pub async fn patch<T: for<'de> Deserialize<'de>, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NetBoxError> {
        let response = self.send_json(reqwest::Method::PATCH, path, body).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status("PATCH", path, response).await);
        }
        response.json().await.map_err(NetBoxError::Http)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), NetBoxError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self.client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(NetBoxError::Http)?;

        if !response.status().is_success() {
            return Err(Self::error_for_status("DELETE", path, response).await);
        }

        Ok(())
    }
}

fn list_path(endpoint: &str, filter: &dyn QueryFilter) -> String {
    let query = filter.query_string();
    if query.is_empty() {
        format!("/api/{}/", endpoint)
    } else {
        format!("/api/{}/?{}", endpoint, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::query::{PrefixFilter, SlugFilter};

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let http = HttpClient::new(Client::new(), "http://netbox:80/".to_string(), "t".to_string());
        assert_eq!(http.base_url(), "http://netbox:80");
        assert_eq!(http.build_url("/api/status/"), "http://netbox:80/api/status/");
        assert_eq!(
            http.build_url("http://other/api/ipam/prefixes/?offset=50"),
            "http://other/api/ipam/prefixes/?offset=50"
        );
        assert_eq!(http.auth_header(), "Token t");
    }

    #[test]
    fn test_list_path_appends_query_only_when_filtered() {
        assert_eq!(list_path("ipam/prefixes", &PrefixFilter::default()), "/api/ipam/prefixes/");
        assert_eq!(
            list_path("dcim/sites", &SlugFilter::new("dc-1")),
            "/api/dcim/sites/?slug=dc-1"
        );
    }
}
