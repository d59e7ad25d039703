// src/integrations/ott/client.rs
//
// OTT Details API Integration (RapidAPI advanced search)
//
// ARCHITECTURE:
// - Blocking HTTP client, one request per ingestion run
// - Returns the raw movie objects so passthrough fields survive caching
// - Every transport or shape problem is an Upstream error
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never touches the document store

use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::domain::SearchQuery;
use crate::error::{AppError, AppResult};

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Source of movie search results
#[cfg_attr(test, mockall::automock)]
pub trait MovieSearchApi: Send + Sync {
    /// Run one advanced search and return the `results` entries verbatim
    fn advanced_search(&self, query: &SearchQuery) -> AppResult<Vec<Value>>;
}

/// OTT Details API Client
pub struct OttDetailsClient {
    endpoint: String,
    api_key: String,
    api_host: String,
    http_client: Client,
}

impl OttDetailsClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        // No request timeout: a run either completes or fails on the transport
        let http_client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| AppError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
            http_client,
        })
    }
}

impl MovieSearchApi for OttDetailsClient {
    fn advanced_search(&self, query: &SearchQuery) -> AppResult<Vec<Value>> {
        debug!("GET {} {:?}", self.endpoint, query);

        let response = self
            .http_client
            .get(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_HOST_HEADER, &self.api_host)
            .query(&query.to_query_pairs())
            .send()
            .map_err(|e| AppError::Upstream(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Search API returned status: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| AppError::Upstream(format!("Failed to parse search response: {}", e)))?;

        extract_results(body)
    }
}

/// Pull the `results` array out of a search response body
pub fn extract_results(body: Value) -> AppResult<Vec<Value>> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::Upstream(
            "Search response is not a JSON object".to_string(),
        ));
    };

    let results = match fields.remove("results") {
        Some(Value::Array(results)) => results,
        Some(other) => {
            return Err(AppError::Upstream(format!(
                "Search response 'results' is not an array: {}",
                other
            )))
        }
        None => {
            return Err(AppError::Upstream(
                "Search response has no 'results' field".to_string(),
            ))
        }
    };

    if let Some(position) = results.iter().position(|r| !r.is_object()) {
        return Err(AppError::Upstream(format!(
            "Search result {} is not a JSON object",
            position
        )));
    }

    Ok(results)
}
