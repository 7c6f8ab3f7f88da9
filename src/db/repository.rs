//! PostgREST repository for the catches table.
//!
//! One HTTP client is built at startup and shared by every request. Mutating
//! calls ask the store to echo the affected rows so the caller can tell a
//! matched row from a miss.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::{CatchStore, StoreError};
use crate::config::StoreConfig;
use crate::models::{Catch, CatchRecord};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Store client for the remote catches table.
#[derive(Clone)]
pub struct Repository {
    client: Client,
    table_url: Url,
}

impl Repository {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let table_url = Url::parse(&format!("{}/rest/v1/{}", config.url, config.table))
            .map_err(|e| StoreError::Configuration(format!("store URL: {}", e)))?;

        let key = config.key.expose_secret();
        let mut apikey = HeaderValue::from_str(key)
            .map_err(|_| StoreError::Configuration("store key is not a valid header".to_string()))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|_| StoreError::Configuration("store key is not a valid header".to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, table_url })
    }

    /// Endpoint this repository reads and writes.
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// Cheapest possible round trip: fetch at most one id.
    pub async fn probe(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .get(self.table_url.clone())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(rejection(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl CatchStore for Repository {
    async fn insert(&self, record: &CatchRecord) -> Result<Vec<Catch>, StoreError> {
        let response = self
            .client
            .post(self.table_url.clone())
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&[record])
            .send()
            .await?;

        read_rows(response).await
    }

    async fn list(&self) -> Result<Vec<Catch>, StoreError> {
        let response = self
            .client
            .get(self.table_url.clone())
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;

        read_rows(response).await
    }

    async fn update(&self, id: i64, changes: &CatchRecord) -> Result<Vec<Catch>, StoreError> {
        let response = self
            .client
            .patch(self.table_url.clone())
            .query(&[("id", format!("eq.{}", id))])
            .header(PREFER, RETURN_REPRESENTATION)
            .json(changes)
            .send()
            .await?;

        read_rows(response).await
    }

    async fn delete(&self, id: i64) -> Result<Vec<Catch>, StoreError> {
        let response = self
            .client
            .delete(self.table_url.clone())
            .query(&[("id", format!("eq.{}", id))])
            .header(PREFER, RETURN_REPRESENTATION)
            .send()
            .await?;

        read_rows(response).await
    }
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

async fn read_rows(response: Response) -> Result<Vec<Catch>, StoreError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(rejection(status, &body));
    }

    // 204 No Content
    if body.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn rejection(status: StatusCode, body: &[u8]) -> StoreError {
    let (code, message) = match serde_json::from_slice::<PostgrestError>(body) {
        Ok(err) => {
            let message = match (err.message, err.details) {
                (Some(message), Some(details)) => format!("{} ({})", message, details),
                (Some(message), None) => message,
                (None, _) => status.to_string(),
            };
            (err.code, message)
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                (None, status.to_string())
            } else {
                (None, format!("{}: {}", status, text))
            }
        }
    };

    StoreError::Rejected {
        status: status.as_u16(),
        code,
        message,
    }
}
