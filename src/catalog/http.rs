//! Catalog session over a JSON gateway.
//!
//! The gateway exposes the provider's library and playlist reads as plain
//! JSON documents:
//!
//! - `GET {base_url}/library/playlists?limit=N` returns a list of summaries
//! - `GET {base_url}/playlists/{id}[?limit=N]` returns a playlist record
//!   with its `tracks`
//!
//! Credentials come from an OAuth token file that is read once, when the
//! adapter first connects.

use std::{fs, path::Path, time::Duration};

use reqwest::{
    blocking::Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    catalog::{CatalogService, SessionFactory, error::CatalogError, error::Result},
    config::CatalogConfig,
};

#[derive(Debug, Deserialize)]
struct OAuthToken {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn load_token(path: &Path) -> Result<OAuthToken> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CatalogError::Session(format!(
            "cannot read token file {}: {e}",
            path.to_string_lossy()
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        CatalogError::Session(format!(
            "invalid token file {}: {e}",
            path.to_string_lossy()
        ))
    })
}

pub struct HttpCatalogFactory {
    config: CatalogConfig,
}

impl HttpCatalogFactory {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for HttpCatalogFactory {
    type Session = HttpCatalog;

    fn connect(&self) -> Result<HttpCatalog> {
        let mut headers = HeaderMap::new();
        if let Some(path) = &self.config.token_file {
            let token = load_token(path)?;
            let value = HeaderValue::from_str(&format!(
                "{} {}",
                token.token_type, token.access_token
            ))
            .map_err(|e| CatalogError::Session(format!("unusable access token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        Ok(HttpCatalog {
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

pub struct HttpCatalog {
    base_url: String,
    client: Client,
}

impl HttpCatalog {
    fn request(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url} {query:?}");

        let response = self.client.get(&url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json()?)
    }
}

impl CatalogService for HttpCatalog {
    fn list_library_playlists(&self, limit: u32) -> Result<Vec<Value>> {
        match self.request("/library/playlists", &[("limit", limit.to_string())])? {
            Value::Array(items) => Ok(items),
            Value::Object(mut body) => match body.remove("items") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(CatalogError::Malformed(
                    "library listing has no item list".to_string(),
                )),
            },
            _ => Err(CatalogError::Malformed(
                "library listing is not a list".to_string(),
            )),
        }
    }

    fn get_playlist(&self, playlist_id: &str, limit: Option<u32>) -> Result<Value> {
        let query = limit
            .map(|limit| vec![("limit", limit.to_string())])
            .unwrap_or_default();
        self.request(&format!("/playlists/{playlist_id}"), &query)
    }
}
