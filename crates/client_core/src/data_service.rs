//! The boundary between page view-models and wherever club data lives.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Bod, BodId, Club},
    error::{ApiError, ApiException},
    protocol::{bod_route, BodUpdate, NewBod, BODS_ROUTE, CLUBS_ROUTE},
};
use url::Url;

#[async_trait]
pub trait ClubDataService: Send + Sync {
    async fn list_bods(&self) -> Result<Vec<Bod>>;
    async fn create_bod(&self, bod: NewBod) -> Result<Bod>;
    async fn update_bod(&self, bod_id: BodId, update: BodUpdate) -> Result<Bod>;
    async fn list_clubs(&self) -> Result<Vec<Club>>;
}

/// JSON-over-HTTP client for the club server.
#[derive(Clone)]
pub struct HttpDataService {
    http: Client,
    base_url: Url,
}

impl HttpDataService {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("server url '{server_url}' cannot be used as a base"));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health_check(&self) -> Result<()> {
        self.http
            .get(self.endpoint("/healthz")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .with_context(|| format!("failed to build url for route '{route}'"))
    }
}

#[async_trait]
impl ClubDataService for HttpDataService {
    async fn list_bods(&self) -> Result<Vec<Bod>> {
        let response = self.http.get(self.endpoint(BODS_ROUTE)?).send().await?;
        decode(response).await
    }

    async fn create_bod(&self, bod: NewBod) -> Result<Bod> {
        let response = self
            .http
            .post(self.endpoint(BODS_ROUTE)?)
            .json(&bod)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_bod(&self, bod_id: BodId, update: BodUpdate) -> Result<Bod> {
        let response = self
            .http
            .patch(self.endpoint(&bod_route(bod_id))?)
            .json(&update)
            .send()
            .await?;
        decode(response).await
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let response = self.http.get(self.endpoint(CLUBS_ROUTE)?).send().await?;
        decode(response).await
    }
}

/// Parses a success body as `T`; otherwise surfaces the server's `ApiError`
/// as an [`ApiException`] so callers can downcast it.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .context("failed to decode server response");
    }

    let body = response.bytes().await.unwrap_or_default();
    match serde_json::from_slice::<ApiError>(&body) {
        Ok(api_error) => Err(ApiException::from(api_error))
            .with_context(|| format!("server rejected request with status {status}")),
        Err(_) => Err(anyhow!("server returned status {status}")),
    }
}

#[cfg(test)]
#[path = "tests/data_service_tests.rs"]
mod tests;
