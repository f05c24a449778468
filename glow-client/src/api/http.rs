//! HTTP implementation of the storefront backend interface

use crate::api::envelope::{normalize_item, normalize_list, normalize_map};
use crate::api::StorefrontApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use shared::{Promotion, VariantDisplay, WishlistEntry};
use std::collections::HashMap;

/// HTTP client for the storefront REST backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request with the bearer token attached, returning the raw body
    async fn send(&self, mut request: RequestBuilder) -> ClientResult<Value> {
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(Into::into)
    }

    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.send(self.client.get(self.url(path))).await
    }
}

#[async_trait]
impl StorefrontApi for HttpApi {
    async fn fetch_active_promotions(&self) -> ClientResult<HashMap<String, Promotion>> {
        let body = self.get("api/promotions/active").await?;
        Ok(normalize_map(&body))
    }

    async fn fetch_variant_display(&self, variant_id: i64) -> ClientResult<VariantDisplay> {
        let body = self.get(&format!("api/variants/{}", variant_id)).await?;
        normalize_item(&body).ok_or_else(|| {
            ClientError::InvalidResponse(format!("missing variant payload for {}", variant_id))
        })
    }

    async fn fetch_wishlist(&self, user_key: &str) -> ClientResult<Vec<WishlistEntry>> {
        let request = self
            .client
            .get(self.url("api/wishlist"))
            .query(&[("user", user_key)]);
        let body = self.send(request).await?;
        Ok(normalize_list(&body))
    }

    async fn add_wishlist_entry(&self, slug: &str) -> ClientResult<()> {
        let request = self
            .client
            .post(self.url("api/wishlist"))
            .json(&json!({ "slug": slug }));
        self.send(request).await.map(|_| ())
    }

    async fn remove_wishlist_entry(&self, slug: &str) -> ClientResult<()> {
        let request = self.client.delete(self.url(&format!("api/wishlist/{}", slug)));
        self.send(request).await.map(|_| ())
    }
}
