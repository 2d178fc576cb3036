//! HTTP helpers for the product/cart endpoints.
//!
//! Each method issues exactly one request, checks the status code the
//! endpoint is contracted to return, and parses the body into DTOs.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use shopcheck_config::ApiSettings;
use tracing::debug;

use crate::dto::{self, AddToCartRequest, CartItem, Product};
use crate::endpoints;
use crate::error::{ApiError, Result, SchemaValidationError};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against `settings.base_url` with the configured timeout.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /products`, expecting 200.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let body = self
            .send(Method::GET, endpoints::PRODUCTS, None, StatusCode::OK)
            .await?;
        Ok(dto::parse_products(&body)?)
    }

    /// `POST /cart`, expecting 201 and the created line.
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<CartItem> {
        let payload = request.to_body()?;
        let body = self
            .send(Method::POST, endpoints::CART, Some(payload), StatusCode::CREATED)
            .await?;
        Ok(dto::parse_cart_item(&body)?)
    }

    /// `GET /cart`, expecting 200. An empty cart is an empty list.
    pub async fn list_cart(&self) -> Result<Vec<CartItem>> {
        let body = self
            .send(Method::GET, endpoints::CART, None, StatusCode::OK)
            .await?;
        Ok(dto::parse_cart_items(&body)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<Vec<u8>>,
        expected: StatusCode,
    ) -> Result<Value> {
        let url = endpoints::url(&self.base_url, Some(path));

        let mut request = self.http.request(method.clone(), &url);
        if let Some(payload) = payload {
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "api request");

        let text = response.text().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;

        if status != expected {
            return Err(ApiError::UnexpectedStatus {
                method,
                url,
                expected,
                actual: status,
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::Schema(SchemaValidationError::from_serde("response body", e))
        })
    }
}
