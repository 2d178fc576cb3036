//! # shopcheck-api
//!
//! Contract-test helpers for the product/cart JSON service:
//!
//! - **dto**: request/response shapes and the functions that validate raw JSON
//!   into them, failing with [`SchemaValidationError`] on any shape mismatch
//! - **client**: [`ApiClient`], one HTTP call per operation with an exact
//!   expected status and no retries
//! - **endpoints**: URL composition against the configured base
//!
//! ```ignore
//! use shopcheck_api::{AddToCartRequest, ApiClient};
//! use shopcheck_config::Settings;
//!
//! let settings = Settings::load()?;
//! let client = ApiClient::new(&settings.api)?;
//!
//! let products = client.list_products().await?;
//! let created = client.add_to_cart(&AddToCartRequest::new(2, 1)).await?;
//! assert_eq!(created.product_id, 2);
//! ```

pub mod client;
pub mod dto;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use dto::{
    build_add_to_cart_request, parse_cart_item, parse_cart_items, parse_product, parse_products,
    AddToCartRequest, CartItem, Product,
};
pub use error::{ApiError, Result, SchemaValidationError};
