//! Request and response shapes for the product/cart service.
//!
//! Parsing is strict: a missing field or a field of the wrong JSON type is a
//! [`SchemaValidationError`]. Domain checks (positive price, non-empty name)
//! are left to the tests that assert them; the service is the authority on
//! what values are valid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, SchemaValidationError};

/// A catalog entry as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
}

/// A cart line created by `POST /cart` and listed by `GET /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: i64,
}

impl AddToCartRequest {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Serialized JSON body.
    pub fn to_body(&self) -> Result<Vec<u8>, ApiError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// True when `item` is the cart line this request should have produced.
    pub fn matches(&self, item: &CartItem) -> bool {
        item.product_id == self.product_id && item.quantity == self.quantity
    }
}

/// Build the `POST /cart` body. Any integers are accepted.
pub fn build_add_to_cart_request(product_id: i64, quantity: i64) -> Result<Vec<u8>, ApiError> {
    AddToCartRequest::new(product_id, quantity).to_body()
}

pub fn parse_product(json: &Value) -> Result<Product, SchemaValidationError> {
    parse_one("product", json)
}

pub fn parse_products(json: &Value) -> Result<Vec<Product>, SchemaValidationError> {
    parse_list("product list", "product", json)
}

pub fn parse_cart_item(json: &Value) -> Result<CartItem, SchemaValidationError> {
    parse_one("cart item", json)
}

pub fn parse_cart_items(json: &Value) -> Result<Vec<CartItem>, SchemaValidationError> {
    parse_list("cart item list", "cart item", json)
}

fn parse_one<T>(entity: &'static str, json: &Value) -> Result<T, SchemaValidationError>
where
    T: serde::de::DeserializeOwned,
{
    if !json.is_object() {
        return Err(SchemaValidationError::shape(
            entity,
            format!("expected a JSON object, got {}", kind_of(json)),
        ));
    }
    T::deserialize(json).map_err(|e| SchemaValidationError::from_serde(entity, e))
}

fn parse_list<T>(
    list_entity: &'static str,
    item_entity: &'static str,
    json: &Value,
) -> Result<Vec<T>, SchemaValidationError>
where
    T: serde::de::DeserializeOwned,
{
    let items = json.as_array().ok_or_else(|| {
        SchemaValidationError::shape(
            list_entity,
            format!("expected a JSON array, got {}", kind_of(json)),
        )
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_one(item_entity, item).map_err(|e| e.at(i)))
        .collect()
}

fn kind_of(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
