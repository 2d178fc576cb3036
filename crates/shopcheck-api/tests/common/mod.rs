//! In-process stand-in for the json-server backend.
//!
//! Serves `/products` from a fixed catalog and keeps `/cart` in memory, so the
//! contract tests can run without the external service.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use shopcheck_api::ApiClient;
use shopcheck_config::ApiSettings;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct MockServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiSettings {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        })
        .expect("failed to build client")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
struct Store {
    products: Arc<Value>,
    cart: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicU64>,
}

pub fn catalog() -> Value {
    json!([
        {"id": "1", "name": "Laptop", "price": 1200},
        {"id": "2", "name": "Phone", "price": 800},
        {"id": "3", "name": "Monitor", "price": 300}
    ])
}

/// Well-behaved backend serving `products`.
pub async fn spawn(products: Value) -> MockServer {
    let store = Store {
        products: Arc::new(products),
        cart: Arc::new(Mutex::new(Vec::new())),
        next_id: Arc::new(AtomicU64::new(1)),
    };

    let app = Router::new()
        .route("/products", get(list_products))
        .route("/cart", get(list_cart).post(add_to_cart))
        .with_state(store);

    serve(app).await
}

/// Backend with arbitrary routes, for contract violations.
pub async fn serve(app: Router) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let addr = listener.local_addr().expect("no local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server crashed");
    });

    MockServer {
        base_url: format!("http://{addr}"),
        handle,
    }
}

async fn list_products(State(store): State<Store>) -> Json<Value> {
    Json((*store.products).clone())
}

async fn list_cart(State(store): State<Store>) -> Json<Value> {
    let cart = store.cart.lock().unwrap().clone();
    Json(Value::Array(cart))
}

async fn add_to_cart(
    State(store): State<Store>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut item = body.as_object().cloned().unwrap_or_default();
    let id = store.next_id.fetch_add(1, Ordering::SeqCst);
    item.insert("id".to_string(), json!(format!("c{id}")));

    let item = Value::Object(item);
    store.cart.lock().unwrap().push(item.clone());
    (StatusCode::CREATED, Json(item))
}
