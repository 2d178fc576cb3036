//! Local storefront with demoblaze's markup.
//!
//! Serves a home grid, product pages whose fields are filled in by script,
//! and a cart that loads its rows from a JSON endpoint. Cart state lives in
//! the server, one server per test.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shopcheck_config::logger::init_test_logger;
use shopcheck_config::{Settings, UiSettings};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Serialize)]
pub struct FixtureProduct {
    pub id: u64,
    pub name: &'static str,
    pub price: u64,
    pub description: &'static str,
    pub image: &'static str,
}

pub fn products() -> Vec<FixtureProduct> {
    vec![
        FixtureProduct {
            id: 1,
            name: "Samsung galaxy s6",
            price: 360,
            description: "The Samsung Galaxy S6 is powered by 1.5GHz octa-core processor.",
            image: "imgs/galaxy_s6.svg",
        },
        FixtureProduct {
            id: 2,
            name: "Nokia lumia 1520",
            price: 820,
            description: "The Nokia Lumia 1520 is powered by 2.2GHz quad-core processor.",
            image: "imgs/lumia_1520.svg",
        },
        FixtureProduct {
            id: 3,
            name: "Sony vaio i5",
            price: 790,
            description: "Sony is so confident that the VAIO S is a superior ultraportable laptop.",
            image: "imgs/sony_vaio_5.svg",
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
struct CartLine {
    id: String,
    title: String,
    price: u64,
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    prod_id: u64,
}

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    id: String,
}

#[derive(Clone)]
struct Store {
    products: Arc<Vec<FixtureProduct>>,
    cart: Arc<Mutex<Vec<CartLine>>>,
    next_id: Arc<AtomicU64>,
}

pub struct Storefront {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Storefront {
    /// UI settings pointed at this storefront, with short waits.
    pub fn settings(&self) -> UiSettings {
        UiSettings {
            base_url: self.base_url.clone(),
            default_timeout_ms: 5_000,
            navigation_timeout_ms: 5_000,
            fallback_timeout_ms: 2_000,
            dialog_settle_ms: 200,
            ..UiSettings::default()
        }
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_storefront() -> Storefront {
    init_test_logger();

    let store = Store {
        products: Arc::new(products()),
        cart: Arc::new(Mutex::new(Vec::new())),
        next_id: Arc::new(AtomicU64::new(1)),
    };

    let app = Router::new()
        .route("/", get(home))
        .route("/index.html", get(home))
        .route("/prod.html", get(|| async { Html(PRODUCT_PAGE) }))
        .route("/cart.html", get(|| async { Html(CART_PAGE) }))
        .route("/imgs/{file}", get(image))
        .route("/api/products/{id}", get(product))
        .route("/api/cart", get(list_cart).post(add_to_cart))
        .route("/api/cart/delete", post(delete_from_cart))
        .with_state(store);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind storefront");
    let addr = listener.local_addr().expect("no local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("storefront failed");
    });

    Storefront {
        base_url: format!("http://{addr}"),
        handle,
    }
}

/// Settings for the live demoblaze site, honoring `shopcheck.toml` and env.
pub fn demoblaze_settings() -> UiSettings {
    init_test_logger();
    Settings::load().expect("failed to load settings").ui
}

async fn home(State(store): State<Store>) -> Html<String> {
    let cards: String = store.products.iter().map(card_html).collect();
    Html(HOME_PAGE.replace("<!-- cards -->", &cards))
}

fn card_html(product: &FixtureProduct) -> String {
    format!(
        r#"
        <div class="col-lg-4 col-md-6 mb-4">
          <div class="card h-100">
            <a href="prod.html?idp_={id}"><img class="card-img-top img-fluid" src="{image}" style="display: block; width: 200px; height: 150px"></a>
            <div class="card-block">
              <h4 class="card-title"><a href="prod.html?idp_={id}" class="hrefch">{name}</a></h4>
              <h5>${price}</h5>
              <p class="card-text">{description}</p>
            </div>
          </div>
        </div>"#,
        id = product.id,
        image = product.image,
        name = product.name,
        price = product.price,
        description = product.description,
    )
}

async fn image(Path(_file): Path<String>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="150"><rect width="200" height="150" fill="#ccc"/></svg>"##,
    )
}

async fn product(
    State(store): State<Store>,
    Path(id): Path<u64>,
) -> Result<Json<FixtureProduct>, StatusCode> {
    store
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_cart(State(store): State<Store>) -> Json<Vec<CartLine>> {
    Json(store.cart.lock().unwrap().clone())
}

async fn add_to_cart(
    State(store): State<Store>,
    Json(request): Json<AddRequest>,
) -> Result<StatusCode, StatusCode> {
    let product = store
        .products
        .iter()
        .find(|p| p.id == request.prod_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    let id = store.next_id.fetch_add(1, Ordering::SeqCst);
    store.cart.lock().unwrap().push(CartLine {
        id: format!("line-{id}"),
        title: product.name.to_string(),
        price: product.price,
    });
    Ok(StatusCode::OK)
}

async fn delete_from_cart(
    State(store): State<Store>,
    Json(request): Json<DeleteRequest>,
) -> StatusCode {
    store.cart.lock().unwrap().retain(|line| line.id != request.id);
    StatusCode::OK
}

pub fn product_path(id: u64) -> String {
    format!("/prod.html?idp_={id}")
}

const HOME_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>STORE</title></head>
<body>
  <nav class="navbar">
    <a class="navbar-brand" href="index.html">PRODUCT STORE</a>
    <a class="nav-link" href="cart.html" id="cartur">Cart</a>
  </nav>
  <div class="row" id="tbodyid">
    <!-- cards -->
  </div>
</body>
</html>"##;

const PRODUCT_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>STORE</title></head>
<body>
  <nav class="navbar">
    <a class="navbar-brand" href="index.html">PRODUCT STORE</a>
    <a class="nav-link" href="cart.html" id="cartur">Cart</a>
  </nav>
  <div id="tbodyid">
    <div class="item active"><img id="image" width="400" height="300"></div>
    <h2 class="name"></h2>
    <h3 class="price-container"></h3>
    <div id="more-information"><p class="description"></p></div>
    <a href="#" class="btn btn-success btn-lg" id="add">Add to cart</a>
    <button type="button" onclick='history.back()'>Back</button>
  </div>
  <script>
    const id = Number(new URLSearchParams(location.search).get('idp_'));
    setTimeout(async () => {
      const product = await (await fetch('/api/products/' + id)).json();
      document.getElementById('image').setAttribute('src', product.image);
      document.querySelector('.name').textContent = product.name;
      document.querySelector('.price-container').innerHTML =
        '$' + product.price + ' <small>*includes tax</small>';
      document.querySelector('.description').textContent = product.description;
    }, 150);

    document.getElementById('add').addEventListener('click', async (event) => {
      event.preventDefault();
      await fetch('/api/cart', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ prod_id: id }),
      });
      alert('Product added.');
    });
  </script>
</body>
</html>"##;

const CART_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>STORE</title></head>
<body>
  <nav class="navbar">
    <a class="navbar-brand" href="index.html">PRODUCT STORE</a>
    <a class="nav-link" href="cart.html" id="cartur">Cart</a>
  </nav>
  <h2 class="text-center">Products</h2>
  <table class="table">
    <thead><tr><th>Pic</th><th>Title</th><th>Price</th><th>x</th></tr></thead>
    <tbody id="tbodyid"></tbody>
  </table>
  <h2>Total</h2>
  <h3 id="totalp"></h3>
  <button type="button" class="btn btn-success">Place Order</button>
  <script>
    async function loadCart() {
      const lines = await (await fetch('/api/cart')).json();
      const body = document.getElementById('tbodyid');
      body.innerHTML = '';
      let total = 0;
      for (const line of lines) {
        const row = document.createElement('tr');
        row.className = 'success';
        row.innerHTML = '<td><img width="100" height="100"></td><td></td><td></td>' +
          '<td><a href="#">Delete</a></td>';
        row.children[1].textContent = line.title;
        row.children[2].textContent = String(line.price);
        row.querySelector('a').addEventListener('click', (event) => {
          event.preventDefault();
          deleteItem(line.id);
        });
        body.appendChild(row);
        total += line.price;
      }
      document.getElementById('totalp').textContent = lines.length ? String(total) : '';
    }

    async function deleteItem(id) {
      await fetch('/api/cart/delete', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ id }),
      });
      await loadCart();
    }

    setTimeout(loadCart, 150);
  </script>
</body>
</html>"##;
