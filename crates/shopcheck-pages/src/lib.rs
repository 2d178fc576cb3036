//! Page objects for the demoblaze storefront.
//!
//! Each page object wraps a [`BasePage`] with its own selector table:
//!
//! - [`HomePage`]: the product grid, card details and navigation out of it
//! - [`ProductDetailsPage`]: product fields and add-to-cart with its alert
//! - [`CartPage`]: rows, totals and deletion
//!
//! [`UiSession`] is the per-test fixture that launches and tears down the
//! browser around a test body.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod base;
pub mod cart;
pub mod details;
pub mod error;
pub mod home;
pub mod price;
pub mod session;

pub use base::{BasePage, PageObject, Timeouts};
pub use cart::{CartPage, CartRow};
pub use details::{ProductDetailsPage, PRODUCT_ADDED};
pub use error::{PageError, Result};
pub use home::{HomePage, ProductCard};
pub use price::{has_currency_marker, normalize_price, parse_price};
pub use session::{Session, UiSession};
