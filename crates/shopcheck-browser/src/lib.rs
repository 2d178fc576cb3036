//! # shopcheck-browser
//!
//! Headless Chrome primitives for page-object tests, built on chromiumoxide.
//!
//! ## Architecture
//!
//! - **TestBrowser**: launches Chrome and owns the process
//! - **Page**: a tab with navigation, element reads, clicks and waits
//! - **ElementQuery**: addresses "child X of the Nth match of Y"
//! - **Dialog capture**: every page accepts native dialogs and reports them
//!   through [`Page::expect_dialog`]
//! - **NavigationWait**: DOM-content wait with a full-load fallback
//! - **Site**: joins paths onto the base URL under test
//!
//! ## Example Usage
//!
//! ```ignore
//! use shopcheck_browser::{NavigationWait, TestBrowser, TestBrowserConfig};
//!
//! #[tokio::test]
//! async fn add_to_cart_confirms() -> Result<(), Box<dyn std::error::Error>> {
//!     let browser = TestBrowser::launch(TestBrowserConfig::default()).await?;
//!     let page = browser.new_page().await?;
//!
//!     page.navigate("https://www.demoblaze.com/prod.html?idp_=1", NavigationWait::default())
//!         .await?;
//!     page.wait_for_text(".name", Duration::from_secs(10)).await?;
//!
//!     let confirmation = page.expect_dialog()?;
//!     page.click(".btn-success").await?;
//!     let dialog = confirmation.wait(Duration::from_secs(5)).await?;
//!     assert!(dialog.message.contains("Product added"));
//!
//!     page.close().await?;
//!     browser.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Unit tests run with `cargo test`; tests that launch Chrome are
//! `#[ignore]` and run with `cargo test -- --ignored`.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod dialog;
pub mod error;
pub mod page;
pub mod query;
pub mod site;
pub mod wait;

pub use browser::{TestBrowser, TestBrowserConfig};
pub use dialog::{Dialog, DialogExpectation, DialogKind};
pub use error::{BrowserError, Result};
pub use page::{BoundingBox, Page};
pub use query::ElementQuery;
pub use site::Site;
pub use wait::{
    LoadState, NavigationWait, WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
};
