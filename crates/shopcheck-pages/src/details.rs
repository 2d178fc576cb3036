//! A single product's page, reached from a home card.

use async_trait::async_trait;
use shopcheck_browser::{BoundingBox, Dialog};
use tracing::debug;

use crate::base::{BasePage, PageObject};
use crate::error::{PageError, Result};
use crate::price::has_currency_marker;

pub mod selectors {
    pub const PRODUCT_NAME: &str = ".name";
    pub const PRODUCT_PRICE: &str = "h3";
    pub const PRODUCT_DESCRIPTION: &str = ".description";
    pub const ADD_TO_CART_BUTTON: &str = ".btn-success";
    pub const PRODUCT_IMAGE: &str = "img[src*='imgs']";
    pub const BACK_BUTTON: &str = "button[onclick='history.back()']";
    pub const CART_LINK: &str = "#cartur";
}

use selectors::*;

/// Message of the alert the storefront raises after adding to the cart.
pub const PRODUCT_ADDED: &str = "Product added";

#[derive(Debug, Clone)]
pub struct ProductDetailsPage<'p> {
    base: BasePage<'p>,
}

impl<'p> ProductDetailsPage<'p> {
    pub fn new(base: BasePage<'p>) -> Self {
        Self { base }
    }

    pub async fn product_name(&self) -> Result<String> {
        self.base.get_trimmed_text(PRODUCT_NAME).await
    }

    /// As rendered, e.g. `$360 *includes tax`.
    pub async fn product_price(&self) -> Result<String> {
        self.base.get_trimmed_text(PRODUCT_PRICE).await
    }

    pub async fn product_description(&self) -> Result<String> {
        self.base.get_trimmed_text(PRODUCT_DESCRIPTION).await
    }

    pub async fn product_image_box(&self) -> Result<BoundingBox> {
        Ok(self.base.page().bounding_box(PRODUCT_IMAGE).await?)
    }

    pub async fn add_to_cart_button_text(&self) -> Result<String> {
        self.base.get_trimmed_text(ADD_TO_CART_BUTTON).await
    }

    pub async fn is_add_to_cart_button_enabled(&self) -> Result<bool> {
        self.base.is_enabled(ADD_TO_CART_BUTTON).await
    }

    pub async fn is_add_to_cart_button_visible(&self) -> Result<bool> {
        self.base.is_visible(ADD_TO_CART_BUTTON).await
    }

    /// The name is filled in by a script after load; wait for it.
    pub async fn wait_for_product(&self) -> Result<()> {
        let timeout = self.base.timeouts().element;
        self.base.page().wait_for_text(PRODUCT_NAME, timeout).await?;
        Ok(())
    }

    pub async fn validate_product_details(&self) -> Result<()> {
        let fail = |reason: &str| Err(PageError::validation(Self::NAME, reason));

        if self.product_name().await?.is_empty() {
            return fail("product name is empty");
        }

        let price = self.product_price().await?;
        if price.is_empty() {
            return fail("product price is empty");
        }
        if !has_currency_marker(&price) {
            return fail("product price doesn't contain $");
        }

        if self.product_description().await?.is_empty() {
            return fail("product description is empty");
        }

        if !self.base.is_visible(PRODUCT_IMAGE).await? {
            return fail("product image is not visible");
        }

        if !self.is_add_to_cart_button_visible().await? {
            return fail("add to cart button is not visible");
        }
        if !self.is_add_to_cart_button_enabled().await? {
            return fail("add to cart button is not enabled");
        }

        Ok(())
    }

    pub async fn click_add_to_cart(&self) -> Result<()> {
        self.base.click_element(ADD_TO_CART_BUTTON).await
    }

    /// Adds the product and returns the confirmation dialog, which must
    /// contain `expected`.
    pub async fn add_to_cart_with_confirmation(&self, expected: &str) -> Result<Dialog> {
        let page = self.base.page();
        let timeouts = self.base.timeouts();

        let confirmation = page.expect_dialog()?;
        self.click_add_to_cart().await?;
        let dialog = confirmation.wait(timeouts.element).await?;

        if !dialog.message_contains(expected) {
            return Err(PageError::UnexpectedDialog {
                expected: expected.to_string(),
                actual: dialog.message,
            });
        }
        debug!(message = %dialog.message, "add to cart confirmed");

        page.pause(timeouts.dialog_settle).await;
        Ok(dialog)
    }

    /// Returns to the previous page, by the back button when the page has one.
    pub async fn click_back(&self) -> Result<()> {
        if self.base.is_visible(BACK_BUTTON).await? {
            return self.base.click_and_settle(BACK_BUTTON).await;
        }

        let page = self.base.page();
        let before = page.url().await?;
        page.go_back().await?;
        self.base.settle_from(&before).await
    }

    pub async fn click_cart(&self) -> Result<()> {
        self.base.click_and_settle(CART_LINK).await
    }
}

#[async_trait]
impl<'p> PageObject for ProductDetailsPage<'p> {
    const NAME: &'static str = "product details";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    async fn is_page_loaded(&self) -> bool {
        self.base.is_visible(PRODUCT_NAME).await.unwrap_or(false)
    }
}
