//! The storefront's landing page: the product grid and the navbar.

use async_trait::async_trait;
use shopcheck_browser::{BoundingBox, ElementQuery};
use tracing::warn;

use crate::base::{BasePage, PageObject};
use crate::error::{PageError, Result};
use crate::price::has_currency_marker;

pub mod selectors {
    pub const PRODUCT_CARDS: &str = ".col-lg-4.col-md-6.mb-4";
    pub const PRODUCT_NAME: &str = ".card-title";
    pub const PRODUCT_PRICE: &str = "h5";
    pub const PRODUCT_IMAGE: &str = ".card-img-top";
    pub const PRODUCT_LINK: &str = ".hrefch";
    pub const CART_LINK: &str = "#cartur";
    pub const NAVBAR_BRAND: &str = ".navbar-brand";
}

use selectors::*;

/// One product card as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub image_visible: bool,
    pub link_visible: bool,
}

impl ProductCard {
    /// The first display rule the card breaks, if any.
    pub fn violation(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("name is empty")
        } else if self.price.is_empty() {
            Some("price is empty")
        } else if !has_currency_marker(&self.price) {
            Some("price doesn't contain $")
        } else if !self.image_visible {
            Some("image is not visible")
        } else if !self.link_visible {
            Some("link is not visible")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomePage<'p> {
    base: BasePage<'p>,
}

impl<'p> HomePage<'p> {
    pub fn new(base: BasePage<'p>) -> Self {
        Self { base }
    }

    fn card(index: usize) -> ElementQuery {
        ElementQuery::css(PRODUCT_CARDS).nth(index)
    }

    /// Loads `/` and waits for the navbar, or failing that the product grid.
    pub async fn navigate(&self) -> Result<()> {
        self.base.navigate("/").await?;

        if let Err(err) = self.base.wait_for_visible(NAVBAR_BRAND, None).await {
            warn!("{err}; waiting for product cards instead");
            self.base.wait_for_element(PRODUCT_CARDS, None).await?;
        }
        Ok(())
    }

    /// The grid is filled in after the page loads.
    pub async fn wait_for_products(&self) -> Result<()> {
        self.base.wait_for_element(PRODUCT_CARDS, None).await
    }

    pub async fn product_count(&self) -> Result<usize> {
        self.base.count(PRODUCT_CARDS).await
    }

    pub async fn product_details(&self, index: usize) -> Result<ProductCard> {
        let card = Self::card(index);

        Ok(ProductCard {
            name: self
                .base
                .get_trimmed_text(card.clone().descendant(PRODUCT_NAME))
                .await?,
            price: self
                .base
                .get_trimmed_text(card.clone().descendant(PRODUCT_PRICE))
                .await?,
            image_visible: self
                .base
                .is_visible(card.clone().descendant(PRODUCT_IMAGE))
                .await?,
            link_visible: self.base.is_visible(card.descendant(PRODUCT_LINK)).await?,
        })
    }

    pub async fn product_image_box(&self, index: usize) -> Result<BoundingBox> {
        let image = Self::card(index).descendant(PRODUCT_IMAGE);
        Ok(self.base.page().bounding_box(image).await?)
    }

    pub async fn all_product_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for i in 0..self.product_count().await? {
            names.push(self.product_details(i).await?.name);
        }
        Ok(names)
    }

    pub async fn all_product_prices(&self) -> Result<Vec<String>> {
        let mut prices = Vec::new();
        for i in 0..self.product_count().await? {
            prices.push(self.product_details(i).await?.price);
        }
        Ok(prices)
    }

    /// Opens the details page of card `index`.
    pub async fn click_product(&self, index: usize) -> Result<()> {
        self.base
            .click_and_settle(Self::card(index).descendant(PRODUCT_LINK))
            .await
    }

    pub async fn click_cart(&self) -> Result<()> {
        self.base.click_and_settle(CART_LINK).await
    }

    /// Checks every card shows a name, a `$` price, an image and a link.
    pub async fn validate_product_display(&self) -> Result<()> {
        for i in 0..self.product_count().await? {
            let card = self.product_details(i).await?;
            if let Some(problem) = card.violation() {
                return Err(PageError::validation(
                    Self::NAME,
                    format!("product {i} {problem}"),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<'p> PageObject for HomePage<'p> {
    const NAME: &'static str = "home";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    async fn is_page_loaded(&self) -> bool {
        self.base.is_visible(NAVBAR_BRAND).await.unwrap_or(false)
    }
}
