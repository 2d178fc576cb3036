//! The cart table, its total and row deletion.

use async_trait::async_trait;
use shopcheck_browser::wait::{wait_for_result, WaitConfig};
use shopcheck_browser::ElementQuery;

use crate::base::{BasePage, PageObject};
use crate::error::{PageError, Result};
use crate::price::parse_price;

pub mod selectors {
    pub const CART_ITEMS: &str = ".success";
    pub const ITEM_NAME: &str = "td:nth-child(2)";
    pub const ITEM_PRICE: &str = "td:nth-child(3)";
    pub const DELETE_LINK: &str = "td:nth-child(4) a";
    pub const TOTAL_PRICE: &str = "#totalp";
    pub const PLACE_ORDER_BUTTON: &str = ".btn-success";
    pub const EMPTY_CART_MESSAGE: &str = ".text-center";
}

use selectors::*;

pub const CART_PATH: &str = "/cart.html";

const PAGE_NAME: &str = "cart";

/// One row of the cart table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub name: String,
    pub price: String,
}

/// A cart page counts as loaded once it shows rows or its placeholder.
pub fn cart_loaded(row_count: usize, placeholder_visible: bool) -> bool {
    row_count > 0 || placeholder_visible
}

/// Checks that `rows` holds `name` at a price numerically equal to
/// `expected_price`. Only the first row with that name is compared.
pub fn check_cart_item(rows: &[CartRow], name: &str, expected_price: &str) -> Result<()> {
    let row = rows
        .iter()
        .find(|row| row.name == name)
        .ok_or_else(|| {
            PageError::validation(PAGE_NAME, format!("item {name} not found in cart"))
        })?;

    let expected = parse_price(expected_price);
    let actual = parse_price(&row.price);

    match (expected, actual) {
        (Some(expected), Some(actual)) if expected == actual => Ok(()),
        _ => Err(PageError::validation(
            PAGE_NAME,
            format!(
                "price mismatch for {name}: expected {expected_price}, got {}",
                row.price
            ),
        )),
    }
}

/// Sum of the row prices.
pub fn sum_prices(rows: &[CartRow]) -> Result<f64> {
    rows.iter().try_fold(0.0, |total, row| {
        parse_price(&row.price).map(|price| total + price).ok_or_else(|| {
            PageError::validation(
                PAGE_NAME,
                format!("price of {} is not numeric: {:?}", row.name, row.price),
            )
        })
    })
}

#[derive(Debug, Clone)]
pub struct CartPage<'p> {
    base: BasePage<'p>,
}

impl<'p> CartPage<'p> {
    pub fn new(base: BasePage<'p>) -> Self {
        Self { base }
    }

    fn row(index: usize) -> ElementQuery {
        ElementQuery::css(CART_ITEMS).nth(index)
    }

    /// Loads the cart. Rows arrive later; see [`CartPage::wait_for_item_count`].
    pub async fn navigate(&self) -> Result<()> {
        self.base.navigate(CART_PATH).await?;
        self.base.wait_for_element(TOTAL_PRICE, None).await
    }

    pub async fn cart_item_count(&self) -> Result<usize> {
        self.base.count(CART_ITEMS).await
    }

    /// Rows are fetched after the page loads; wait until `expected` are shown.
    pub async fn wait_for_item_count(&self, expected: usize) -> Result<()> {
        wait_for_result(
            move || async move {
                let rows = self.base.page().count(CART_ITEMS).await?;
                Ok(rows == expected)
            },
            WaitConfig::with_timeout(self.base.timeouts().element),
            &format!("cart to show {expected} items"),
        )
        .await?;
        Ok(())
    }

    pub async fn item_details(&self, index: usize) -> Result<CartRow> {
        let row = Self::row(index);
        Ok(CartRow {
            name: self
                .base
                .get_trimmed_text(row.clone().descendant(ITEM_NAME))
                .await?,
            price: self.base.get_trimmed_text(row.descendant(ITEM_PRICE)).await?,
        })
    }

    pub async fn cart_items(&self) -> Result<Vec<CartRow>> {
        let mut rows = Vec::new();
        for i in 0..self.cart_item_count().await? {
            rows.push(self.item_details(i).await?);
        }
        Ok(rows)
    }

    /// The total as the page shows it.
    pub async fn displayed_total(&self) -> Result<String> {
        self.base.get_trimmed_text(TOTAL_PRICE).await
    }

    pub async fn computed_total(&self) -> Result<f64> {
        sum_prices(&self.cart_items().await?)
    }

    /// Deletes row `index` and waits for the table to shrink.
    pub async fn delete_item(&self, index: usize) -> Result<()> {
        let before = self.cart_item_count().await?;
        self.base
            .click_element(Self::row(index).descendant(DELETE_LINK))
            .await?;

        wait_for_result(
            move || async move {
                let rows = self.base.page().count(CART_ITEMS).await?;
                Ok(rows < before)
            },
            WaitConfig::with_timeout(self.base.timeouts().element),
            &format!("cart row {index} to be removed"),
        )
        .await?;
        Ok(())
    }

    pub async fn is_place_order_visible(&self) -> Result<bool> {
        self.base.is_visible(PLACE_ORDER_BUTTON).await
    }

    pub async fn validate_cart_item(&self, name: &str, expected_price: &str) -> Result<()> {
        check_cart_item(&self.cart_items().await?, name, expected_price)
    }

    pub async fn validate_cart_has_items(&self, expected: usize) -> Result<()> {
        let actual = self.cart_item_count().await?;
        if actual != expected {
            return Err(PageError::validation(
                Self::NAME,
                format!("expected {expected} items, got {actual}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<'p> PageObject for CartPage<'p> {
    const NAME: &'static str = PAGE_NAME;

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }

    async fn is_page_loaded(&self) -> bool {
        let rows = self.base.count(CART_ITEMS).await.unwrap_or(0);
        let placeholder = self
            .base
            .is_visible(EMPTY_CART_MESSAGE)
            .await
            .unwrap_or(false);
        cart_loaded(rows, placeholder)
    }
}
