//! Endpoint paths of the JSON service.

pub const PRODUCTS: &str = "/products";
pub const CART: &str = "/cart";

/// `base` alone when there is no suffix, otherwise `base + suffix`.
///
/// A trailing slash on `base` is dropped so `http://host/` and `http://host`
/// compose the same way.
pub fn url(base: &str, suffix: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match suffix {
        None => base.to_string(),
        Some(suffix) if suffix.starts_with('/') => format!("{base}{suffix}"),
        Some(suffix) => format!("{base}/{suffix}"),
    }
}
