//! Admin API base URL construction.

use reqwest::Url;

use crate::error::ShopifyError;

/// Builds the versioned Admin API root for a store.
///
/// `store` is normally the bare shop domain (`"my-shop.myshopify.com"`); a
/// scheme or trailing path is tolerated and stripped down to the origin.
/// Given API version `"2024-04"` the result is
/// `https://my-shop.myshopify.com/admin/api/2024-04/`.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidStore`] if the store has no usable host,
/// uses a non-HTTP scheme, or the API version is blank.
pub fn admin_base_url(store: &str, api_version: &str) -> Result<Url, ShopifyError> {
    let invalid = |reason: String| ShopifyError::InvalidStore {
        store: store.to_owned(),
        reason,
    };

    let trimmed = store.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("no host".to_owned()));
    }

    let version = api_version.trim().trim_matches('/');
    if version.is_empty() {
        return Err(invalid("API version is empty".to_owned()));
    }

    let origin = url.origin().ascii_serialization();
    Url::parse(&format!("{origin}/admin/api/{version}/")).map_err(|e| invalid(e.to_string()))
}
