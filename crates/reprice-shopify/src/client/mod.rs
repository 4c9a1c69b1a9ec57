//! HTTP client for the Shopify Admin REST API.

mod origin;
mod requests;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ShopifyError;
use crate::pagination::PageCursor;

pub use origin::admin_base_url;

const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

const USER_AGENT: &str = "reprice/0.1 (catalog-repricer)";

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Authenticated client for one store's Admin API.
///
/// Built once from configuration and passed to the run loop through
/// [`crate::CatalogApi`]. Use [`AdminClient::new`] for a real store or
/// [`AdminClient::with_base_url`] to point at a mock server in tests.
pub struct AdminClient {
    client: Client,
    base_url: Url,
}

impl AdminClient {
    /// Creates a client for `https://{store}/admin/api/{api_version}/`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::InvalidStore`] if `store` or `api_version` cannot form a URL.
    /// - [`ShopifyError::InvalidAccessToken`] if the token is not a valid header value.
    /// - [`ShopifyError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        store: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let base_url = admin_base_url(store, api_version)?;
        Self::build(base_url, access_token, timeout_secs)
    }

    /// Creates a client rooted at an arbitrary base URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::new`].
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        timeout_secs: u64,
    ) -> Result<Self, ShopifyError> {
        // Exactly one trailing slash, so relative joins append rather than
        // replace the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidStore {
            store: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Self::build(parsed, access_token, timeout_secs)
    }

    fn build(base_url: Url, access_token: &str, timeout_secs: u64) -> Result<Self, ShopifyError> {
        let mut token = HeaderValue::from_str(access_token.trim())
            .map_err(|_| ShopifyError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Root of the versioned Admin API this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ShopifyError> {
        self.base_url
            .join(path)
            .map_err(|e| ShopifyError::InvalidStore {
                store: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// Builds the `products.json` URL for the given page size and optional cursor.
    fn products_url(&self, limit: u32, page_info: Option<&PageCursor>) -> Result<Url, ShopifyError> {
        let mut url = self.endpoint("products.json")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &limit.to_string());
            if let Some(cursor) = page_info {
                pairs.append_pair("page_info", cursor.as_str());
            }
        }
        Ok(url)
    }

    fn inventory_item_url(&self, inventory_item_id: i64) -> Result<Url, ShopifyError> {
        self.endpoint(&format!("inventory_items/{inventory_item_id}.json"))
    }

    fn variant_url(&self, variant_id: i64) -> Result<Url, ShopifyError> {
        self.endpoint(&format!("variants/{variant_id}.json"))
    }

    /// Sends `request` and maps non-2xx statuses to typed errors.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] on 429.
    /// - [`ShopifyError::NotFound`] on 404.
    /// - [`ShopifyError::UnexpectedStatus`] on any other non-2xx, with the body.
    /// - [`ShopifyError::Http`] on network or TLS failure.
    async fn send_checked(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Response, ShopifyError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = retry_after_secs(response.headers());
            return Err(ShopifyError::RateLimited {
                url: url.to_string(),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ShopifyError> {
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ShopifyError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Reads `Retry-After` as whole seconds, rounding up.
///
/// Shopify sends fractional seconds, e.g. `"2.0"`.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = secs.ceil() as u64;
            whole
        })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
