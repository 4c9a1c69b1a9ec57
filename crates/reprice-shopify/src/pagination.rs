//! Cursor pagination for the Admin `products.json` listing.
//!
//! Each listing response carries a `Link` header with URLs for the adjacent
//! pages. The cursor for a page is the `page_info` query parameter of its URL.
//!
//! ## Header format
//!
//! Single next link:
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-04/products.json?limit=50&page_info=CURSOR>; rel="next"
//! ```
//!
//! Combined previous and next:
//! ```text
//! <https://.../products.json?limit=50&page_info=PREV>; rel="previous",
//! <https://.../products.json?limit=50&page_info=NEXT>; rel="next"
//! ```

/// Opaque continuation token naming the next catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a `Link` header value and extracts the cursor for the next page.
///
/// Returns `None` if:
/// - `link_header` is `None` (no header was present),
/// - there is no `rel="next"` segment (last page reached),
/// - the URL in the next segment has no `page_info` query parameter.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<PageCursor> {
    let header = link_header?;

    for segment in header.split(',') {
        let segment = segment.trim();

        if !is_next_relation(segment) {
            continue;
        }

        let url = extract_angle_bracket_url(segment)?;
        return extract_query_param(url, "page_info").map(PageCursor);
    }

    None
}

/// Matches `rel="next"` as well as the unquoted `rel=next` form.
fn is_next_relation(segment: &str) -> bool {
    segment.split(';').skip(1).any(|param| {
        let param = param.trim();
        param == r#"rel="next""# || param == "rel=next"
    })
}

fn extract_angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}

/// Extracts the value of a named query parameter from a URL string.
///
/// Values are returned verbatim. Cursors are base64url and never need
/// percent-decoding; re-encoding happens when the next request URL is built.
fn extract_query_param(url: &str, param: &str) -> Option<String> {
    let query_start = url.find('?')? + 1;
    let query = &url[query_start..];
    let query = query.split('#').next().unwrap_or(query);

    let needle = format!("{param}=");
    query
        .split('&')
        .filter_map(|pair| pair.strip_prefix(needle.as_str()))
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}
