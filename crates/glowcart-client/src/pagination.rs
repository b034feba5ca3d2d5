//! Cursor pagination over the catalog endpoints.
//!
//! The backend paginates `products.json` with a `Link` response header whose
//! `rel="next"` URL carries the cursor as a `page_info` query parameter:
//!
//! ```text
//! <https://shop.example.com/products.json?limit=250&page_info=CURSOR>; rel="next"
//! ```
//!
//! The last page carries no `rel="next"` directive (a `rel="previous"` may
//! still be present).

/// Pulls the next-page cursor out of a `Link` header value, if any.
///
/// Returns `None` when the header is absent, no `rel="next"` directive
/// exists, or the next URL carries no `page_info` parameter, all of which
/// mean "no further pages".
#[must_use]
pub fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .filter_map(parse_directive)
        .find_map(|(url, rel)| {
            if rel == "next" {
                query_param_value(url, "page_info").map(ToOwned::to_owned)
            } else {
                None
            }
        })
}

/// Splits one `<URL>; rel="..."` directive into its URL and relation.
fn parse_directive(segment: &str) -> Option<(&str, &str)> {
    let segment = segment.trim();
    let url_end = segment.find('>')?;
    let url = segment.get(1..url_end).filter(|_| segment.starts_with('<'))?;

    let rel = segment[url_end..]
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("rel="))?
        .trim_matches('"');

    Some((url, rel))
}

/// Looks up a query parameter's value in a URL string. Cursors are
/// base64url-encoded, so no percent-decoding is needed.
fn query_param_value<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.split('#').next().unwrap_or(value))
        .filter(|value| !value.is_empty())
}
