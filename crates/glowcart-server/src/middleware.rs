use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID carried through the handler chain as an extension and echoed
/// in every response envelope's `meta`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags the request with an ID before it reaches a handler. A caller-supplied
/// `x-request-id` is reused so storefront clients can correlate retries;
/// otherwise a fresh UUID is minted. The same ID goes back out as a response
/// header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(supplied) => supplied.to_owned(),
        None => Uuid::new_v4().to_string(),
    };

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut response = next.run(req).await;

    // The id is either a UUID or a value that already arrived as a header,
    // so it is always header-safe.
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
