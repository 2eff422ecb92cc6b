use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use hyper::Request;

/// Methods used by the API routes
const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

/// Middleware allowing browser clients from any origin to use the API.
/// Preflight OPTIONS requests are answered directly without reaching
/// the routes
///
/// `req`  The request to handle
/// `next` The next layer to use
pub async fn cors_layer(req: Request<Body>, next: Next) -> Response {
    let mut res = if req.method() == Method::OPTIONS {
        preflight_response(&req)
    } else {
        next.run(req).await
    };

    res.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    res
}

/// Creates the response to a preflight request, the requested headers
/// are echoed back so JSON content types are accepted
fn preflight_response(req: &Request<Body>) -> Response {
    let mut res = Response::default();
    *res.status_mut() = StatusCode::NO_CONTENT;

    let allowed_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("Content-Type"));

    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);
    res
}

#[cfg(test)]
mod test {
    use super::{cors_layer, ALLOWED_METHODS};
    use axum::{
        body::Body,
        http::{
            header::{
                ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
                ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS,
            },
            Method, Request, StatusCode,
        },
        middleware::from_fn,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/builds/1/vote", post(|| async { Json(json!({ "votes": 1 })) }))
            .layer(from_fn(cors_layer))
    }

    #[tokio::test]
    async fn test_preflight() {
        let req = Request::builder()
            .uri("/api/builds/1/vote")
            .method(Method::OPTIONS)
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let headers = res.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_response_has_origin() {
        let req = Request::builder()
            .uri("/api/builds/1/vote")
            .method(Method::POST)
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "votes": 1 }));
    }
}
