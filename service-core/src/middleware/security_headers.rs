use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Paths that only ever return JSON or plain text.
fn is_api_route(path: &str) -> bool {
    path.starts_with("/api/") || path == "/health"
}

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let is_api = is_api_route(req.uri().path());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );

    if is_api {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        );
    } else {
        // Static pages render artwork images hosted elsewhere.
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static(
                "default-src 'self'; \
                 img-src 'self' https: data:; \
                 style-src 'self' 'unsafe-inline'; \
                 connect-src 'self'; \
                 frame-ancestors 'none'",
            ),
        );
    }

    response
}
