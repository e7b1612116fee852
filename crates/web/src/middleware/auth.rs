use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::WebError;

/// Rejects requests without a known bearer key before they reach the handler.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if api_keys.is_valid(token) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
        None => Err(WebError::Unauthorized),
    }
}

#[derive(Clone)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http, http::StatusCode, middleware, routing::post};
    use tower::ServiceExt;

    use super::*;

    fn guarded(api_keys: ApiKeys) -> Router {
        Router::new()
            .route("/", post(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
    }

    fn post_with(auth: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_parses_comma_separated_keys() {
        let keys = ApiKeys::from_comma_separated(" alpha , ,beta");

        assert!(keys.is_valid("alpha"));
        assert!(keys.is_valid("beta"));
        assert!(!keys.is_valid(""));
        assert!(!keys.is_empty());
        assert!(ApiKeys::from_comma_separated("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let response = guarded(ApiKeys::from_comma_separated("alpha"))
            .oneshot(post_with(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected() {
        let response = guarded(ApiKeys::from_comma_separated("alpha"))
            .oneshot(post_with(Some("Bearer gamma")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_known_key_passes_through() {
        let response = guarded(ApiKeys::from_comma_separated("alpha"))
            .oneshot(post_with(Some("Bearer alpha")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
