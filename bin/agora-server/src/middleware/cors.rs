use crate::state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    // `*` cannot be combined with credentials, so it never enters the list.
    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        // Wildcard – suitable for development only.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods(Any);
    }

    // Credentials (the bearer token) are allowed, which rules out wildcard
    // headers and methods, so both are mirrored from the preflight request.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::test_support::{test_state_with, RecordingGateway};

    async fn allowed_origin(origins: Option<&str>, origin: &str) -> Option<String> {
        let config = Config {
            cors_allowed_origins: origins.map(str::to_owned),
            enable_swagger: false,
            ..Config::default()
        };
        let state = test_state_with(config, Arc::new(RecordingGateway::replying(""))).await;
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();

        let response = crate::routes::build(state).oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn listed_origin_is_echoed() {
        let allowed = allowed_origin(Some("http://localhost:3000"), "http://localhost:3000").await;
        assert_eq!(allowed.as_deref(), Some("http://localhost:3000"));
        assert_eq!(allowed_origin(Some("http://localhost:3000"), "http://evil.test").await, None);
    }

    #[tokio::test]
    async fn no_list_allows_any_origin() {
        assert_eq!(allowed_origin(None, "http://evil.test").await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn star_in_list_is_ignored() {
        let allowed = allowed_origin(Some("*, http://a.test"), "http://a.test").await;
        assert_eq!(allowed.as_deref(), Some("http://a.test"));
        assert_eq!(allowed_origin(Some("*"), "http://b.test").await.as_deref(), Some("*"));
    }
}
