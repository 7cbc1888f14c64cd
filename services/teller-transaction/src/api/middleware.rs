//! 中间件

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use teller_auth_core::TokenService;
use teller_errors::AppError;
use tracing::{debug, warn};

use super::envelope::EntityResponse;

/// Bearer 令牌认证中间件
///
/// 验证 JWT 并将 claims 注入请求扩展；失败时返回 401 信封。
pub async fn auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!("Missing or invalid authorization header");
        return unauthorized(AppError::unauthorized("Missing bearer token"));
    };

    match token_service.validate_access_token(&token) {
        Ok(claims) => {
            debug!(teller = %claims.sub, "Token validated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            unauthorized(e)
        }
    }
}

/// 请求时限中间件
///
/// 超时的请求同样以信封返回（`statusCode` 408）。
pub async fn deadline_middleware(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis() as u64, "Request deadline exceeded");
            EntityResponse::<()>::timed_out().into_response()
        }
    }
}

fn unauthorized(err: AppError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(EntityResponse::<()>::failure(&err)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use tower::ServiceExt;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn app(token_service: Arc<TokenService>) -> Router {
        Router::new()
            .route("/", get(|| async { "OK" }))
            .layer(middleware::from_fn_with_state(token_service, auth_middleware))
    }

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET, 3600, "teller-auth", "teller-api"))
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let service = token_service();
        let token = service.generate_access_token("teller-007", vec![]).unwrap();

        let response = app(service)
            .oneshot(
                HttpRequest::builder()
                    .uri("/")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_yields_envelope() {
        let response = app(token_service())
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 401);
    }

    #[tokio::test]
    async fn test_deadline_yields_timeout_envelope() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_millis(20),
                deadline_middleware,
            ));

        let response = app
            .oneshot(HttpRequest::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 408);
        assert!(json["entity"].is_null());
    }

    #[tokio::test]
    async fn test_fast_request_within_deadline() {
        let app = Router::new()
            .route("/", get(|| async { "OK" }))
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(5),
                deadline_middleware,
            ));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let response = app(token_service())
            .oneshot(
                HttpRequest::builder()
                    .uri("/")
                    .header(AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
