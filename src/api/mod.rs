pub mod auth;
mod donations;
mod error;
mod requests;
mod validation;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Handlers taking an AuthUser argument reject unauthenticated callers
    // before any business logic runs; the rest are public.
    let api_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/donations",
            get(donations::list_available_donations).post(donations::create_donation),
        )
        .route("/my-donations", get(donations::list_my_donations))
        .route("/donations/:id", patch(donations::update_donation))
        .route("/donations/:id", delete(donations::delete_donation))
        .route("/requests", post(requests::create_request))
        .route("/my-requests", get(requests::list_my_requests))
        .route("/requests/:id", patch(requests::respond_to_request));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::test_util::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_protected_route_rejects_unauthenticated_calls() {
        let state = test_state().await;
        let app = super::create_router(state.clone());

        // no Authorization header
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/donations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // garbage token
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/donations")
                    .header("Authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // correctly signed but expired token
        let expired =
            super::auth::issue_token("u1", "ama@example.com", "test-secret", -2).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/donations")
                    .header("Authorization", format!("Bearer {}", expired))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // rejection happened before business logic: nothing was persisted
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM donations")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
