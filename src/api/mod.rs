// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chain::Balance,
    error::ErrorBody,
    ramp::RampDirection,
    session::{Panel, SessionPhase, SessionView},
    state::AppState,
};

pub mod health;
pub mod ramp;
pub mod session;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/session/profile", post(session::fetch_profile))
        .route("/session/balance", post(session::fetch_balance))
        .route("/session/transfer", post(session::send_transfer))
        .route("/ramp/{direction}", get(ramp::redirect_to_ramp));

    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        session::get_session,
        session::login,
        session::logout,
        session::fetch_profile,
        session::fetch_balance,
        session::send_transfer,
        ramp::redirect_to_ramp
    ),
    components(
        schemas(
            SessionView,
            SessionPhase,
            Panel,
            Balance,
            RampDirection,
            ErrorBody,
            session::TransferRequest,
            health::HealthResponse,
            health::ReadyResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Session", description = "Login, profile, balance and transfer operations"),
        (name = "Ramp", description = "Fiat on/off-ramp redirects")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header::LOCATION, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::testing::{address, orchestrator, Script};

    async fn app() -> Router {
        let (orch, _) = orchestrator(Script::default());
        let state = AppState::new(orch);
        state.orchestrator.initialize().await;
        router(state)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn liveness_route_responds() {
        let app = app().await;
        let response = app.oneshot(request(Method::GET, "/health/live")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn login_then_ramp_redirect_through_router() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/v1/session/login"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let view: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["state"], "logged_in");
        assert_eq!(view["wallet_address"], address());

        let response = app
            .oneshot(request(Method::GET, "/v1/ramp/buy"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            format!(
                "https://buy.moonpay.com?apiKey=k1&currencyCode=sol&walletAddress={}",
                address()
            )
            .as_str()
        );
    }

    #[tokio::test]
    async fn unknown_ramp_direction_is_rejected() {
        let app = app().await;
        let response = app
            .oneshot(request(Method::GET, "/v1/ramp/swap"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn openapi_lists_session_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/session/transfer"));
        assert!(doc.paths.paths.contains_key("/v1/ramp/{direction}"));
    }
}
