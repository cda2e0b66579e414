// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        LoginHistoryResponse, LoginRequest, LoginResponse, NonceRequest, NonceResponse,
        RegisterRequest, RegisterResponse, VerifySignatureRequest, VerifySignatureResponse,
        WalletAddress,
    },
    state::AppState,
    storage::LoginRecord,
};

pub mod health;
pub mod history;
pub mod login;
pub mod origin;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(health::root))
        .route("/health/live", get(health::liveness))
        .route("/register", post(login::register))
        .route("/login", post(login::login))
        .route("/request-nonce", post(login::request_nonce))
        .route("/verify-signature", post(login::verify_signature))
        .route("/api/login-history", get(history::login_history))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::liveness,
        login::register,
        login::login,
        login::request_nonce,
        login::verify_signature,
        history::login_history
    ),
    components(
        schemas(
            WalletAddress,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            NonceRequest,
            NonceResponse,
            VerifySignatureRequest,
            VerifySignatureResponse,
            LoginHistoryResponse,
            LoginRecord,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and greeting"),
        (name = "Auth", description = "Registration, password login and wallet signature verification")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sign, signer, ALICE_KEY, BOB_KEY, TEST_SECRET};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn history(app: &Router, token: &str) -> (StatusCode, Value) {
        let request = Request::get("/api/login-history")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn openapi_document_lists_auth_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/register", "/login", "/request-nonce", "/verify-signature", "/api/login-history"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let response = app
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn full_login_flow_over_http() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let alice = signer(ALICE_KEY);
        let wallet = alice.address().to_checksum(None);

        let (status, body) = post_json(
            &app,
            "/register",
            json!({"email": "a@x.com", "password": "p", "publicAddress": wallet}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);

        let (status, body) =
            post_json(&app, "/login", json!({"email": "a@x.com", "password": "p"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["associatedAddress"], wallet.to_lowercase());
        let attempt_id = body["attemptId"].as_str().unwrap().to_string();

        let (status, body) =
            post_json(&app, "/request-nonce", json!({"walletAddress": wallet})).await;
        assert_eq!(status, StatusCode::OK);
        let message = body["messageToSign"].as_str().unwrap().to_string();
        assert!(message.starts_with("Welcome! Please sign this message to log in. Nonce: "));

        let signature = sign(&alice, &message);
        let (status, body) = post_json(
            &app,
            "/verify-signature",
            json!({"walletAddress": wallet, "signature": signature, "attemptId": attempt_id}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        // Replaying the consumed challenge fails.
        let (status, body) = post_json(
            &app,
            "/verify-signature",
            json!({"walletAddress": wallet, "signature": signature, "attemptId": attempt_id}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "missing_challenge");

        let (status, body) = history(&app, &token).await;
        assert_eq!(status, StatusCode::OK);
        let logins = body["logins"].as_array().unwrap();
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0]["walletAddress"], wallet.to_lowercase());
    }

    #[tokio::test]
    async fn signing_with_another_registered_wallet_is_rejected() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let alice = signer(ALICE_KEY);
        let bob = signer(BOB_KEY);
        let alice_wallet = alice.address().to_checksum(None);
        let bob_wallet = bob.address().to_checksum(None);

        for (email, wallet) in [("a@x.com", &alice_wallet), ("b@x.com", &bob_wallet)] {
            let (status, _) = post_json(
                &app,
                "/register",
                json!({"email": email, "password": "p", "walletAddress": wallet}),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) =
            post_json(&app, "/login", json!({"email": "a@x.com", "password": "p"})).await;
        let attempt_id = body["attemptId"].clone();

        let (_, body) =
            post_json(&app, "/request-nonce", json!({"walletAddress": bob_wallet})).await;
        let signature = sign(&bob, body["messageToSign"].as_str().unwrap());

        let (status, body) = post_json(
            &app,
            "/verify-signature",
            json!({"walletAddress": bob_wallet, "signature": signature, "attemptId": attempt_id}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "wrong_wallet");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let request = Request::post("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_body");
    }

    #[tokio::test]
    async fn login_history_requires_token() {
        let app = router(AppState::in_memory(TEST_SECRET));
        let request = Request::get("/api/login-history").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "missing_auth_header");

        let (status, _) = history(&app, "not.a.token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
