// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and two-step login handlers.
//!
//! Bodies are taken as `Result<Json<_>, JsonRejection>` so malformed JSON
//! answers with the same `{error, error_code}` shape as every other failure.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::origin::RequestOrigin;
use crate::{
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, NonceRequest, NonceResponse, RegisterRequest,
        RegisterResponse, VerifySignatureRequest, VerifySignatureResponse,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(request) = body?;
    state
        .login
        .register(&request.email, &request.password, &request.wallet_address)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully.".into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    let verified = state.login.login(&request.email, &request.password)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Password verified. Please sign the message with your wallet.".into(),
        associated_address: verified.associated_address,
        attempt_id: verified.attempt_id,
    }))
}

#[utoipa::path(
    post,
    path = "/request-nonce",
    request_body = NonceRequest,
    tag = "Auth",
    responses(
        (status = 200, body = NonceResponse),
        (status = 400, description = "Missing wallet address"),
        (status = 404, description = "No account linked to this wallet")
    )
)]
pub async fn request_nonce(
    State(state): State<AppState>,
    body: Result<Json<NonceRequest>, JsonRejection>,
) -> Result<Json<NonceResponse>, ApiError> {
    let Json(request) = body?;
    let challenge = state.login.request_challenge(&request.wallet_address)?;

    Ok(Json(NonceResponse {
        message_to_sign: challenge.message,
    }))
}

#[utoipa::path(
    post,
    path = "/verify-signature",
    request_body = VerifySignatureRequest,
    tag = "Auth",
    responses(
        (status = 200, body = VerifySignatureResponse),
        (status = 400, description = "Missing fields or no outstanding challenge"),
        (status = 401, description = "Signature mismatch, wrong wallet or unknown attempt"),
        (status = 500, description = "Signature could not be verified")
    )
)]
pub async fn verify_signature(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    body: Result<Json<VerifySignatureRequest>, JsonRejection>,
) -> Result<Json<VerifySignatureResponse>, ApiError> {
    let Json(request) = body?;
    let issued = state.login.verify_signature(
        request.attempt_id,
        &request.wallet_address,
        &request.signature,
        origin,
    )?;

    Ok(Json(VerifySignatureResponse {
        success: true,
        message: "Login successful!".into(),
        token: issued.token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sign, signer, ALICE_KEY, BOB_KEY, TEST_SECRET};

    fn register_request(email: &str, wallet: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "hunter2".into(),
            wallet_address: wallet.into(),
        }
    }

    #[tokio::test]
    async fn register_success_then_conflict() {
        let state = AppState::in_memory(TEST_SECRET);
        let wallet = signer(ALICE_KEY).address().to_checksum(None);

        let (status, Json(body)) = register(
            State(state.clone()),
            Ok(Json(register_request("a@x.com", &wallet))),
        )
        .await
        .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);

        let err = register(State(state), Ok(Json(register_request("a@x.com", &wallet))))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "User already exists.");
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let state = AppState::in_memory(TEST_SECRET);
        let err = register(State(state), Ok(Json(RegisterRequest::default())))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Email, password, and walletAddress are required.");
    }

    #[tokio::test]
    async fn login_returns_lowercase_address() {
        let state = AppState::in_memory(TEST_SECRET);
        let wallet = signer(ALICE_KEY).address().to_checksum(None);
        let (status, _) =
            register(State(state.clone()), Ok(Json(register_request("a@x.com", &wallet))))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(body) = login(
            State(state.clone()),
            Ok(Json(LoginRequest {
                email: "a@x.com".into(),
                password: "hunter2".into(),
            })),
        )
        .await
        .expect("login succeeds");
        assert!(body.success);
        assert_eq!(body.associated_address.as_str(), wallet.to_lowercase());

        let err = login(
            State(state),
            Ok(Json(LoginRequest {
                email: "a@x.com".into(),
                password: "nope".into(),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_nonce_for_unknown_wallet_is_not_found() {
        let state = AppState::in_memory(TEST_SECRET);
        let err = request_nonce(
            State(state),
            Ok(Json(NonceRequest {
                wallet_address: signer(BOB_KEY).address().to_checksum(None),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_signature_issues_token() {
        let state = AppState::in_memory(TEST_SECRET);
        let alice = signer(ALICE_KEY);
        let wallet = alice.address().to_checksum(None);
        let (status, _) =
            register(State(state.clone()), Ok(Json(register_request("a@x.com", &wallet))))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let Json(verified) = login(
            State(state.clone()),
            Ok(Json(LoginRequest {
                email: "a@x.com".into(),
                password: "hunter2".into(),
            })),
        )
        .await
        .unwrap();
        let Json(nonce) = request_nonce(
            State(state.clone()),
            Ok(Json(NonceRequest {
                wallet_address: wallet.clone(),
            })),
        )
        .await
        .unwrap();

        let Json(body) = verify_signature(
            State(state.clone()),
            RequestOrigin(Some("192.0.2.1".into())),
            Ok(Json(VerifySignatureRequest {
                wallet_address: wallet.clone(),
                signature: sign(&alice, &nonce.message_to_sign),
                attempt_id: Some(verified.attempt_id),
            })),
        )
        .await
        .expect("verification succeeds");

        assert!(body.success);
        let claims = state.sessions().validate_token(&body.token).unwrap();
        assert_eq!(claims.wallet_address.as_str(), wallet.to_lowercase());
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn verify_signature_without_challenge_is_bad_request() {
        let state = AppState::in_memory(TEST_SECRET);
        let alice = signer(ALICE_KEY);
        let err = verify_signature(
            State(state),
            RequestOrigin(None),
            Ok(Json(VerifySignatureRequest {
                wallet_address: alice.address().to_checksum(None),
                signature: sign(&alice, "whatever"),
                attempt_id: Some(uuid::Uuid::new_v4()),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No nonce found. Please request a new one.");
    }
}
