// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::login_flow::LoginError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = match status {
            StatusCode::BAD_REQUEST => "bad_request",
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::CONFLICT => "conflict",
            _ => "internal_error",
        };
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}

impl From<LoginError> for ApiError {
    fn from(e: LoginError) -> Self {
        let message = e.to_string();
        match e {
            LoginError::Validation(_) => ApiError::bad_request(message).with_code("validation_error"),
            LoginError::DuplicateEmail => ApiError::conflict(message).with_code("duplicate_email"),
            LoginError::UnknownEmail => ApiError::not_found(message).with_code("unknown_email"),
            LoginError::InvalidPassword => {
                ApiError::unauthorized(message).with_code("invalid_password")
            }
            LoginError::UnknownAddress => ApiError::not_found(message).with_code("unknown_address"),
            LoginError::MissingChallenge => {
                ApiError::bad_request(message).with_code("missing_challenge")
            }
            LoginError::SignatureMismatch => {
                ApiError::unauthorized(message).with_code("signature_mismatch")
            }
            LoginError::WrongWallet => ApiError::unauthorized(message).with_code("wrong_wallet"),
            LoginError::UnknownAttempt => {
                ApiError::unauthorized(message).with_code("unknown_attempt")
            }
            LoginError::Verification(_) => {
                ApiError::internal(message).with_code("verification_error")
            }
            LoginError::Session(ref inner) => {
                tracing::error!(error = %inner, "Session token error");
                ApiError::internal(message)
            }
            LoginError::Password(ref inner) => {
                tracing::error!(error = %inner, "Password hashing error");
                ApiError::internal(message)
            }
            LoginError::Storage(ref inner) => {
                tracing::error!(error = %inner, "Storage error");
                ApiError::internal(message)
            }
            LoginError::NonceGeneration => {
                tracing::error!("Nonce generation failed");
                ApiError::internal(message)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text()).with_code("invalid_body")
    }
}
