//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use gongji_core::error::CoreError;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),

    /// 잘못된 요청
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 인증 실패 (관리 토큰)
    #[error("인증 실패: {0}")]
    Unauthorized(String),

    /// 설정 저장소 접근 불가
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            CoreError::Validation { field, message } => {
                ApiError::BadRequest(format!("{field}: {message}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Unauthorized("토큰 불일치".to_string());
        assert!(err.to_string().contains("토큰 불일치"));
    }

    #[test]
    fn config_unavailable_maps_to_503() {
        let err: ApiError = CoreError::ConfigUnavailable("잠금 오염".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn validation_maps_to_400() {
        let err: ApiError = CoreError::Validation {
            field: "html_content".to_string(),
            message: "너무 큼".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = ApiError::Unauthorized("없음".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
