//! HTTP 에러 응답
//!
//! shared::tool::error::AppError를 actix-web 응답으로 변환합니다.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use shared::tool::error::{AppError, ErrorCode};
use std::fmt;

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl From<ErrorCode> for ErrorBody {
    fn from(code: ErrorCode) -> Self {
        Self {
            code: code.as_str(),
            message: code.message(),
        }
    }
}

/// 핸들러 에러 타입
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        self.0.code()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        ApiError(AppError::Business(code))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        // 내부 원인은 로그에만 남기고 응답에는 코드 메시지만 담음
        self.0.log("API 요청 처리");
        HttpResponse::build(self.status_code()).json(ErrorBody::from(self.code()))
    }
}

// 편의를 위한 타입 별칭
pub type ApiResult<T> = Result<T, ApiError>;
