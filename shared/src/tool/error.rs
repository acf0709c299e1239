//! API Error Management System
//!
//! Shifterz 백엔드의 모든 에러를 체계적으로 관리합니다.
//! 비즈니스 에러는 `ErrorCode`로 표현되고, HTTP 계층은 코드의 상태값과
//! 메시지를 그대로 응답 본문으로 사용합니다.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth::TokenError;

/// 클라이언트에 노출되는 에러 코드
///
/// 각 코드는 HTTP 상태 코드와 사용자 메시지를 하나씩 가집니다.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // 공통
    #[error("서버 내부 오류가 발생했습니다.")]
    InternalServerError,
    #[error("잘못된 요청입니다.")]
    InvalidRequest,

    // 인증 관련
    #[error("유효하지 않은 카카오 액세스 토큰입니다.")]
    InvalidKakaoToken,
    #[error("카카오 사용자 정보 조회에 실패했습니다.")]
    KakaoUserinfoFetchFailed,
    #[error("인증이 필요합니다.")]
    Unauthorized,
    #[error("접근이 거부되었습니다.")]
    Forbidden,

    // 회원 관련
    #[error("회원 등록에 실패했습니다.")]
    MemberSaveFailed,
    #[error("존재하지 않는 회원입니다.")]
    MemberNotFound,

    // 근무표 등록
    #[error("근무표 이름은 필수입니다.")]
    CalendarNameRequired,
    #[error("연도는 필수입니다.")]
    CalendarYearRequired,
    #[error("월은 필수입니다.")]
    CalendarMonthRequired,
    #[error("근무조는 필수입니다.")]
    CalendarWorkGroupRequired,
    #[error("근무 시간 정보는 필수입니다.")]
    CalendarWorkTimeRequired,
    #[error("근무일 정보는 필수입니다.")]
    CalendarShiftRequired,
    #[error("이미 존재하는 연도/월의 캘린더입니다.")]
    CalendarDuplication,

    // 근무표 수정/삭제
    #[error("해당하는 연도, 월의 캘린더를 찾을 수 없습니다.")]
    CalendarNotFound,
    #[error("근무표 삭제에 실패하였습니다.")]
    CalendarDeleteFailed,

    // 근무일 조회
    #[error("연도 형식이 올바르지 않습니다.")]
    InvalidYearFormat,
    #[error("월 형식이 올바르지 않습니다.")]
    InvalidMonthFormat,
    #[error("해당 연도와 월에 대한 근무일이 존재하지 않습니다.")]
    WorkDayNotFound,
}

impl ErrorCode {
    /// 응답 본문의 `code` 필드 값
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidKakaoToken => "INVALID_KAKAO_TOKEN",
            ErrorCode::KakaoUserinfoFetchFailed => "KAKAO_USERINFO_FETCH_FAILED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::MemberSaveFailed => "MEMBER_SAVE_FAILED",
            ErrorCode::MemberNotFound => "MEMBER_NOT_FOUND",
            ErrorCode::CalendarNameRequired => "CALENDAR_NAME_REQUIRED",
            ErrorCode::CalendarYearRequired => "CALENDAR_YEAR_REQUIRED",
            ErrorCode::CalendarMonthRequired => "CALENDAR_MONTH_REQUIRED",
            ErrorCode::CalendarWorkGroupRequired => "CALENDAR_WORK_GROUP_REQUIRED",
            ErrorCode::CalendarWorkTimeRequired => "CALENDAR_WORK_TIME_REQUIRED",
            ErrorCode::CalendarShiftRequired => "CALENDAR_SHIFT_REQUIRED",
            ErrorCode::CalendarDuplication => "CALENDAR_DUPLICATION",
            ErrorCode::CalendarNotFound => "CALENDAR_NOT_FOUND",
            ErrorCode::CalendarDeleteFailed => "CALENDAR_DELETE_FAILED",
            ErrorCode::InvalidYearFormat => "INVALID_YEAR_FORMAT",
            ErrorCode::InvalidMonthFormat => "INVALID_MONTH_FORMAT",
            ErrorCode::WorkDayNotFound => "WORK_DAY_NOT_FOUND",
        }
    }

    /// HTTP 상태 코드
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InternalServerError
            | ErrorCode::MemberSaveFailed
            | ErrorCode::CalendarDeleteFailed => 500,

            ErrorCode::InvalidRequest
            | ErrorCode::CalendarNameRequired
            | ErrorCode::CalendarYearRequired
            | ErrorCode::CalendarMonthRequired
            | ErrorCode::CalendarWorkGroupRequired
            | ErrorCode::CalendarWorkTimeRequired
            | ErrorCode::CalendarShiftRequired
            | ErrorCode::CalendarDuplication
            | ErrorCode::InvalidYearFormat
            | ErrorCode::InvalidMonthFormat => 400,

            ErrorCode::InvalidKakaoToken | ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,

            ErrorCode::MemberNotFound
            | ErrorCode::CalendarNotFound
            | ErrorCode::WorkDayNotFound => 404,

            ErrorCode::KakaoUserinfoFetchFailed => 502,
        }
    }

    /// 사용자 메시지
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// 공통 애플리케이션 에러 정의
///
/// 서비스 계층에서 발생하는 모든 에러를 하나로 모읍니다.
/// 각 에러는 `code()`를 통해 응답용 `ErrorCode`로 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Business(ErrorCode),

    #[error("토큰 오류: {0}")]
    Token(#[from] TokenError),

    #[error("데이터베이스 쿼리 실패: {0}")]
    Database(#[from] sqlx::Error),

    #[error("외부 API 호출 실패: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        AppError::Business(code)
    }
}

impl AppError {
    /// 응답에 사용할 에러 코드
    ///
    /// 토큰 관련 실패는 원인과 관계없이 모두 `Unauthorized`가 됩니다.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Business(code) => *code,
            AppError::Token(_) => ErrorCode::Unauthorized,
            AppError::Database(_) | AppError::Configuration(_) => ErrorCode::InternalServerError,
            AppError::ExternalApi(_) => ErrorCode::KakaoUserinfoFetchFailed,
        }
    }

    /// 에러의 심각도를 반환합니다.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::Database(_) | AppError::Configuration(_) => ErrorSeverity::Critical,

            // High: 외부 연동 실패 및 서버 측 실패
            AppError::ExternalApi(_) => ErrorSeverity::High,
            AppError::Business(code) if code.http_status() >= 500 => ErrorSeverity::High,

            // Medium: 인증 실패
            AppError::Token(_) => ErrorSeverity::Medium,
            AppError::Business(ErrorCode::Unauthorized | ErrorCode::Forbidden) => {
                ErrorSeverity::Medium
            }

            // Low: 사용자 입력 오류
            AppError::Business(_) => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let code = self.code().as_str();
        match self.severity() {
            ErrorSeverity::Critical => error!("[CRITICAL] {} - {} ({})", context, self, code),
            ErrorSeverity::High => error!("[HIGH] {} - {} ({})", context, self, code),
            ErrorSeverity::Medium => warn!("[MEDIUM] {} - {} ({})", context, self, code),
            ErrorSeverity::Low => info!("[LOW] {} - {} ({})", context, self, code),
        }
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 외부 연동/서버 측 실패
    Medium,   // 인증 실패
    Low,      // 사용자 입력 오류
}

/// 에러 처리 헬퍼 함수들
pub mod helpers {
    use super::*;

    /// Option을 AppError로 변환하는 헬퍼 함수
    pub fn required<T>(option: Option<T>, code: ErrorCode) -> Result<T, AppError> {
        option.ok_or(AppError::Business(code))
    }

    /// 공백이 아닌 문자열인지 검증합니다.
    ///
    /// 앞뒤 공백을 제거한 값을 돌려줍니다.
    pub fn required_text(value: Option<String>, code: ErrorCode) -> Result<String, AppError> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(AppError::Business(code)),
        }
    }
}
