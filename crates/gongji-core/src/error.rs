//! GONGJI 핵심 에러 타입.
//!
//! 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정 저장소, 유효성 검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정 저장소 기록 실패 (디렉토리 생성, 파일 쓰기)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 저장소 읽기 불가 — 호출측은 팝업을 숨긴다 (fail closed)
    #[error("설정 저장소 접근 불가: {0}")]
    ConfigUnavailable(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
