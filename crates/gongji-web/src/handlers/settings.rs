//! 설정 API 핸들러.
//!
//! 관리 토큰으로 보호된다. 저장은 쿠키 버전을 전진시키므로 저장할 때마다
//! 기존 해제 마커가 전부 무효화된다 (새 캠페인).

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gongji_core::config::{PopupConfig, SettingsUpdate};
use gongji_core::ports::sanitizer::ContentSanitizer;

use crate::error::ApiError;
use crate::AppState;

/// 본문 최대 크기 (bytes)
const MAX_HTML_LEN: usize = 64 * 1024;
/// 커스텀 CSS 최대 크기 (bytes)
const MAX_CSS_LEN: usize = 16 * 1024;
/// 페이지 목록 최대 길이 (bytes)
const MAX_PAGE_IDS_LEN: usize = 1024;

/// 설정 저장 요청
///
/// `cookie_version`은 받지 않는다. 버전은 저장할 때마다 서버가 갱신한다.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    /// 팝업 전체 활성화
    pub enabled: bool,
    /// 팝업 본문 (저장 전 새니타이즈)
    pub html_content: String,
    /// 커스텀 CSS (저장 전 새니타이즈)
    pub custom_css: String,
    /// 쉼표 구분 페이지 식별자 목록 (빈 문자열 = 모든 페이지)
    pub page_ids: String,
}

/// 설정 응답
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// 팝업 전체 활성화
    pub enabled: bool,
    /// 저장된 팝업 본문
    pub html_content: String,
    /// 저장된 커스텀 CSS
    pub custom_css: String,
    /// 쉼표 구분 페이지 식별자 목록
    pub page_ids: String,
    /// 현재 쿠키 버전
    pub cookie_version: i64,
    /// 설정 파일 마지막 수정 시각
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsResponse {
    fn from_config(config: PopupConfig, updated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            enabled: config.enabled,
            html_content: config.html_content,
            custom_css: config.custom_css,
            page_ids: config.page_ids,
            cookie_version: config.cookie_version,
            updated_at,
        }
    }
}

/// 관리 토큰 검사
///
/// 토큰이 설정돼 있지 않으면 어떤 요청도 통과하지 못한다.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::Unauthorized(
            "관리 토큰이 설정되지 않았습니다".to_string(),
        ));
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized(
            "관리 토큰이 올바르지 않습니다".to_string(),
        )),
    }
}

/// 페이지 목록에서 숫자로 해석되지 않는 항목 수집
fn skipped_entries(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty() && chunk.parse::<u64>().is_err())
        .map(str::to_string)
        .collect()
}

/// GET /api/settings - 현재 설정 조회
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SettingsResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let config = state.config_manager.get()?;
    let updated_at = state.config_manager.last_modified();

    Ok(Json(SettingsResponse::from_config(config, updated_at)))
}

/// POST /api/settings - 설정 저장 (쿠키 버전 전진)
pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    require_admin(&state, &headers)?;

    // 유효성 검사
    if request.html_content.len() > MAX_HTML_LEN {
        return Err(ApiError::BadRequest(
            "본문은 64KB 이하여야 합니다".to_string(),
        ));
    }

    if request.custom_css.len() > MAX_CSS_LEN {
        return Err(ApiError::BadRequest(
            "커스텀 CSS는 16KB 이하여야 합니다".to_string(),
        ));
    }

    if request.page_ids.len() > MAX_PAGE_IDS_LEN {
        return Err(ApiError::BadRequest(
            "페이지 목록은 1KB 이하여야 합니다".to_string(),
        ));
    }

    // 숫자가 아닌 항목은 저장은 되지만 판정에서 무시된다
    let skipped = skipped_entries(&request.page_ids);
    if !skipped.is_empty() {
        warn!("페이지 목록에서 무시되는 항목: {skipped:?}");
    }

    // 저장 전 새니타이즈 — 렌더링 경로는 저장소를 신뢰한다
    let update = SettingsUpdate {
        enabled: request.enabled,
        html_content: state.sanitizer.sanitize_html(&request.html_content),
        custom_css: state.sanitizer.sanitize_css(&request.custom_css),
        page_ids: request.page_ids.trim().to_string(),
    };

    let config = state.config_manager.apply_settings(update)?;
    info!(version = config.cookie_version, "설정 저장, 새 캠페인 시작");

    let updated_at = state.config_manager.last_modified();
    Ok(Json(SettingsResponse::from_config(config, updated_at)))
}
