//! 팝업 API 핸들러.
//!
//! 방문자용 엔드포인트. 어떤 실패도 호스트 페이지를 깨뜨리면 안 되므로
//! 조회는 항상 200을 반환하고, 실패 시 팝업을 숨긴다 (fail closed).

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gongji_core::config::PopupConfig;
use gongji_core::content::autop;
use gongji_core::dismissal::{record_dismissal, should_render, ClientMarkers, MarkerInstruction};
use gongji_core::error::CoreError;

use crate::error::ApiError;
use crate::{cookies, render, AppState};

/// 팝업 조회 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct PopupQuery {
    /// 현재 페이지 식별자 (없거나 숫자가 아니면 0)
    pub page: Option<String>,
}

impl PopupQuery {
    /// 기본값이 적용된 페이지 식별자
    ///
    /// 위젯이 잘못된 값을 보내도 400을 내지 않는다.
    pub fn current_page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// 팝업 조회 응답
///
/// 숨김이면 `{"visible": false}` 하나로 끝난다. 노출이면 버전, 렌더링된
/// 조각, 커스텀 CSS, 닫기 시 심을 마커 사양을 함께 내려준다.
#[derive(Debug, Serialize)]
pub struct PopupResponse {
    /// 이번 조회에서 팝업을 띄울지
    pub visible: bool,
    /// 현재 쿠키 버전 (노출 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_version: Option<i64>,
    /// 렌더링된 팝업 조각 (노출 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// 관리자가 저장한 커스텀 CSS (노출 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    /// 닫기 시 설정할 마커 (노출 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerInstruction>,
}

impl PopupResponse {
    /// 숨김 응답
    pub fn hidden() -> Self {
        Self {
            visible: false,
            cookie_version: None,
            html: None,
            css: None,
            marker: None,
        }
    }
}

/// 닫기 응답
#[derive(Debug, Serialize)]
pub struct DismissResponse {
    /// 항상 true — 닫기는 실패 개념이 없다
    pub success: bool,
    /// 서버가 심은 마커 사양
    pub marker: MarkerInstruction,
}

/// 설정 스냅샷과 요청 정보로 조회 응답 결정
///
/// 저장소가 스냅샷을 내주지 못하면 숨김으로 답한다 (fail closed).
fn decide_popup(
    config: Result<PopupConfig, CoreError>,
    page: u64,
    markers: &ClientMarkers,
) -> PopupResponse {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            warn!("설정 조회 실패, 팝업 숨김: {e}");
            return PopupResponse::hidden();
        }
    };

    if !should_render(&config, page, markers) {
        debug!(page, version = config.cookie_version, "팝업 숨김");
        return PopupResponse::hidden();
    }

    let html = render::popup_fragment(&autop(&config.html_content));
    PopupResponse {
        visible: true,
        cookie_version: Some(config.cookie_version),
        html: Some(html),
        css: Some(config.custom_css),
        marker: Some(record_dismissal(config.cookie_version)),
    }
}

/// GET /api/popup - 팝업 노출 판정 및 전달
///
/// 쿼리 추출 실패(중복 파라미터 등)도 400 대신 페이지 0으로 처리한다.
pub async fn get_popup(
    State(state): State<AppState>,
    query: Result<Query<PopupQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Json<PopupResponse> {
    let page = match query {
        Ok(Query(query)) => query.current_page(),
        Err(e) => {
            debug!("페이지 파라미터 해석 불가, 0으로 처리: {e}");
            0
        }
    };

    let markers = cookies::client_markers(&headers);
    Json(decide_popup(state.config_manager.get(), page, &markers))
}

/// POST /api/popup/dismiss - 닫기 기록 (멱등)
pub async fn dismiss_popup(State(state): State<AppState>) -> Result<Response, ApiError> {
    let config = state.config_manager.get()?;
    let marker = record_dismissal(config.cookie_version);
    let cookie = cookies::set_cookie_value(&marker);

    debug!(version = config.cookie_version, "닫기 기록");

    let mut response = Json(DismissResponse {
        success: true,
        marker,
    })
    .into_response();

    // 헤더 생성 실패는 재노출로만 이어진다. 응답은 성공으로 유지한다.
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => {
            warn!("마커 Set-Cookie 생성 실패, 다음 조회에서 재노출: {e}");
        }
    }

    Ok(response)
}
