//! 팝업/웹 설정 구조체.
//!
//! 설정 저장소가 관리하는 5개 키(enabled, html_content, custom_css,
//! page_ids, cookie_version)와 웹 서버 런타임 설정을 정의한다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================
// 팝업 설정
// ============================================================

/// 팝업 설정 — 설정 저장소의 단일 레코드
///
/// 요청 처리 중에는 이 스냅샷을 불변으로 취급한다. 변경은
/// [`crate::config_manager::ConfigManager::apply_settings`] 단일 진입점을
/// 통해서만 일어나며, 그때마다 `cookie_version`이 전진하여 이전 버전으로
/// 발급된 해제 마커 전체가 무효화된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupConfig {
    /// 팝업 전체 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// 팝업 본문 HTML (저장 시 새니타이즈 완료 상태)
    #[serde(default = "default_html_content")]
    pub html_content: String,
    /// 사용자 정의 CSS (기본 스타일시트 뒤에 주입)
    #[serde(default = "default_custom_css")]
    pub custom_css: String,
    /// 노출 대상 페이지 ID 목록 (쉼표 구분, 빈 문자열 = 모든 페이지)
    #[serde(default)]
    pub page_ids: String,
    /// 쿠키 버전 — 해제 마커의 이름공간
    #[serde(default)]
    pub cookie_version: i64,
}

impl PopupConfig {
    /// 허용 페이지 ID 집합
    ///
    /// 빈 집합은 "모든 페이지 허용"을 뜻한다.
    pub fn allowed_page_ids(&self) -> BTreeSet<u64> {
        parse_page_ids(&self.page_ids)
    }
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            html_content: default_html_content(),
            custom_css: default_custom_css(),
            page_ids: String::new(),
            cookie_version: 0,
        }
    }
}

fn default_html_content() -> String {
    "<p>새로운 공지가 있습니다.</p>".to_string()
}

fn default_custom_css() -> String {
    ".gongji-popup-content { line-height: 1.6; }".to_string()
}

/// 쉼표 구분 문자열에서 페이지 ID 집합 파싱
///
/// 항목 양쪽 공백은 무시한다. 숫자로 해석되지 않는 항목은 건너뛴다.
pub fn parse_page_ids(raw: &str) -> BTreeSet<u64> {
    raw.split(',')
        .filter_map(|entry| entry.trim().parse::<u64>().ok())
        .collect()
}

// ============================================================
// 설정 저장 입력
// ============================================================

/// 설정 저장 입력 — `cookie_version`을 제외한 4개 필드
///
/// `cookie_version`은 입력받지 않는다. 저장 시마다
/// [`crate::dismissal::bump_version`]이 덮어쓴다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// 팝업 전체 활성화 여부
    pub enabled: bool,
    /// 팝업 본문 HTML
    pub html_content: String,
    /// 사용자 정의 CSS
    pub custom_css: String,
    /// 노출 대상 페이지 ID 목록 (쉼표 구분)
    pub page_ids: String,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 9292)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_web_port() -> u16 {
    9292
}
