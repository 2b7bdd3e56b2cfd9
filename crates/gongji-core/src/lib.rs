//! # gongji-core
//!
//! GONGJI 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 팝업 노출 판정과 해제(dismissal) 버저닝의 순수 로직을 제공한다.
//!
//! ## 구조
//!
//! - [`config`] — 팝업/웹 설정 구조체 (serde Serialize/Deserialize)
//! - [`config_manager`] — 설정 파일 관리 (로드/저장, 저장 시 버전 전진)
//! - [`visibility`] — 페이지 노출 필터
//! - [`dismissal`] — 해제 마커 버저닝
//! - [`content`] — 문단 자동 포매팅
//! - [`ports`] — 새니타이저 포트 인터페이스
//! - [`error`] — 핵심 에러 타입 (thiserror)

pub mod config;
pub mod config_manager;
pub mod content;
pub mod dismissal;
pub mod error;
pub mod ports;
pub mod visibility;

#[cfg(test)]
mod tests {
    use crate::config::{PopupConfig, WebConfig};

    #[test]
    fn popup_config_serde_roundtrip() {
        let config = PopupConfig {
            enabled: true,
            html_content: "<p>점검 안내</p>".to_string(),
            custom_css: ".gongji-popup { border: 0; }".to_string(),
            page_ids: "3,7".to_string(),
            cookie_version: 1_700_000_000,
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PopupConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, config);
        assert_eq!(deserialized.cookie_version, 1_700_000_000);
    }

    #[test]
    fn popup_config_has_exactly_five_keys() {
        // 설정 저장소 파일 포맷: 5개 키 고정
        let value = serde_json::to_value(PopupConfig::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        for key in [
            "enabled",
            "html_content",
            "custom_css",
            "page_ids",
            "cookie_version",
        ] {
            assert!(object.contains_key(key), "누락된 키: {key}");
        }
    }

    #[test]
    fn config_defaults() {
        let popup = PopupConfig::default();
        assert!(!popup.enabled);
        assert!(popup.html_content.contains("공지"));
        assert!(popup.page_ids.is_empty());
        assert_eq!(popup.cookie_version, 0);

        let web = WebConfig::default();
        assert_eq!(web.port, 9292);
        assert!(!web.allow_external);
    }
}
