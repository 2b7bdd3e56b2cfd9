//! 해제(dismissal) 마커 버저닝.
//!
//! 마커 이름은 쿠키 버전으로 결정된다(`dismissed_<version>`). 설정을
//! 저장할 때마다 버전이 전진하므로, 기존에 발급된 마커는 이름이 더 이상
//! 일치하지 않게 되어 일괄 무효화된다. 개별 마커 회수는 없다.

use crate::config::PopupConfig;
use crate::visibility::is_visible;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 마커 이름 접두사
const MARKER_PREFIX: &str = "dismissed_";

/// 마커 값 — 존재 여부만 의미를 가진다
pub const MARKER_VALUE: &str = "1";

/// 마커 수명: 3일 (초)
pub const MARKER_TTL_SECS: u32 = 259_200;

/// 마커 경로 범위: 사이트 전체
pub const MARKER_PATH: &str = "/";

/// 버전 `version`의 마커 이름
pub fn marker_name(version: i64) -> String {
    format!("{MARKER_PREFIX}{version}")
}

// ============================================================
// 마커 지시
// ============================================================

/// 클라이언트에 내릴 마커 설정 지시
///
/// 해제 상호작용 시 클라이언트가 즉시 설정하고, 해제 엔드포인트 응답의
/// Set-Cookie로도 중복 발급한다. 같은 마커를 두 번 설정해도 상태는
/// 한 번 설정한 것과 같다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerInstruction {
    /// 마커 이름 (`dismissed_<version>`)
    pub name: String,
    /// 마커 값
    pub value: String,
    /// 수명 (초)
    pub max_age_secs: u32,
    /// 경로 범위
    pub path: String,
}

/// 버전 `version`에 대한 해제 마커 지시 생성
pub fn record_dismissal(version: i64) -> MarkerInstruction {
    MarkerInstruction {
        name: marker_name(version),
        value: MARKER_VALUE.to_string(),
        max_age_secs: MARKER_TTL_SECS,
        path: MARKER_PATH.to_string(),
    }
}

// ============================================================
// 클라이언트 마커 집합
// ============================================================

/// 클라이언트가 보유한 마커 이름 집합
///
/// 값은 보지 않는다. 이름의 존재만이 해제 상태를 나타낸다.
#[derive(Debug, Clone, Default)]
pub struct ClientMarkers {
    names: HashSet<String>,
}

impl ClientMarkers {
    /// 마커 이름 목록에서 생성
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// 마커 추가 (이미 있으면 변화 없음)
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// 버전 `version`의 마커 보유 여부
    pub fn has_version(&self, version: i64) -> bool {
        self.names.contains(&marker_name(version))
    }

    /// 보유 마커 수
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// 보유 마커가 없는지
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================
// 판정 / 버전 전진
// ============================================================

/// 이번 페이지 뷰에서 팝업을 렌더링해야 하는지 판정
///
/// 노출 필터를 통과하고, 현재 버전의 마커가 없을 때만 true.
/// 마커는 버전이 현재 버전과 정확히 일치할 때만 해제로 인정한다.
/// 과거 버전이든 미래 버전이든 불일치 마커는 없는 것으로 취급한다.
pub fn should_render(config: &PopupConfig, current_page: u64, markers: &ClientMarkers) -> bool {
    is_visible(config, current_page) && !markers.has_version(config.cookie_version)
}

/// 설정 저장 시 쿠키 버전 전진
///
/// 현재 유닉스 시각과 `이전 버전 + 1` 중 큰 값을 취한다.
/// 같은 초 안에 연속 저장해도 버전은 엄격히 증가한다.
pub fn bump_version(config: &PopupConfig, now: DateTime<Utc>) -> PopupConfig {
    let mut next = config.clone();
    next.cookie_version = now.timestamp().max(config.cookie_version.saturating_add(1));
    next
}
