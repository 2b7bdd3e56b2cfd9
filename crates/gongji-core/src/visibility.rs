//! 페이지 노출 필터.
//!
//! 활성화 플래그와 페이지 허용 목록만으로 노출 여부를 판정하는 순수 함수.
//! 부수 효과 없음.

use crate::config::PopupConfig;

/// 현재 페이지에 팝업을 노출할 수 있는지 판정
///
/// - `enabled`가 꺼져 있으면 항상 false
/// - 허용 목록이 비어 있으면 모든 페이지에서 true
/// - 허용 목록이 있으면 현재 페이지가 목록에 있을 때만 true
pub fn is_visible(config: &PopupConfig, current_page: u64) -> bool {
    if !config.enabled {
        return false;
    }

    let allowed = config.allowed_page_ids();
    allowed.is_empty() || allowed.contains(&current_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, page_ids: &str) -> PopupConfig {
        PopupConfig {
            enabled,
            page_ids: page_ids.to_string(),
            ..PopupConfig::default()
        }
    }

    #[test]
    fn disabled_is_never_visible() {
        for page_ids in ["", "3,7", "1"] {
            let c = config(false, page_ids);
            for page in [0, 1, 3, 7, 999] {
                assert!(!is_visible(&c, page), "page_ids={page_ids} page={page}");
            }
        }
    }

    #[test]
    fn empty_allow_list_is_visible_everywhere() {
        let c = config(true, "");
        for page in [0, 1, 42, u64::MAX] {
            assert!(is_visible(&c, page));
        }
    }

    #[test]
    fn allow_list_restricts_to_members() {
        let c = config(true, "3,7");
        assert!(is_visible(&c, 3));
        assert!(is_visible(&c, 7));
        assert!(!is_visible(&c, 1));
        assert!(!is_visible(&c, 8));
    }

    #[test]
    fn malformed_entries_do_not_block_valid_ones() {
        let c = config(true, "3,oops,7");
        assert!(is_visible(&c, 3));
        assert!(is_visible(&c, 7));
        assert!(!is_visible(&c, 5));
    }

    #[test]
    fn allow_list_of_only_garbage_behaves_as_empty() {
        // 전부 건너뛰면 빈 집합 = 모든 페이지 허용
        let c = config(true, "abc,def");
        assert!(is_visible(&c, 1));
    }
}
