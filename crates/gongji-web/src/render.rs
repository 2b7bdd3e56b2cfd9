//! 팝업 프래그먼트 렌더링.
//!
//! 위젯이 페이지에 주입할 다이얼로그 마크업을 조립한다.
//! 본문은 저장 시 이미 새니타이즈된 값에 문단 포매팅만 적용된 상태로 받는다.

/// 닫기 버튼 아이콘 (인라인 SVG)
const CLOSE_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><path d="M3 3l10 10M13 3L3 13" stroke="currentColor" stroke-width="2" stroke-linecap="round"/></svg>"#;

/// 다이얼로그 프래그먼트 조립
pub fn popup_fragment(content_html: &str) -> String {
    format!(
        r#"<div class="gongji-popup" role="dialog" aria-modal="false" aria-label="공지">
  <button type="button" class="gongji-popup-close" aria-label="공지 닫기">{CLOSE_ICON}</button>
  <div class="gongji-popup-content">{content_html}</div>
</div>"#
    )
}
