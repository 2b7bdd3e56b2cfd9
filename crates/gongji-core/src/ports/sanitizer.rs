//! 콘텐츠 새니타이저 포트.
//!
//! 관리자가 입력한 HTML/CSS는 저장 전에 반드시 이 포트를 통과한다.
//! 렌더링 경로는 저장소의 값을 신뢰한다.
//!
//! 구현: `gongji-web` crate (ammonia)

/// 콘텐츠 새니타이저 인터페이스
pub trait ContentSanitizer: Send + Sync {
    /// 본문 HTML 새니타이즈 — 허용 목록 밖의 태그/속성 제거
    fn sanitize_html(&self, input: &str) -> String;

    /// 사용자 정의 CSS 새니타이즈 — 마크업으로 탈출할 수 있는 문자 제거
    fn sanitize_css(&self, input: &str) -> String;
}
