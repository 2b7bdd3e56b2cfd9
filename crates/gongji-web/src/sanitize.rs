//! 콘텐츠 새니타이저 어댑터.
//!
//! [`ContentSanitizer`] 포트의 ammonia 기반 구현. 저장 경로에서만 쓰이고,
//! 렌더링 경로는 저장소의 값을 신뢰한다.

use ammonia::Builder;
use gongji_core::ports::sanitizer::ContentSanitizer;

/// ammonia 기반 새니타이저
///
/// 허용 목록은 ammonia 기본값에 `style` 속성을 더한 것.
/// 스크립트, 이벤트 핸들러 속성, 주석은 제거된다.
pub struct AmmoniaSanitizer {
    cleaner: Builder<'static>,
}

impl AmmoniaSanitizer {
    /// 기본 허용 목록으로 생성
    pub fn new() -> Self {
        let mut cleaner = Builder::default();
        cleaner.add_generic_attributes(["style"]);
        Self { cleaner }
    }
}

impl Default for AmmoniaSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSanitizer for AmmoniaSanitizer {
    fn sanitize_html(&self, input: &str) -> String {
        self.cleaner.clean(input).to_string()
    }

    fn sanitize_css(&self, input: &str) -> String {
        sanitize_css_text(input)
    }
}

/// CSS에서 마크업으로 탈출할 수 있는 문자 제거
///
/// `<`는 유효한 CSS에 나타나지 않으므로 전부 제거한다 (`</style>` 차단).
/// 자식 선택자의 `>`는 유지한다. 제어 문자는 탭/줄바꿈만 남긴다.
pub fn sanitize_css_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '<' && (!c.is_control() || matches!(c, '\n' | '\t' | '\r')))
        .collect()
}
