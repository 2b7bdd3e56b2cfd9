//! 문단 자동 포매팅.
//!
//! 저장된 본문을 렌더링 직전에 문단 HTML로 변환한다. 빈 줄로 구분된
//! 덩어리는 `<p>`로 감싸고, 덩어리 안의 줄바꿈은 `<br>`로 바꾼다.
//! 이미 블록 레벨 태그로 시작하는 덩어리는 손대지 않는다.

/// 문단 래핑을 건너뛰는 블록 레벨 태그
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "ul",
    "ol",
    "li",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "table",
    "figure",
    "hr",
    "section",
    "article",
];

/// 본문을 문단 단위 HTML로 변환
pub fn autop(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut blocks = Vec::new();
    for chunk in trimmed.split("\n\n") {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if starts_with_block_tag(chunk) {
            blocks.push(chunk.to_string());
        } else {
            blocks.push(format!("<p>{}</p>", chunk.replace('\n', "<br>\n")));
        }
    }

    blocks.join("\n")
}

/// 덩어리가 블록 레벨 태그로 시작하는지
fn starts_with_block_tag(chunk: &str) -> bool {
    let Some(rest) = chunk.strip_prefix('<') else {
        return false;
    };

    let tag: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    BLOCK_TAGS.contains(&tag.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_wrapped_in_paragraph() {
        assert_eq!(autop("점검 안내"), "<p>점검 안내</p>");
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        assert_eq!(autop("첫째\n\n둘째"), "<p>첫째</p>\n<p>둘째</p>");
    }

    #[test]
    fn single_newline_becomes_line_break() {
        assert_eq!(autop("첫 줄\n둘째 줄"), "<p>첫 줄<br>\n둘째 줄</p>");
    }

    #[test]
    fn block_tag_chunk_passes_through() {
        assert_eq!(autop("<p>이미 문단</p>"), "<p>이미 문단</p>");
        assert_eq!(
            autop("<ul><li>항목</li></ul>"),
            "<ul><li>항목</li></ul>"
        );
        assert_eq!(autop("<H2>제목</H2>"), "<H2>제목</H2>");
    }

    #[test]
    fn inline_tag_chunk_is_still_wrapped() {
        assert_eq!(
            autop("<strong>중요</strong> 공지"),
            "<p><strong>중요</strong> 공지</p>"
        );
    }

    #[test]
    fn mixed_blocks_and_text() {
        let input = "안내드립니다\n\n<ul><li>하나</li></ul>\n\n감사합니다";
        let expected = "<p>안내드립니다</p>\n<ul><li>하나</li></ul>\n<p>감사합니다</p>";
        assert_eq!(autop(input), expected);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(autop(""), "");
        assert_eq!(autop("  \n \n "), "");
    }

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(autop("첫째\r\n\r\n둘째"), "<p>첫째</p>\n<p>둘째</p>");
    }

    #[test]
    fn extra_blank_lines_do_not_create_empty_paragraphs() {
        assert_eq!(autop("첫째\n\n\n\n둘째"), "<p>첫째</p>\n<p>둘째</p>");
    }
}
