//! 정적 파일 임베드 및 서빙.
//!
//! rust-embed를 사용하여 위젯 스크립트와 관리 페이지를 바이너리에 임베드.

use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::Embed;

/// 정적 자원 임베드
///
/// `static` 디렉토리의 위젯(popup.js, popup.css)과 관리 페이지를 포함
#[derive(Embed)]
#[folder = "static"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct Assets;

/// 정적 파일 서빙을 위한 fallback 핸들러
pub async fn serve_static(uri: Uri) -> Response {
    serve_static_impl(uri)
}

/// 정적 파일 서빙 구현
fn serve_static_impl(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    // 빈 경로는 index.html로
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();

            // Cache-Control 설정
            let cache_control = if path.ends_with(".html") {
                "no-cache"
            } else {
                "public, max-age=3600"
            };

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref()),
                    (header::CACHE_CONTROL, cache_control),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            // 알 수 없는 경로는 index.html로
            if let Some(index) = Assets::get("index.html") {
                Html(String::from_utf8_lossy(&index.data).to_string()).into_response()
            } else {
                // static 디렉토리 없이 빌드된 경우 안내
                (StatusCode::OK, Html(DEV_PLACEHOLDER.to_string())).into_response()
            }
        }
    }
}

/// 정적 자원 미포함 빌드에서 표시할 페이지
const DEV_PLACEHOLDER: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GONGJI</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            color: #e0e0e0;
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            text-align: center;
            padding: 40px;
            max-width: 600px;
        }
        h1 {
            font-size: 2.5rem;
            margin-bottom: 1rem;
            background: linear-gradient(90deg, #00d9ff, #00ff88);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }
        .subtitle {
            color: #888;
            margin-bottom: 2rem;
        }
        .status {
            background: rgba(255,255,255,0.05);
            border-radius: 12px;
            padding: 24px;
        }
        .status h2 {
            color: #00d9ff;
            margin-bottom: 1rem;
        }
        .api-list {
            text-align: left;
            list-style: none;
        }
        .api-list li {
            padding: 8px 0;
            border-bottom: 1px solid rgba(255,255,255,0.1);
        }
        .api-list code {
            background: rgba(0,217,255,0.1);
            padding: 2px 8px;
            border-radius: 4px;
            font-family: 'SF Mono', monospace;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>GONGJI</h1>
        <p class="subtitle">공지 팝업 서버</p>

        <div class="status">
            <h2>✅ API 서버 실행 중</h2>
            <ul class="api-list">
                <li><code>GET /api/popup?page=N</code> - 팝업 노출 판정</li>
                <li><code>POST /api/popup/dismiss</code> - 닫기 기록</li>
                <li><code>GET /api/settings</code> - 설정 조회</li>
                <li><code>POST /api/settings</code> - 설정 저장</li>
            </ul>
        </div>
    </div>
</body>
</html>"#;
