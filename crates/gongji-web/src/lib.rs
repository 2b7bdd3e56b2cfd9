//! # gongji-web
//!
//! 팝업 위젯/관리 API 서버.
//! Axum 기반 REST API + 임베드 정적 자산(위젯 스크립트, 관리 페이지).
//!
//! ## 기능
//! - 팝업 판정/내용 조회 (위젯용)
//! - 해제 마커 발급 (이중 채널의 서버 측 Set-Cookie)
//! - 설정 조회/저장 (관리 토큰 보호, 저장 시 쿠키 버전 전진)
//! - 정적 자산 서빙 (popup.js, popup.css, 관리 페이지)

pub mod cookies;
pub mod embedded;
pub mod error;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod sanitize;

use gongji_core::config::WebConfig;
use gongji_core::config_manager::ConfigManager;
use gongji_core::ports::sanitizer::ContentSanitizer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::sanitize::AmmoniaSanitizer;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 설정 관리자
    pub config_manager: ConfigManager,
    /// 콘텐츠 새니타이저 (저장 경로에서만 사용)
    pub sanitizer: Arc<dyn ContentSanitizer>,
    /// 관리 토큰 (None이면 설정 API 전체 거부)
    pub admin_token: Option<String>,
}

/// 팝업 위젯/관리 API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(config_manager: ConfigManager, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState {
                config_manager,
                sanitizer: Arc::new(AmmoniaSanitizer::new()),
                admin_token: None,
            },
        }
    }

    /// 관리 토큰 설정
    pub fn with_admin_token(mut self, token: String) -> Self {
        self.state.admin_token = Some(token);
        self
    }

    /// 새니타이저 교체
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn ContentSanitizer>) -> Self {
        self.state.sanitizer = sanitizer;
        self
    }

    /// 서버 실행
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도합니다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환합니다.
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    ///
    /// # Returns
    /// 성공 시 `Ok(())`, 모든 포트 바인드 실패 시 `Err`
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        // CORS 설정 — 위젯은 임의 오리진 페이지에 임베드될 수 있다
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // 라우터 구성
        let app = axum::Router::new()
            .nest("/api", routes::api_routes())
            .fallback(embedded::serve_static)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(self.state);

        // 포트 바인드 시도 (최대 MAX_PORT_ATTEMPTS번)
        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);

            // 포트 오버플로우 체크
            if port < base_port && attempt > 0 {
                break;
            }

            let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{} — {}", host, port, e);
                    continue; // 다음 포트 시도
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    // 기본 포트가 아닌 경우 경고 로그
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("팝업 서버 시작: http://{}", addr);

                    // Graceful shutdown과 함께 서버 실행
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("팝업 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    // AddrInUse 에러인 경우 다음 포트 시도
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                        last_error = Some(e);
                        continue;
                    }
                    // 다른 에러는 즉시 반환
                    return Err(e);
                }
            }
        }

        // 모든 시도 실패
        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gongji_core::config_manager::ConfigManager;
    use tempfile::TempDir;

    fn test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("popup.json")).unwrap()
    }

    #[test]
    fn default_config() {
        let config = WebConfig::default();
        assert_eq!(config.port, 9292);
        assert!(!config.allow_external);
    }

    #[test]
    fn web_server_url() {
        let temp_dir = TempDir::new().unwrap();
        let server = WebServer::new(test_manager(&temp_dir), WebConfig::default());
        assert_eq!(server.url(), "http://localhost:9292");
    }

    #[test]
    fn admin_token_is_off_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let server = WebServer::new(test_manager(&temp_dir), WebConfig::default());
        assert!(server.state.admin_token.is_none());

        let server = server.with_admin_token("secret".to_string());
        assert_eq!(server.state.admin_token.as_deref(), Some("secret"));
    }

    struct PassthroughSanitizer;

    impl ContentSanitizer for PassthroughSanitizer {
        fn sanitize_html(&self, input: &str) -> String {
            input.to_string()
        }

        fn sanitize_css(&self, input: &str) -> String {
            input.to_string()
        }
    }

    #[test]
    fn sanitizer_adapter_can_be_swapped() {
        let temp_dir = TempDir::new().unwrap();
        let server = WebServer::new(test_manager(&temp_dir), WebConfig::default())
            .with_sanitizer(Arc::new(PassthroughSanitizer));

        // 기본 ammonia 어댑터라면 script가 살아남을 수 없다
        let html = server.state.sanitizer.sanitize_html("<script>x</script>공지");
        assert_eq!(html, "<script>x</script>공지");
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn max_port_attempts_is_reasonable() {
        // 최소 1번, 최대 100번 사이
        assert!(MAX_PORT_ATTEMPTS >= 1);
        assert!(MAX_PORT_ATTEMPTS <= 100);
    }

    #[test]
    fn port_overflow_protection() {
        // u16::MAX 근처에서 시작해도 오버플로우가 발생하지 않아야 함
        let base_port: u16 = 65530;
        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);
            assert!(port >= base_port || port == u16::MAX);
        }
    }
}
