//! # gongji-app
//!
//! GONGJI 서버 바이너리 진입점.
//! CLI 파싱, 설정 관리자/웹 서버 와이어링, 라이프사이클 관리.

mod lifecycle;

use anyhow::Result;
use clap::Parser;
use gongji_core::config::WebConfig;
use gongji_core::config_manager::ConfigManager;
use gongji_web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// GONGJI 공지 팝업 서버
///
/// 스크립트 한 줄로 임베드하는 자가 호스팅 공지 팝업
#[derive(Parser, Debug)]
#[command(name = "gongji")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 웹 서버 포트 (기본: 9292, 사용 중이면 다음 포트 시도)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 외부 접근 허용 (0.0.0.0 바인드, 기본: 127.0.0.1)
    #[arg(long)]
    allow_external: bool,

    /// 설정 저장 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long)]
    data_dir: Option<String>,

    /// 관리 토큰 (환경변수 GONGJI_ADMIN_TOKEN으로도 지정 가능)
    #[arg(long)]
    admin_token: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 배너 출력
fn print_banner() {
    println!();
    println!("╔══════════════════════════════════════════╗");
    println!("║   GONGJI — 공지 팝업 서버                 ║");
    println!("║   한 줄 임베드, 버전 쿠키로 닫기 관리       ║");
    println!("╚══════════════════════════════════════════╝");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화 (RUST_LOG가 있으면 그쪽 우선)
    let log_filter = format!(
        "gongji={0},gongji_app={0},gongji_core={0},gongji_web={0},tower_http={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    print_banner();
    info!("GONGJI 서버 시작");

    // 설정 저장소
    let config_manager = match args.data_dir.as_deref() {
        Some(dir) => ConfigManager::with_path(PathBuf::from(dir).join("popup.json"))?,
        None => ConfigManager::new()?,
    };
    info!("설정 파일: {:?}", config_manager.config_path());

    // 관리 토큰 (CLI 인자 우선, 없으면 환경변수)
    let admin_token = args
        .admin_token
        .or_else(|| std::env::var("GONGJI_ADMIN_TOKEN").ok());
    if admin_token.is_none() {
        warn!("관리 토큰 미설정 — 설정 API가 모든 요청을 거부합니다");
        warn!("--admin-token <토큰> 또는 GONGJI_ADMIN_TOKEN으로 지정하세요");
    }

    // 웹 서버 설정 (CLI 인자로 오버라이드)
    let mut web_config = WebConfig::default();
    if let Some(port) = args.port {
        web_config.port = port;
    }
    web_config.allow_external = args.allow_external;

    let mut server = WebServer::new(config_manager, web_config);
    if let Some(token) = admin_token {
        server = server.with_admin_token(token);
    }
    info!("관리 페이지: {}/admin.html", server.url());

    // OS 시그널 → 종료 신호
    let lifecycle = Arc::new(LifecycleManager::new());
    let shutdown_rx = lifecycle.subscribe();

    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    server.run(shutdown_rx).await?;

    info!("GONGJI 서버 종료");
    Ok(())
}
