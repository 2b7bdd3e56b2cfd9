//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 팝업 (방문자용)
        .route("/popup", get(handlers::popup::get_popup))
        .route("/popup/dismiss", post(handlers::popup::dismiss_popup))
        // 설정 (관리자용)
        .route("/settings", get(handlers::settings::get_settings))
        .route("/settings", post(handlers::settings::update_settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::AmmoniaSanitizer;
    use crate::AppState;
    use gongji_core::config_manager::ConfigManager;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn routes_compile() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("popup.json")).unwrap();
        let state = AppState {
            config_manager: manager,
            sanitizer: Arc::new(AmmoniaSanitizer::new()),
            admin_token: None,
        };
        let _app: Router<()> = api_routes().with_state(state);
    }
}
