//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리에 팝업 설정을 JSON 파일로 저장/로드한다.
//! 변경은 [`ConfigManager::apply_settings`] 단일 진입점으로만 일어나며,
//! 저장할 때마다 쿠키 버전이 전진한다.

use crate::config::{PopupConfig, SettingsUpdate};
use crate::dismissal::bump_version;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "popup.json";

/// 앱 디렉토리 이름
const APP_DIR_NAME: &str = "gongji";

/// 설정 관리자
///
/// 팝업 설정의 로드/저장과 요청별 스냅샷 제공을 담당한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 현재 설정 (스레드 안전)
    config: Arc<RwLock<PopupConfig>>,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 새 설정 관리자 생성 및 설정 로드
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn new() -> Result<Self, CoreError> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// 지정된 경로로 설정 관리자 생성
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        // 설정 디렉토리 생성
        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        // 설정 파일 로드 또는 기본값 생성
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            // 첫 실행: 비활성 상태, 버전은 현재 시각으로 시작
            let default_config = bump_version(&PopupConfig::default(), Utc::now());
            Self::save_to_file(&config_path, &default_config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            default_config
        };

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// 현재 설정 스냅샷 반환 (복제본)
    ///
    /// 요청 처리 중에는 이 스냅샷만 사용한다. 저장소를 읽을 수 없으면
    /// `ConfigUnavailable`이며, 호출측은 팝업을 숨긴다.
    pub fn get(&self) -> Result<PopupConfig, CoreError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| CoreError::ConfigUnavailable("설정 잠금 오염".to_string()))
    }

    /// 설정 저장 단일 진입점
    ///
    /// 4개 필드를 적용하고 쿠키 버전을 전진시킨 뒤 파일에 먼저 저장한다.
    /// 파일 저장이 실패하면 메모리 상태는 바뀌지 않는다.
    /// 저장된 새 설정을 반환한다.
    pub fn apply_settings(&self, update: SettingsUpdate) -> Result<PopupConfig, CoreError> {
        let current = self.get()?;
        let mut next = bump_version(&current, Utc::now());
        next.enabled = update.enabled;
        next.html_content = update.html_content;
        next.custom_css = update.custom_css;
        next.page_ids = update.page_ids;

        Self::save_to_file(&self.config_path, &next)?;
        {
            let mut config = self
                .config
                .write()
                .map_err(|_| CoreError::ConfigUnavailable("설정 잠금 오염".to_string()))?;
            *config = next.clone();
        }

        debug!(
            "설정 저장 완료: version={} path={}",
            next.cookie_version,
            self.config_path.display()
        );
        Ok(next)
    }

    /// 설정 다시 로드
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = Self::load_from_file(&self.config_path)?;
        let mut current = self
            .config
            .write()
            .map_err(|_| CoreError::ConfigUnavailable("설정 잠금 오염".to_string()))?;
        *current = config;
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// 설정 파일 마지막 수정 시각
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.config_path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::from)
    }

    /// 플랫폼별 기본 설정 파일 경로
    fn default_config_path() -> Result<PathBuf, CoreError> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// 플랫폼별 설정 디렉토리 경로
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        #[cfg(target_os = "macos")]
        {
            // macOS: ~/Library/Application Support/gongji/
            let home = std::env::var("HOME")
                .map_err(|_| CoreError::Config("HOME 환경 변수를 찾을 수 없습니다".to_string()))?;
            Ok(PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR_NAME))
        }

        #[cfg(target_os = "windows")]
        {
            // Windows: %APPDATA%\gongji\
            let appdata = std::env::var("APPDATA").map_err(|_| {
                CoreError::Config("APPDATA 환경 변수를 찾을 수 없습니다".to_string())
            })?;
            Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
        }

        #[cfg(target_os = "linux")]
        {
            // Linux: ~/.config/gongji/
            let home = std::env::var("HOME")
                .map_err(|_| CoreError::Config("HOME 환경 변수를 찾을 수 없습니다".to_string()))?;
            Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            // 기타 플랫폼: 현재 디렉토리
            Ok(PathBuf::from(".").join(APP_DIR_NAME))
        }
    }

    /// 파일에서 설정 로드 (읽기 경로 실패는 ConfigUnavailable)
    fn load_from_file(path: &PathBuf) -> Result<PopupConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigUnavailable(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: PopupConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::ConfigUnavailable(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 파일에 설정 저장
    fn save_to_file(path: &PathBuf, config: &PopupConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsUpdate;
    use tempfile::TempDir;

    fn update(enabled: bool, page_ids: &str) -> SettingsUpdate {
        SettingsUpdate {
            enabled,
            html_content: "<p>업데이트된 공지</p>".to_string(),
            custom_css: ".gongji-popup { color: red; }".to_string(),
            page_ids: page_ids.to_string(),
        }
    }

    #[test]
    fn create_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        // 새 관리자 생성 (기본 설정 파일 생성됨)
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());

        let config = manager.get().unwrap();
        assert!(!config.enabled);
        // 첫 실행 버전은 0이 아니라 현재 시각
        assert!(config.cookie_version > 0);
    }

    #[test]
    fn seeded_file_is_loaded_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        let seeded = PopupConfig {
            enabled: true,
            html_content: "<p>시드</p>".to_string(),
            custom_css: String::new(),
            page_ids: "3,7".to_string(),
            cookie_version: 100,
        };
        fs::write(
            &config_path,
            serde_json::to_string_pretty(&seeded).unwrap(),
        )
        .unwrap();

        let manager = ConfigManager::with_path(config_path).unwrap();
        assert_eq!(manager.get().unwrap(), seeded);
    }

    #[test]
    fn apply_settings_persists_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        manager.apply_settings(update(true, "3, 7")).unwrap();

        // 새 관리자로 다시 로드
        let manager2 = ConfigManager::with_path(config_path).unwrap();
        let config = manager2.get().unwrap();

        assert!(config.enabled);
        assert_eq!(config.html_content, "<p>업데이트된 공지</p>");
        assert_eq!(config.page_ids, "3, 7");
    }

    #[test]
    fn every_save_advances_version() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        let manager = ConfigManager::with_path(config_path).unwrap();
        let v0 = manager.get().unwrap().cookie_version;

        let v1 = manager
            .apply_settings(update(true, ""))
            .unwrap()
            .cookie_version;
        let v2 = manager
            .apply_settings(update(true, ""))
            .unwrap()
            .cookie_version;

        // 같은 초 안에서 연속 저장해도 엄격히 증가한다
        assert!(v1 > v0);
        assert!(v2 > v1);
    }

    #[test]
    fn apply_settings_never_takes_version_from_input() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        // 버전 100으로 시드
        let seeded = PopupConfig {
            cookie_version: 100,
            ..PopupConfig::default()
        };
        fs::write(
            &config_path,
            serde_json::to_string_pretty(&seeded).unwrap(),
        )
        .unwrap();

        let manager = ConfigManager::with_path(config_path).unwrap();
        let saved = manager.apply_settings(update(false, "")).unwrap();

        assert_ne!(saved.cookie_version, 100);
        assert!(saved.cookie_version > 100);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        // 파일 직접 수정
        let mut config = manager.get().unwrap();
        config.page_ids = "42".to_string();
        fs::write(
            &config_path,
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.get().unwrap().page_ids, "42");
    }

    #[test]
    fn corrupt_file_is_config_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");
        fs::write(&config_path, "{ 이건 JSON이 아님").unwrap();

        let result = ConfigManager::with_path(config_path);
        assert!(matches!(
            result,
            Err(CoreError::ConfigUnavailable(_))
        ));
    }

    #[test]
    fn last_modified_is_present_after_save() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("popup.json");

        let manager = ConfigManager::with_path(config_path).unwrap();
        assert!(manager.last_modified().is_some());
    }

    #[test]
    fn config_dir_resolves() {
        assert!(ConfigManager::config_dir().is_ok());
    }
}
