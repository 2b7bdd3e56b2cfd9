//! API 핸들러 모듈.

pub mod popup;
pub mod settings;
