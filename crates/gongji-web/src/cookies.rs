//! 마커 쿠키 코덱.
//!
//! 요청의 Cookie 헤더에서 클라이언트 마커 집합을 읽고,
//! 마커 지시를 응답의 Set-Cookie 값으로 변환한다.

use axum::http::{header, HeaderMap};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use gongji_core::dismissal::{ClientMarkers, MarkerInstruction};

/// 요청 헤더에서 클라이언트 마커 집합 추출
///
/// 파싱할 수 없는 쿠키 조각은 건너뛴다. 마커는 이름만 본다.
pub fn client_markers(headers: &HeaderMap) -> ClientMarkers {
    let names = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .map(|cookie| cookie.name().to_string());

    ClientMarkers::from_names(names)
}

/// 마커 지시를 Set-Cookie 값으로 변환
///
/// 계약 속성(이름, 값, Max-Age, Path)에 SameSite=Lax를 더한다.
pub fn set_cookie_value(instruction: &MarkerInstruction) -> String {
    Cookie::build((instruction.name.clone(), instruction.value.clone()))
        .path(instruction.path.clone())
        .max_age(Duration::seconds(i64::from(instruction.max_age_secs)))
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}
