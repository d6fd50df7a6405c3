pub mod generation;
pub mod genre;
pub mod health;
pub mod session;
pub mod voice;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
};

/// 200 response carrying a WAV body
pub(crate) fn wav_response(audio: Vec<u8>) -> (StatusCode, HeaderMap, Body) {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("private, no-store"));
    (StatusCode::OK, headers, Body::from(audio))
}
