use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
