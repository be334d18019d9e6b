use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use backend_application::AppError;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Failure of one of the public actions, always reported as a 500.
    #[error(transparent)]
    Action(#[from] AppError),
    /// Failure of an operator route, with a status derived from the kind.
    #[error(transparent)]
    Query(AppError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, kind) = match &self {
            HttpError::Action(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.kind()),
            HttpError::Query(err) => {
                let status = match err {
                    AppError::NotFound(_) => StatusCode::NOT_FOUND,
                    AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind())
            }
            HttpError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        };
        (status, Json(ErrorBody { error: message, kind })).into_response()
    }
}
