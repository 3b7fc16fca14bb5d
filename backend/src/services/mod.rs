pub mod data_sources;
pub mod merge;
pub mod templates;

use crate::error::MergeError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use log::warn;
use serde::Serialize;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'a str>,
}

pub fn status_for(err: &MergeError) -> StatusCode {
    match err {
        MergeError::InvalidCsv(_)
        | MergeError::InvalidMapping(_)
        | MergeError::InvalidRequest(_)
        | MergeError::MissingRequiredField { .. } => StatusCode::BAD_REQUEST,
        MergeError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
        MergeError::Render { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MergeError::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a `MergeError` to its HTTP status and JSON body.
pub fn error_response(err: &MergeError) -> HttpResponse {
    let status = status_for(err);
    warn!("request failed with {}: {}", status.as_u16(), err);
    HttpResponse::build(status).json(ErrorBody {
        error: err.kind(),
        message: err.to_string(),
        row: err.row(),
        field: err.field(),
    })
}
