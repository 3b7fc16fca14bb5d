//! CSV data sources: parsing, multipart upload reading and the preview endpoint.
//!
//! The provided routes are:
//! - `POST /api/data_sources/csv/preview`: multipart upload with a `file` part.
//!   Returns the header, the row count and an inferred type per column. With
//!   `?template_id=...` it also returns a suggested mapping for that template.

use actix_web::web::{post, scope};
use actix_web::Scope;

pub mod parse;
mod preview;
pub mod upload;

const API_PATH: &str = "/api/data_sources/csv";

/// Configures and returns the Actix scope for CSV data source routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/preview", post().to(preview::process))
}
