//! # Template Service Module
//!
//! Routes under `/api/templates` and the PDF side of the merge: the fixed
//! template catalogue, font metrics and the Row Renderer.
//!
//! ## Sub-modules:
//! - `get`: catalogue lookups and the template endpoints.
//! - `pdf`: renders one data row into a one-page PDF.
//! - `fonts`: Helvetica metrics and WinAnsi encoding used by `pdf`.

mod fonts;
pub mod get;
pub mod pdf;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**: `get::list`, every template with its ordered field list.
/// *   **`GET /{template_id}`**: `get::process`, a single template or `404`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::list))
        .route("/{template_id}", get().to(get::process))
}
