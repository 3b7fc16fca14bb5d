//! # Merge Service Module
//!
//! The merge pipeline and its endpoint.
//!
//! ## Sub-modules:
//! - `mapping`: validates and suggests field to column mappings.
//! - `batch`: the Batch Orchestrator, rows in, PDF or ZIP out.
//! - `archive`: entry naming and ZIP packaging.
//! - `generate`: `POST /api/merge/generate`.

pub mod archive;
pub mod batch;
pub mod generate;
pub mod mapping;

use actix_web::web;

const API_PATH: &str = "/api/merge";

/// Configures and returns the Actix `Scope` for all merge-related routes.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).route("/generate", web::post().to(generate::process))
}
