//! # CSV Preview Service
//!
//! `POST /api/data_sources/csv/preview[?template_id=...]` parses an uploaded
//! CSV without generating anything and reports what the mapping step needs:
//! the header, the row count, a type guess per column and, for a template,
//! a suggested column mapping.

use crate::config::ServerConfig;
use crate::error::MergeError;
use crate::services::data_sources::csv::parse::{infer_column_checks, parse_csv};
use crate::services::data_sources::csv::upload::read_parts;
use crate::services::error_response;
use crate::services::merge::mapping::suggest_mapping;
use crate::services::templates::get::get_template;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::csv::CsvPreview;
use common::model::template::TemplateId;
use common::requests::PreviewQuery;
use log::info;

pub async fn process(
    config: web::Data<ServerConfig>,
    query: web::Query<PreviewQuery>,
    payload: Multipart,
) -> impl Responder {
    match preview(payload, query.into_inner(), config.max_upload_bytes).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => error_response(&e),
    }
}

async fn preview(
    payload: Multipart,
    query: PreviewQuery,
    max_bytes: usize,
) -> Result<CsvPreview, MergeError> {
    let template = query
        .template_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(get_template)
        .transpose()?;
    let parts = read_parts(payload, max_bytes).await?;
    preview_csv(parts.require_file()?, template)
}

/// Builds the preview for `bytes`; a template adds a suggested mapping.
pub fn preview_csv(
    bytes: &[u8],
    template: Option<TemplateId>,
) -> Result<CsvPreview, MergeError> {
    let table = parse_csv(bytes)?;
    info!(
        "previewed CSV with {} column(s) and {} row(s)",
        table.headers.len(),
        table.rows.len()
    );
    Ok(CsvPreview {
        columns: infer_column_checks(&table)?,
        row_count: table.rows.len(),
        suggested_mapping: template.map(|t| suggest_mapping(t, &table.headers)),
        headers: table.headers,
    })
}
