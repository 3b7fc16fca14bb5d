//! # Template Retrieval Service
//!
//! Backs `GET /api/templates` and `GET /api/templates/{template_id}`, and
//! resolves template identifiers for the merge pipeline. The catalogue is
//! fixed at compile time, so no storage is involved.

use crate::error::MergeError;
use crate::services::error_response;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::{FieldSpec, TemplateDefinition, TemplateId};

/// `GET /api/templates`: the whole catalogue, in declaration order.
pub async fn list() -> impl Responder {
    let templates: Vec<TemplateDefinition> =
        TemplateId::ALL.into_iter().map(TemplateDefinition::from).collect();
    HttpResponse::Ok().json(templates)
}

/// `GET /api/templates/{template_id}`.
///
/// - `200 OK` with the `TemplateDefinition` as JSON.
/// - `404 Not Found` with an error body for ids outside the catalogue.
pub async fn process(template_id: web::Path<String>) -> impl Responder {
    match get_template(&template_id) {
        Ok(template) => HttpResponse::Ok().json(TemplateDefinition::from(template)),
        Err(e) => error_response(&e),
    }
}

/// Looks `template_id` up in the catalogue.
pub fn get_template(template_id: &str) -> Result<TemplateId, MergeError> {
    Ok(template_id.parse::<TemplateId>()?)
}

/// Ordered field list of `template_id`.
pub fn get_template_fields(template_id: &str) -> Result<&'static [FieldSpec], MergeError> {
    get_template(template_id).map(TemplateId::fields)
}
