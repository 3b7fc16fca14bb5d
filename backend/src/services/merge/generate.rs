//! # Generate Service
//!
//! `POST /api/merge/generate` is the "Generate" action: a multipart upload
//! with a `json` part (`GenerateRequest`) and a `file` part (the CSV). The
//! response is the finished PDF or ZIP as an attachment.
//!
//! Parsing and rendering are CPU bound, so they run on tokio's blocking pool
//! through `spawn_blocking` and the server loop stays responsive.

use crate::config::ServerConfig;
use crate::error::MergeError;
use crate::services::data_sources::csv::parse::parse_csv;
use crate::services::data_sources::csv::upload::read_parts;
use crate::services::error_response;
use crate::services::merge::batch::{generate, GeneratedBatch};
use crate::services::templates::get::get_template;
use actix_multipart::Multipart;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse, Responder};
use common::requests::GenerateRequest;
use log::{error, info};

/// Comma-separated 1-based numbers of the rows left out under the skip policy.
pub const SKIPPED_ROWS_HEADER: &str = "X-Skipped-Rows";

pub async fn process(config: web::Data<ServerConfig>, payload: Multipart) -> impl Responder {
    let (request, csv) = match read_request(payload, config.max_upload_bytes).await {
        Ok(parts) => parts,
        Err(e) => return error_response(&e),
    };
    info!(
        "generating documents with template '{}' ({} byte CSV)",
        request.template_id,
        csv.len()
    );

    let result = tokio::task::spawn_blocking(move || generate_documents(&request, &csv)).await;
    match result {
        Ok(Ok(batch)) => attachment(batch),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            error!("generation task failed: {}", e);
            HttpResponse::InternalServerError().body("generation task failed")
        }
    }
}

async fn read_request(
    payload: Multipart,
    max_bytes: usize,
) -> Result<(GenerateRequest, Vec<u8>), MergeError> {
    let parts = read_parts(payload, max_bytes).await?;
    let request: GenerateRequest = serde_json::from_slice(parts.require_json()?)
        .map_err(|e| MergeError::InvalidRequest(format!("malformed 'json' part: {}", e)))?;
    let csv = parts.require_file()?.to_vec();
    Ok((request, csv))
}

/// Parses `csv` and runs the batch described by `request`.
///
/// The template id is checked before the CSV so an unknown template is
/// reported as such whatever the upload contains.
pub fn generate_documents(
    request: &GenerateRequest,
    csv: &[u8],
) -> Result<GeneratedBatch, MergeError> {
    get_template(&request.template_id)?;
    let table = parse_csv(csv)?;
    generate(
        &table.rows,
        &request.template_id,
        &request.mapping,
        &request.layout,
        request.on_row_error,
    )
}

/// `attachment` with an ASCII `filename` and, for non-ASCII names, a UTF-8
/// `filename*` that clients prefer over it.
pub fn attachment_disposition(file_name: &str) -> ContentDisposition {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let mut parameters = vec![DispositionParam::Filename(ascii)];
    if !file_name.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: file_name.as_bytes().to_vec(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

fn attachment(batch: GeneratedBatch) -> HttpResponse {
    let disposition = attachment_disposition(batch.file_name());
    let mut response = HttpResponse::Ok();
    response
        .content_type(batch.content_type())
        .insert_header(disposition);
    if !batch.skipped.is_empty() {
        let rows: Vec<String> = batch.skipped.iter().map(|f| f.row.to_string()).collect();
        response.insert_header((SKIPPED_ROWS_HEADER, rows.join(",")));
    }
    response.body(batch.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::mapping::ColumnMapping;
    use common::requests::RowErrorPolicy;

    fn request(template_id: &str, mapping: ColumnMapping) -> GenerateRequest {
        GenerateRequest {
            template_id: template_id.to_string(),
            mapping,
            layout: Default::default(),
            on_row_error: RowErrorPolicy::Abort,
        }
    }

    #[test]
    fn ascii_names_get_a_plain_filename() {
        let header = attachment_disposition("John_Doe_1.pdf").to_string();
        assert_eq!(header, "attachment; filename=\"John_Doe_1.pdf\"");
    }

    #[test]
    fn non_ascii_names_get_a_utf8_filename() {
        let disposition = attachment_disposition("Zoë_1.pdf");
        assert_eq!(disposition.get_filename(), Some("Zo__1.pdf"));
        let ext = disposition.get_filename_ext().unwrap();
        assert_eq!(ext.value, "Zoë_1.pdf".as_bytes());
        assert!(disposition.to_string().contains("filename*=UTF-8''Zo%C3%AB_1.pdf"));
    }

    #[test]
    fn unknown_template_wins_over_bad_csv() {
        let err = generate_documents(&request("nope", ColumnMapping::new()), b"").unwrap_err();
        assert_eq!(err.kind(), "unknown_template");
    }

    #[test]
    fn empty_csv_is_invalid() {
        let err = generate_documents(&request("simple", ColumnMapping::new()), b"").unwrap_err();
        assert_eq!(err.kind(), "invalid_csv");
    }

    #[test]
    fn header_only_csv_is_invalid() {
        let req = request("simple", ColumnMapping::new());
        let err = generate_documents(&req, b"Name,Email\n").unwrap_err();
        assert_eq!(err.kind(), "invalid_csv");
    }

    #[test]
    fn generates_a_single_pdf() {
        let batch = generate_documents(
            &request("simple", ColumnMapping::new().map("name", "Name")),
            b"Name\nAnn\n",
        )
        .unwrap();
        assert_eq!(batch.content_type(), "application/pdf");
        assert_eq!(batch.file_name(), "Ann_1.pdf");
    }
}
