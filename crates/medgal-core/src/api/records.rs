//! Medical-record endpoints: upload, search, preview, download.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::{ApiClient, ApiError, ApiResult};
use crate::types::{RecordSummary, RecordType};

/// Fields for a record upload. Validation happens in the auth/view layer;
/// by the time this is constructed the file bytes are already in memory.
#[derive(Debug)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub patient_access_code: String,
    pub record_type: RecordType,
    pub notes: String,
    pub hospital_id: u64,
}

impl ApiClient {
    /// Uploads a record on behalf of a patient (hospital portal).
    /// Returns the server's acknowledgement message, if any.
    pub async fn upload_record(&self, request: UploadRequest) -> ApiResult<Option<String>> {
        let file_part = Part::bytes(request.file_bytes).file_name(request.file_name);
        let form = Form::new()
            .part("file", file_part)
            .text("patientAccessCode", request.patient_access_code)
            .text("recordType", request.record_type.id())
            .text("notes", request.notes)
            .text("hospitalId", request.hospital_id.to_string());

        self.post_multipart("/records/upload", form).await
    }

    /// Full-text record search. `hospital_scope` narrows results to one
    /// hospital's uploads; patients filter client-side instead.
    pub async fn search_records(
        &self,
        query: &str,
        hospital_scope: Option<u64>,
    ) -> ApiResult<Vec<RecordSummary>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ApiError::validation("Enter a search term first."));
        }
        let encoded: String = url::form_urlencoded::byte_serialize(trimmed.as_bytes()).collect();
        let path = match hospital_scope {
            Some(hospital_id) => format!("/records/search?q={encoded}&hospitalId={hospital_id}"),
            None => format!("/records/search?q={encoded}"),
        };
        self.get_json(&path).await
    }

    /// Fetches a record's binary content for an inline preview.
    pub async fn preview_record(&self, record_id: u64) -> ApiResult<Bytes> {
        self.get_bytes(&format!("/records/{record_id}/preview")).await
    }

    /// Fetches a record's binary content for download.
    pub async fn download_record(&self, record_id: u64) -> ApiResult<Bytes> {
        self.get_bytes(&format!("/records/{record_id}/download")).await
    }
}
