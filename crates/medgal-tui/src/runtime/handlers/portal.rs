//! Dashboard effect handlers: fetches, uploads, preview/download I/O.

use std::path::PathBuf;

use medgal_core::api::{ApiClient, ApiError, ApiResult};
use medgal_core::types::RecordType;
use tokio_util::sync::CancellationToken;

use crate::events::{HospitalUiEvent, PatientUiEvent, UiEvent};
use crate::overlays::PreviewHandle;

pub async fn patient_stats(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Patient(PatientUiEvent::StatsLoaded(api.patient_stats(user_id).await))
}

pub async fn patient_records(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Patient(PatientUiEvent::RecordsLoaded(
        api.patient_records(user_id).await,
    ))
}

pub async fn hospital_stats(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Hospital(HospitalUiEvent::StatsLoaded(
        api.hospital_stats(user_id).await,
    ))
}

pub async fn hospital_records(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Hospital(HospitalUiEvent::RecordsLoaded(
        api.hospital_records(user_id).await,
    ))
}

pub async fn hospital_patients(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Hospital(HospitalUiEvent::PatientsLoaded(
        api.hospital_patients(user_id).await,
    ))
}

/// Record search. The hospital scope decides which dashboard the results
/// belong to.
pub async fn search_records(
    api: ApiClient,
    query: String,
    hospital_scope: Option<u64>,
) -> UiEvent {
    let result = api.search_records(&query, hospital_scope).await;
    match hospital_scope {
        Some(_) => UiEvent::Hospital(HospitalUiEvent::SearchLoaded(result)),
        None => UiEvent::Patient(PatientUiEvent::SearchLoaded(result)),
    }
}

/// Reads the file and uploads it. A missing or unreadable file is reported
/// as a validation failure; no request is constructed for it.
pub async fn upload_record(
    api: ApiClient,
    file_path: PathBuf,
    patient_access_code: String,
    record_type: RecordType,
    notes: String,
    hospital_id: u64,
) -> UiEvent {
    let result = read_and_upload(
        api,
        file_path,
        patient_access_code,
        record_type,
        notes,
        hospital_id,
    )
    .await;
    UiEvent::Hospital(HospitalUiEvent::Uploaded(result))
}

async fn read_and_upload(
    api: ApiClient,
    file_path: PathBuf,
    patient_access_code: String,
    record_type: RecordType,
    notes: String,
    hospital_id: u64,
) -> ApiResult<Option<String>> {
    let display_path = file_path.display().to_string();
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record.bin")
        .to_string();

    let file_bytes = tokio::task::spawn_blocking(move || std::fs::read(&file_path))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "file read task failed");
            ApiError::validation("Could not read the file.")
        })?
        .map_err(|e| ApiError::validation(format!("Cannot read {display_path}: {e}")))?;

    api.upload_record(medgal_core::api::UploadRequest {
        file_name,
        file_bytes,
        patient_access_code,
        record_type,
        notes,
        hospital_id,
    })
    .await
}

pub async fn lookup_patient(api: ApiClient, access_code: String) -> UiEvent {
    UiEvent::Hospital(HospitalUiEvent::PatientLookedUp(
        api.user_by_access_code(&access_code).await,
    ))
}

pub async fn generate_share_code(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Patient(PatientUiEvent::ShareCodeGenerated(
        api.generate_share_code(user_id).await,
    ))
}

pub async fn fetch_profile(api: ApiClient, user_id: u64) -> UiEvent {
    UiEvent::Patient(PatientUiEvent::ProfileLoaded(
        api.patient_profile(user_id).await,
    ))
}

pub async fn save_profile(
    api: ApiClient,
    user_id: u64,
    profile: medgal_core::types::Profile,
) -> UiEvent {
    UiEvent::Patient(PatientUiEvent::ProfileSaved(
        api.update_patient_profile(user_id, &profile).await,
    ))
}

/// Fetches preview bytes and materializes the local resource handle.
/// Cancellation (overlay closed mid-fetch) short-circuits without creating
/// a handle at all.
pub async fn load_preview(
    api: ApiClient,
    record_id: u64,
    file_name: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let fetch = api.preview_record(record_id);
    let bytes = if let Some(token) = cancel {
        tokio::select! {
            () = token.cancelled() => {
                return UiEvent::PreviewLoaded {
                    record_id,
                    result: Err(ApiError::validation("Preview cancelled.")),
                };
            }
            result = fetch => result,
        }
    } else {
        fetch.await
    };

    let result = match bytes {
        Ok(bytes) => {
            if bytes.is_empty() {
                // An empty body means the stored file is missing content.
                Err(ApiError::rejected(Some(
                    "The preview file is empty.".to_string(),
                )))
            } else {
                tokio::task::spawn_blocking(move || PreviewHandle::create(&file_name, &bytes))
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "preview write task failed");
                        ApiError::decode()
                    })
                    .and_then(|created| {
                        created.map_err(|e| {
                            tracing::warn!(error = %e, "failed to write preview file");
                            ApiError::decode()
                        })
                    })
            }
        }
        Err(e) => Err(e),
    };

    UiEvent::PreviewLoaded { record_id, result }
}

/// Fetches record bytes and writes them to the working directory.
pub async fn download_record(api: ApiClient, record_id: u64, file_name: String) -> UiEvent {
    let result = match api.download_record(record_id).await {
        Ok(bytes) => {
            let target = PathBuf::from(&file_name);
            let write_target = target.clone();
            tokio::task::spawn_blocking(move || std::fs::write(&write_target, &bytes))
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "download write task failed");
                    ApiError::decode()
                })
                .and_then(|written| {
                    written.map_err(|e| {
                        ApiError::validation(format!("Cannot write {}: {e}", target.display()))
                    })
                })
                .map(|()| target)
        }
        Err(e) => Err(e),
    };
    UiEvent::DownloadFinished { file_name, result }
}
