//! Role-scoped dashboard endpoints.

use super::{ApiClient, ApiResult};
use crate::types::{HospitalStats, PatientEntry, PatientStats, Profile, RecordSummary};

impl ApiClient {
    /// Aggregate counts for the patient overview.
    pub async fn patient_stats(&self, user_id: u64) -> ApiResult<PatientStats> {
        self.get_json(&format!("/patient/user/{user_id}/stats")).await
    }

    /// All records belonging to a patient.
    pub async fn patient_records(&self, user_id: u64) -> ApiResult<Vec<RecordSummary>> {
        self.get_json(&format!("/patient/user/{user_id}/records")).await
    }

    /// Editable profile fields for a patient.
    pub async fn patient_profile(&self, user_id: u64) -> ApiResult<Profile> {
        self.get_json(&format!("/patient/user/{user_id}/profile")).await
    }

    /// Saves the patient profile. Returns the server's message, if any.
    pub async fn update_patient_profile(
        &self,
        user_id: u64,
        profile: &Profile,
    ) -> ApiResult<Option<String>> {
        self.put_json(&format!("/patient/user/{user_id}/profile"), profile)
            .await
    }

    /// Aggregate counts for the hospital overview.
    pub async fn hospital_stats(&self, user_id: u64) -> ApiResult<HospitalStats> {
        self.get_json(&format!("/hospital/{user_id}/stats")).await
    }

    /// All records uploaded by a hospital.
    pub async fn hospital_records(&self, user_id: u64) -> ApiResult<Vec<RecordSummary>> {
        self.get_json(&format!("/hospital/{user_id}/records")).await
    }

    /// Patients this hospital has uploaded records for.
    pub async fn hospital_patients(&self, user_id: u64) -> ApiResult<Vec<PatientEntry>> {
        self.get_json(&format!("/hospital/{user_id}/patients")).await
    }

    /// Generates a fresh share code; the payload is the shareable URL.
    pub async fn generate_share_code(&self, user_id: u64) -> ApiResult<String> {
        self.post_empty(&format!("/share/generate/{user_id}")).await
    }
}
