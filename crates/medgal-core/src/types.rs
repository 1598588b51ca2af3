//! Domain types shared across the portal.
//!
//! Field names are serde-mapped to the wire's camelCase so these types
//! deserialize straight out of the API envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of an authenticated principal.
///
/// Immutable for the lifetime of an identity: the wire value is set at
/// registration and there is no mutator anywhere in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "PATIENT")]
    Patient,
    #[serde(rename = "HOSPITAL")]
    Hospital,
}

impl Default for UserType {
    fn default() -> Self {
        UserType::Patient
    }
}

impl UserType {
    /// Returns the wire identifier (`PATIENT` / `HOSPITAL`).
    pub fn id(&self) -> &'static str {
        match self {
            UserType::Patient => "PATIENT",
            UserType::Hospital => "HOSPITAL",
        }
    }

    /// Returns the human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Patient => "Patient",
            UserType::Hospital => "Hospital",
        }
    }

    /// Parses the wire identifier, case-insensitively.
    pub fn from_id(id: &str) -> Option<UserType> {
        match id.to_uppercase().as_str() {
            "PATIENT" => Some(UserType::Patient),
            "HOSPITAL" => Some(UserType::Hospital),
            _ => None,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The authenticated principal held by the session.
///
/// The wire also carries `googleId` / `isVerified`; neither is part of the
/// session contract, so they are dropped at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub user_type: UserType,
    /// Opaque per-identity sharing token, distinct from any credential.
    #[serde(default)]
    pub access_code: String,
}

/// Kind of an uploaded medical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "LAB_REPORT")]
    LabReport,
    #[serde(rename = "X_RAY")]
    XRay,
    #[serde(rename = "CT_SCAN")]
    CtScan,
    #[serde(rename = "MRI")]
    Mri,
    #[serde(rename = "PRESCRIPTION")]
    Prescription,
    #[serde(rename = "DISCHARGE_SUMMARY")]
    DischargeSummary,
}

impl RecordType {
    /// All record types, in upload-form order.
    pub fn all() -> &'static [RecordType] {
        &[
            RecordType::LabReport,
            RecordType::XRay,
            RecordType::CtScan,
            RecordType::Mri,
            RecordType::Prescription,
            RecordType::DischargeSummary,
        ]
    }

    /// Returns the wire identifier (`LAB_REPORT`, ...).
    pub fn id(&self) -> &'static str {
        match self {
            RecordType::LabReport => "LAB_REPORT",
            RecordType::XRay => "X_RAY",
            RecordType::CtScan => "CT_SCAN",
            RecordType::Mri => "MRI",
            RecordType::Prescription => "PRESCRIPTION",
            RecordType::DischargeSummary => "DISCHARGE_SUMMARY",
        }
    }

    /// Returns the human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            RecordType::LabReport => "Lab Report",
            RecordType::XRay => "X-Ray",
            RecordType::CtScan => "CT Scan",
            RecordType::Mri => "MRI",
            RecordType::Prescription => "Prescription",
            RecordType::DischargeSummary => "Discharge Summary",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verification status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "Pending",
            RecordStatus::Verified => "Verified",
            RecordStatus::Rejected => "Rejected",
        }
    }
}

/// One row in a records listing or search result.
///
/// The listing endpoints are tolerant about which fields they populate, so
/// everything except the id defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub record_id: u64,
    #[serde(default)]
    pub record_type: Option<RecordType>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    /// Uploading hospital's display name (patient views).
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning patient's access code (hospital views).
    #[serde(default)]
    pub patient_access_code: Option<String>,
}

impl RecordSummary {
    /// Display label for the record kind, falling back to the file name.
    pub fn kind_label(&self) -> &str {
        match &self.record_type {
            Some(kind) => kind.label(),
            None => self.file_name.as_deref().unwrap_or("Record"),
        }
    }
}

/// Aggregate counts shown on the patient overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientStats {
    pub total_records: u64,
    pub verified_records: u64,
    pub pending_records: u64,
    pub shared_records: u64,
}

/// Aggregate counts shown on the hospital overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HospitalStats {
    pub total_uploads: u64,
    pub active_patients: u64,
    pub pending_reviews: u64,
    pub today_uploads: u64,
}

/// One row in the hospital's patient roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEntry {
    pub user_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub access_code: String,
}

/// Editable profile fields (patient portal).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_wire_roundtrip() {
        let json = r#"{
            "userId": 42,
            "name": "Ada",
            "email": "ada@example.com",
            "userType": "PATIENT",
            "accessCode": "AC-9001",
            "googleId": null,
            "isVerified": true
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.user_type, UserType::Patient);
        assert_eq!(identity.access_code, "AC-9001");

        let back = serde_json::to_value(&identity).unwrap();
        assert_eq!(back["userType"], "PATIENT");
        assert_eq!(back["accessCode"], "AC-9001");
    }

    #[test]
    fn test_record_summary_tolerates_sparse_rows() {
        let json = r#"{"recordId": 7}"#;
        let record: RecordSummary = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_id, 7);
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(record.kind_label(), "Record");
    }

    #[test]
    fn test_record_type_wire_ids() {
        for kind in RecordType::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_user_type_from_id_is_case_insensitive() {
        assert_eq!(UserType::from_id("hospital"), Some(UserType::Hospital));
        assert_eq!(UserType::from_id("PATIENT"), Some(UserType::Patient));
        assert_eq!(UserType::from_id("admin"), None);
    }
}
