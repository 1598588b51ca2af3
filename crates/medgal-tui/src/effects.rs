//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs network or disk I/O itself.

use std::path::PathBuf;

use medgal_core::auth::ProviderProfile;
use medgal_core::types::{Profile, RecordType, UserType};
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};
use crate::overlays::PreviewHandle;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Open a URL in the system browser (federated sign-in).
    OpenBrowser { url: String },

    /// Read the persisted session off the reducer thread.
    RestoreSession { task: TaskId },

    /// Probe backend reachability for the login banner.
    CheckHealth { task: TaskId },

    /// OTP flow: request a one-time code.
    SendCode {
        task: TaskId,
        contact: String,
        role: UserType,
    },

    /// OTP flow: verify the entered code.
    VerifyCode {
        task: TaskId,
        contact: String,
        code: String,
    },

    /// Credential flow: sign in.
    CredentialSignIn {
        task: TaskId,
        email: String,
        password: String,
    },

    /// Credential flow: register.
    CredentialSignUp {
        task: TaskId,
        name: String,
        email: String,
        password: String,
        confirm: String,
        role: UserType,
    },

    /// Federated flow: resolve the pasted provider token to a profile.
    FederatedFetchProfile { task: TaskId, token: String },

    /// Federated flow: exchange token + profile + role for an identity.
    FederatedExchange {
        task: TaskId,
        token: String,
        role: UserType,
        profile: ProviderProfile,
    },

    FetchPatientStats { task: TaskId, user_id: u64 },
    FetchPatientRecords { task: TaskId, user_id: u64 },
    FetchHospitalStats { task: TaskId, user_id: u64 },
    FetchHospitalRecords { task: TaskId, user_id: u64 },
    FetchHospitalPatients { task: TaskId, user_id: u64 },

    /// Record search, optionally scoped to one hospital's uploads.
    SearchRecords {
        task: TaskId,
        query: String,
        hospital_scope: Option<u64>,
    },

    /// Hospital upload. The file is read inside the handler; a missing or
    /// unreadable file surfaces as an inline error without a network call.
    UploadRecord {
        task: TaskId,
        file_path: PathBuf,
        patient_access_code: String,
        record_type: RecordType,
        notes: String,
        hospital_id: u64,
    },

    /// Hospital add-patient lookup by access code.
    LookupPatient { task: TaskId, access_code: String },

    /// Patient share-code generation.
    GenerateShareCode { task: TaskId, user_id: u64 },

    FetchProfile { task: TaskId, user_id: u64 },
    SaveProfile {
        task: TaskId,
        user_id: u64,
        profile: Profile,
    },

    /// Fetch record bytes and materialize a preview handle.
    LoadPreview {
        task: TaskId,
        record_id: u64,
        file_name: String,
    },

    /// Fetch record bytes and write them next to the working directory.
    DownloadRecord {
        task: TaskId,
        record_id: u64,
        file_name: String,
    },

    /// Cancel an in-progress task by cancelling its token.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },

    /// Release a preview resource handle (delete the backing file).
    ReleasePreview { handle: PreviewHandle },
}
