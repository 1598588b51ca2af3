//! Login view state.
//!
//! Three independent flows, each a short state machine. The in-flight
//! phases double as the submit guard: while a flow is `Sending`,
//! `Verifying`, `Submitting` or `Exchanging` its submit key is ignored, so
//! a second Enter before the first request resolves never spawns a
//! duplicate attempt.

use medgal_core::types::UserType;

use crate::common::TextField;

/// Which flow produced a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFlow {
    Otp,
    Credential,
    Federated,
}

/// Selected authentication mode on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Otp,
    Credentials,
    Register,
    Federated,
}

impl LoginMode {
    pub fn all() -> &'static [LoginMode] {
        &[
            LoginMode::Otp,
            LoginMode::Credentials,
            LoginMode::Register,
            LoginMode::Federated,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoginMode::Otp => "One-time code",
            LoginMode::Credentials => "Email & password",
            LoginMode::Register => "Create account",
            LoginMode::Federated => "Google sign-in",
        }
    }
}

/// OTP flow phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpPhase {
    #[default]
    Idle,
    Sending,
    AwaitingCode,
    Verifying,
}

/// Credential flow phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPhase {
    #[default]
    Idle,
    Submitting,
}

/// Federated flow phases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FederatedPhase {
    #[default]
    Idle,
    /// Browser opened; waiting for the user to paste the provider token.
    AwaitingProvider { state_nonce: String },
    /// Token pasted; userinfo + backend exchange in flight.
    Exchanging,
}

/// Backend reachability, shown as a banner on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

/// Login screen state shared by all three flows.
#[derive(Debug)]
pub struct LoginState {
    pub mode: LoginMode,
    pub role: UserType,
    pub backend: BackendStatus,

    // OTP flow
    pub contact: TextField,
    pub code: TextField,
    pub otp: OtpPhase,

    // Credential flow (sign-in and register)
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub confirm: TextField,
    pub credential: CredentialPhase,

    // Federated flow
    pub token_input: TextField,
    pub federated: FederatedPhase,

    /// Index of the focused field within the current mode.
    pub focus: usize,

    pub error: Option<String>,
    pub info: Option<String>,
}

impl LoginState {
    pub fn new(role: UserType) -> Self {
        Self {
            mode: LoginMode::Otp,
            role,
            backend: BackendStatus::Checking,
            contact: TextField::new(),
            code: TextField::new(),
            otp: OtpPhase::Idle,
            name: TextField::new(),
            email: TextField::new(),
            password: TextField::masked(),
            confirm: TextField::masked(),
            credential: CredentialPhase::Idle,
            token_input: TextField::new(),
            federated: FederatedPhase::Idle,
            focus: 0,
            error: None,
            info: None,
        }
    }

    /// Number of focusable fields in the current mode/phase.
    pub fn field_count(&self) -> usize {
        match self.mode {
            // OTP and federated show one input at a time (contact or code,
            // token respectively).
            LoginMode::Otp | LoginMode::Federated => 1,
            LoginMode::Credentials => 2,
            LoginMode::Register => 4,
        }
    }

    /// True while the current mode has a request in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.otp, OtpPhase::Sending | OtpPhase::Verifying)
            || self.credential == CredentialPhase::Submitting
            || self.federated == FederatedPhase::Exchanging
    }

    /// Switches the auth mode, clearing transient state but keeping the
    /// chosen role.
    pub fn set_mode(&mut self, mode: LoginMode) {
        if self.mode == mode || self.is_busy() {
            return;
        }
        self.mode = mode;
        self.focus = 0;
        self.error = None;
        self.info = None;
        self.otp = OtpPhase::Idle;
        self.code.clear();
        self.credential = CredentialPhase::Idle;
        self.federated = FederatedPhase::Idle;
        self.token_input.clear();
    }

    /// Toggles between the patient and hospital role.
    pub fn toggle_role(&mut self) {
        if self.is_busy() {
            return;
        }
        self.role = match self.role {
            UserType::Patient => UserType::Hospital,
            UserType::Hospital => UserType::Patient,
        };
    }

    /// The focused text field for plain character input, if any.
    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.mode {
            LoginMode::Otp => {
                if matches!(self.otp, OtpPhase::AwaitingCode) {
                    Some(&mut self.code)
                } else if matches!(self.otp, OtpPhase::Idle) {
                    Some(&mut self.contact)
                } else {
                    None
                }
            }
            LoginMode::Credentials => match self.focus {
                0 => Some(&mut self.email),
                _ => Some(&mut self.password),
            },
            LoginMode::Register => match self.focus {
                0 => Some(&mut self.name),
                1 => Some(&mut self.email),
                2 => Some(&mut self.password),
                _ => Some(&mut self.confirm),
            },
            LoginMode::Federated => {
                if matches!(self.federated, FederatedPhase::AwaitingProvider { .. }) {
                    Some(&mut self.token_input)
                } else {
                    None
                }
            }
        }
    }
}
