//! Login feature: three auth flows behind one screen.

mod render;
mod state;
mod update;

pub use render::render_login;
pub use state::{
    BackendStatus, CredentialPhase, FederatedPhase, LoginFlow, LoginMode, LoginState, OtpPhase,
};
pub use update::{handle_event, handle_key, handle_paste};
