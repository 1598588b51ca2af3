//! Headless auth commands: login, logout, whoami.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use medgal_core::api::ApiClient;
use medgal_core::auth::AuthGateway;
use medgal_core::config::{Config, paths};
use medgal_core::session::{self, SessionStore};
use medgal_core::types::{Identity, UserType};

pub async fn login(
    email: Option<String>,
    password: Option<String>,
    otp: Option<String>,
    role: &str,
) -> Result<()> {
    let config = Config::load()?;
    let api = ApiClient::new(&config.api_base_url)?;
    let gateway = AuthGateway::new(api);

    let identity = if let Some(contact) = otp {
        let role = UserType::from_id(role)
            .with_context(|| format!("Unknown role: {role} (expected patient or hospital)"))?;
        login_with_otp(&gateway, &contact, role).await?
    } else if let Some(email) = email {
        let password = match password {
            Some(password) => password,
            None => prompt("Password: ")?,
        };
        gateway
            .sign_in(&email, &password)
            .await
            .map_err(|e| anyhow::anyhow!(e.message))?
    } else {
        bail!("Pass --email <email> or --otp <contact> to sign in.");
    };

    // Persist through the store so the portal picks the session up.
    let summary = format!(
        "Signed in as {} <{}> ({})",
        identity.name,
        identity.email,
        identity.user_type.label()
    );
    let mut store = SessionStore::new(paths::session_path());
    store.initialize();
    store.set_identity(identity);
    println!("{summary}");
    Ok(())
}

async fn login_with_otp(
    gateway: &AuthGateway,
    contact: &str,
    role: UserType,
) -> Result<Identity> {
    let ack = gateway
        .send_code(contact, role)
        .await
        .map_err(|e| anyhow::anyhow!(e.message))?;
    eprintln!("{}", ack.unwrap_or_else(|| "Code sent.".to_string()));

    let code = prompt("Enter the 6-digit code: ")?;
    gateway
        .verify_code(contact, code.trim())
        .await
        .map_err(|e| anyhow::anyhow!(e.message))
}

fn prompt(message: &str) -> Result<String> {
    eprint!("{message}");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

pub fn logout() -> Result<()> {
    let mut store = SessionStore::new(paths::session_path());
    store.initialize();
    let had_session = store.current().is_some();
    store.clear();
    if had_session {
        println!("Signed out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    match session::read_persisted(&paths::session_path()) {
        Some(identity) => {
            println!(
                "{} <{}> ({}), access code {}",
                identity.name,
                identity.email,
                identity.user_type.label(),
                identity.access_code
            );
            Ok(())
        }
        None => {
            println!("Not signed in.");
            Ok(())
        }
    }
}
