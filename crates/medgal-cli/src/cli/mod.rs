//! CLI entry and dispatch.

use anyhow::Result;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "medgal")]
#[command(version)]
#[command(about = "Terminal portal for the Medical Gallery API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Launch the interactive portal (default)
    Portal,

    /// Sign in and persist the session
    Login {
        /// Email for the credential flow (prompts for the password)
        #[arg(long, conflicts_with = "otp")]
        email: Option<String>,

        /// Password for the credential flow
        #[arg(long, env = "MEDGAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Contact for the one-time-code flow (prompts for the code)
        #[arg(long, value_name = "CONTACT")]
        otp: Option<String>,

        /// Role for the one-time-code flow: patient or hospital
        #[arg(long, default_value = "patient")]
        role: String,
    },

    /// Clear the persisted session
    Logout,

    /// Print the signed-in identity
    Whoami,

    /// Check whether the backend is reachable
    Health,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create the config file with defaults
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = crate::logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "medgal starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            None | Some(Commands::Portal) => commands::portal().await,
            Some(Commands::Login {
                email,
                password,
                otp,
                role,
            }) => commands::login(email, password, otp, &role).await,
            Some(Commands::Logout) => commands::logout(),
            Some(Commands::Whoami) => commands::whoami(),
            Some(Commands::Health) => commands::health().await,
            Some(Commands::Config { command }) => match command {
                ConfigCommands::Path => commands::config_path(),
                ConfigCommands::Init => commands::config_init(),
            },
        }
    })
}
