use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hms_core::{AccessError, CoreConfig, FileSlot, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hms")]
#[command(about = "HMS access control CLI")]
struct Cli {
    /// Directory holding the durable session slot
    #[arg(long, env = "HMS_SESSION_DIR")]
    session_dir: Option<String>,
    /// YAML role registry replacing the built-in table
    #[arg(long = "roles", env = "HMS_ROLE_REGISTRY")]
    role_registry: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every role and how many capabilities it grants
    Roles,
    /// Show the capabilities granted to a role
    Capabilities {
        /// Role identifier, e.g. receptionist
        role: String,
    },
    /// Sign in and keep the session for later commands
    SignIn {
        /// Staff email address
        email: String,
        /// Shared secret
        secret: String,
    },
    /// Sign out and clear the stored session
    SignOut,
    /// Show the signed-in staff member
    Whoami,
    /// Check capabilities for the signed-in staff member
    Check {
        /// Capabilities such as billing:create
        #[arg(required = true)]
        capabilities: Vec<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hms=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_values(
        cli.session_dir,
        cli.role_registry,
        std::env::var("HMS_DEMO_SECRET").ok(),
        None,
    )?;

    match cli.command {
        Some(command) => run(&cfg, command, &mut std::io::stdout().lock()),
        None => {
            println!("Use 'hms --help' for commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs one command against the configured registry and session directory.
///
/// Denials and rejected credentials are reported through the exit code, not as errors.
fn run(cfg: &CoreConfig, command: Commands, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let access = Arc::new(cfg.access_control()?);
    tracing::debug!(roles = access.registry().iter().count(), "role registry ready");

    match command {
        Commands::Roles => {
            for (role, grants) in access.registry().iter() {
                writeln!(out, "{role}: {} capabilities", grants.len())?;
            }
        }
        Commands::Capabilities { role } => {
            let grants = access.registry().capabilities_for_role(&role);
            if grants.is_empty() {
                writeln!(out, "Role '{role}' grants no capabilities")?;
            }
            for capability in &grants {
                writeln!(out, "{capability}")?;
            }
        }
        Commands::SignIn { email, secret } => {
            let mut session = Session::restore(access, slot(cfg));
            match session.sign_in(&email, &secret) {
                Ok(subject) => writeln!(
                    out,
                    "Signed in as {} <{}> ({})",
                    subject.display_name, subject.email, subject.role
                )?,
                Err(AccessError::AuthenticationFailed) => {
                    eprintln!("Invalid email or password");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::SignOut => {
            let mut session = Session::restore(access, slot(cfg));
            session.sign_out()?;
            writeln!(out, "Signed out")?;
        }
        Commands::Whoami => {
            let session = Session::restore(access, slot(cfg));
            tracing::debug!(authenticated = session.is_authenticated(), "session restored");
            match session.current_subject() {
                Some(subject) => {
                    writeln!(out, "{} <{}>", subject.display_name, subject.email)?;
                    writeln!(out, "role: {}", subject.role)?;
                    if let Some(department) = &subject.department {
                        writeln!(out, "department: {department}")?;
                    }
                    writeln!(
                        out,
                        "capabilities: {}",
                        subject.effective_capabilities.len()
                    )?;
                }
                None => {
                    writeln!(out, "Not signed in")?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Check { capabilities } => {
            let session = Session::restore(access, slot(cfg));
            for capability in &capabilities {
                let verdict = if session.has_capability(capability) {
                    "granted"
                } else {
                    "denied"
                };
                writeln!(out, "{capability}: {verdict}")?;
            }
            if !session.has_any_capability(&capabilities) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn slot(cfg: &CoreConfig) -> FileSlot {
    let slot = FileSlot::new(cfg.session_dir());
    tracing::debug!(path = %slot.path().display(), "using session slot");
    slot
}
