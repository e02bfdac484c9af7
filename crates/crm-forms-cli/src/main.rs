//! crm-forms CLI
//!
//! Offline checks for lead and package form values.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crm_forms::products::ProductKind;
use crm_forms::{StaticSession, TenantId, UserId};

/// Validate form values and preview submission payloads.
#[derive(Parser)]
#[command(name = "crm-forms")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON file of values against a form.
    Validate {
        /// Form name (lead, hajj-package, umrah-package, travel-package,
        /// development-project, study-visa).
        #[arg(short, long)]
        form: ProductKind,

        /// Path to a JSON object of field values.
        #[arg(short, long)]
        values: PathBuf,

        /// Treat the form as invalid unless every ruled field passes.
        #[arg(long)]
        strict: bool,
    },

    /// List the fields of a form and their rules.
    Fields {
        /// Form name.
        #[arg(short, long)]
        form: ProductKind,
    },

    /// Print the payload that would be submitted for a values file.
    Payload {
        /// Form name.
        #[arg(short, long)]
        form: ProductKind,

        /// Path to a JSON object of field values.
        #[arg(short, long)]
        values: PathBuf,

        /// Tenant the record is created under.
        #[arg(long, env = "CRM_TENANT_ID")]
        tenant: Option<i64>,

        /// User creating the record.
        #[arg(long, env = "CRM_USER_ID")]
        user: Option<i64>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = match cli.command {
        Commands::Validate {
            form,
            values,
            strict,
        } => commands::validate(form, &values, strict)?,
        Commands::Fields { form } => commands::fields(form)?,
        Commands::Payload {
            form,
            values,
            tenant,
            user,
        } => {
            let session = StaticSession {
                tenant_id: tenant.map(TenantId),
                user_id: user.map(UserId),
            };
            debug!(?session, "session from arguments");
            commands::payload(form, &values, &session)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::from(commands::exit_status(&output)))
}
