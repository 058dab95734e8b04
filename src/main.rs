//! # UBEAT Certificate CLI
//!
//! Command-line interface for rendering certificates.
//!
//! ## Usage
//!
//! ```bash
//! # Render a certificate into the current directory
//! ubeat-certificate render --tier distinction --name "jane doe" \
//!     --exam-number A/123 --exam-year 2023 --school "st marys"
//!
//! # Show a tier's default field table
//! ubeat-certificate fields credit
//!
//! # Serve certificates over HTTP
//! ubeat-certificate serve --listen 0.0.0.0:8080 --config certificates.json
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ubeat_certificate::{
    CertificateData, CertificateError, Student, Tier,
    certificate::{CertificateFieldsConfig, tiers},
    config::RendererConfig,
    render::CertificateRenderer,
    server::{self, ServerConfig},
};

/// UBEAT Certificate - certificate image renderer
#[derive(Parser, Debug)]
#[command(name = "ubeat-certificate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one certificate to a PNG file
    Render {
        /// Certificate tier: pass, credit or distinction
        #[arg(long)]
        tier: String,

        /// Student name as recorded
        #[arg(long)]
        name: String,

        /// Exam number (slashes become underscores in the filename)
        #[arg(long)]
        exam_number: String,

        /// School name
        #[arg(long)]
        school: String,

        /// Exam year (defaults to the current year)
        #[arg(long)]
        exam_year: Option<i32>,

        /// Serial number printed on pass certificates
        #[arg(long)]
        serial_number: Option<String>,

        /// JSON file of per-field overrides
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,

        /// Renderer config (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory to write the certificate into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print a tier's default field table as JSON
    Fields {
        /// Certificate tier: pass, credit or distinction
        tier: String,
    },

    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Renderer config (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), CertificateError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            tier,
            name,
            exam_number,
            school,
            exam_year,
            serial_number,
            overrides,
            config,
            out_dir,
        } => {
            let tier: Tier = tier.parse()?;
            let config = RendererConfig::load_or_default(config.as_deref())?;
            let overrides = load_overrides(overrides.as_deref())?;

            let data = CertificateData {
                student: Student {
                    student_name: name,
                    exam_number,
                    exam_year,
                    serial_number,
                },
                school_name: school,
            };

            let renderer = CertificateRenderer::new(config)?;
            let certificate = renderer.render(&data, tier, &overrides).await?;
            let path = certificate.save_to(&out_dir)?;
            println!("{}", path.display());
        }

        Commands::Fields { tier } => {
            let tier: Tier = tier.parse()?;
            let table = serde_json::to_string_pretty(&tiers::defaults(tier))
                .map_err(|e| CertificateError::Config(e.to_string()))?;
            println!("{}", table);
        }

        Commands::Serve { listen, config } => {
            let renderer = RendererConfig::load_or_default(config.as_deref())?;
            server::serve(ServerConfig {
                listen_addr: listen,
                renderer,
            })
            .await?;
        }
    }

    Ok(())
}

/// Read a JSON overrides file, or none.
fn load_overrides(path: Option<&Path>) -> Result<CertificateFieldsConfig, CertificateError> {
    let Some(path) = path else {
        return Ok(CertificateFieldsConfig::new());
    };
    let json = std::fs::read_to_string(path).map_err(|e| {
        CertificateError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&json)
        .map_err(|e| CertificateError::Config(format!("Invalid overrides in {}: {}", path.display(), e)))
}
