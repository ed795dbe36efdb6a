//! hostinfo CLI - attribute normalization, import and integrity audit

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use hostinfo_audit::{JsonLinesSink, TextSink};
use hostinfo_catalog::KeyCatalog;
use hostinfo_convert::ConverterRegistry;
use hostinfo_core::{build_registry, Hostinfo, HostinfoConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hostinfo")]
#[command(about = "hostinfo - CMDB attribute normalization and validation")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show how a raw value would be stored
    Convert {
        /// Key name or import header
        key: String,
        /// Raw value; omit to test an absent value
        value: Option<String>,
    },
    /// Load a CSV export into the store
    Import {
        /// CSV file with a header row
        csv: PathBuf,
        /// Convert and count without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Report values that break key policies
    Audit {
        /// Also flag lists on single-valued keys
        #[arg(long)]
        single_valued: bool,
        /// Also check parent/child key pairs against each other
        #[arg(long)]
        referential: bool,
        /// Emit one JSON object per violation
        #[arg(long)]
        json: bool,
    },
    /// List catalog keys
    Keys,
    /// List the legal values of a restricted key
    Values {
        /// Key name
        key: String,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_catalog(config: &HostinfoConfig) -> anyhow::Result<KeyCatalog> {
    KeyCatalog::load(&config.catalog.path)
        .with_context(|| format!("loading catalog {}", config.catalog.path.display()))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = HostinfoConfig::discover(cli.config.as_deref()).context("loading config")?;
    init_tracing(&config.log.level);
    debug!("Config: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Convert { key, value } => {
            let registry = if config.catalog.path.exists() {
                build_registry(&load_catalog(&config)?)?
            } else {
                ConverterRegistry::builtin()
            };
            let conversion = registry.convert(&key, value.as_deref());
            if conversion.is_empty() {
                writeln!(out, "(nothing stored for {})", conversion.key)?;
            }
            for attribute in &conversion.attributes {
                writeln!(out, "{}", attribute)?;
            }
            for warning in &conversion.warnings {
                eprintln!("Warning: {}", warning);
            }
        }
        Commands::Import { csv, dry_run } => {
            let hostinfo = Hostinfo::new(config)?;
            let summary = hostinfo
                .import_csv(&csv, dry_run)
                .with_context(|| format!("importing {}", csv.display()))?;
            for header in &summary.unmapped_headers {
                eprintln!("Unmapped column: {}", header);
            }
            writeln!(out, "{}", summary)?;
        }
        Commands::Audit {
            single_valued,
            referential,
            json,
        } => {
            let mut audit = config.audit;
            audit.single_valued |= single_valued;
            audit.referential |= referential;
            let hostinfo = Hostinfo::new(config)?;
            let summary = if json {
                hostinfo.audit_into(audit, &mut JsonLinesSink::new(&mut out))?
            } else {
                hostinfo.audit_into(audit, &mut TextSink::new(&mut out))?
            };
            eprintln!("{}", summary);
            if !summary.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Keys => {
            let catalog = load_catalog(&config)?;
            for spec in catalog.keys() {
                let restricted = if spec.restricted { "restricted" } else { "" };
                writeln!(
                    out,
                    "{:<20} {:<6} {:<10} {}",
                    spec.key, spec.kind, restricted, spec.description
                )?;
            }
        }
        Commands::Values { key } => {
            let catalog = load_catalog(&config)?;
            if !catalog.contains(&key) {
                bail!("no such key '{}'", key);
            }
            let Some(values) = catalog.legal_values(&key) else {
                bail!("key '{}' is not restricted", key);
            };
            for value in values.iter() {
                writeln!(out, "{}", value)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
