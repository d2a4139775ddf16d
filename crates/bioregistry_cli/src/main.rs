//! Command line front end for the metaregistry core.
//!
//! # Responsibility
//! - Resolve configuration from file, environment and flags.
//! - Initialize logging once, then run one subcommand against the store.
//!
//! # Exit codes
//! - `0` success, `1` findings or unknown metaprefix, `2` usage or load error.

use anyhow::{bail, Context, Result};
use bioregistry_core::external::{external_source, load_processed, EXTERNAL_SOURCES};
use bioregistry_core::{
    align, default_log_level, init_logging, to_graph_text, AlignerRegistry, LintConfig,
    LogTarget, Manager, StoreConfig, Validator,
};
use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "bioregistry")]
#[command(version)]
#[command(about = "Lint, query and export the bioregistry metaregistry")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON lint configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding registry.json and metaregistry.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files (stderr when unset)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every metaregistry record and print the findings
    Lint,
    /// Print one metaregistry record
    Show { metaprefix: String },
    /// Expand a registry's provider template for an external prefix
    Provider {
        metaprefix: String,
        local_id: String,
    },
    /// Resolve prefix:identifier through a resolver registry
    Resolve {
        metaprefix: String,
        prefix: String,
        identifier: String,
    },
    /// Write one metaregistry record as Turtle
    Rdf { metaprefix: String },
    /// Align a downloaded external registry file against the store
    Align {
        source: String,
        path: PathBuf,
        /// Read a processed JSON record map instead of the source's raw format
        #[arg(long)]
        processed: bool,
    },
    /// List importable external registries
    Sources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Failed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match build_config(&cli, |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(err) => return report_error(&err),
    };
    if let Err(err) = start_logging(&config) {
        return report_error(&err);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&cli.command, &config, &mut out) {
        Ok(Status::Ok) => ExitCode::SUCCESS,
        Ok(Status::Failed) => ExitCode::from(1),
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {err:#}");
    ExitCode::from(2)
}

/// Layers config file, environment, then flags.
fn build_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<LintConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => LintConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LintConfig::default(),
    };
    config.apply_env_from(env);
    if let Some(dir) = cli.data_dir.as_deref() {
        config.store = StoreConfig::from_data_dir(dir);
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = Some(level.to_string());
    }
    if let Some(dir) = cli.log_dir.as_ref() {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn start_logging(config: &LintConfig) -> Result<()> {
    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    let target = match config.log_dir.as_deref() {
        Some(dir) => LogTarget::directory(&dir.to_string_lossy()).map_err(anyhow::Error::msg)?,
        None => LogTarget::Stderr,
    };
    init_logging(level, target).map_err(anyhow::Error::msg)
}

fn load_store(config: &LintConfig) -> Result<Manager> {
    Manager::load(&config.store).context("loading registry data")
}

fn execute(command: &Command, config: &LintConfig, out: &mut dyn Write) -> Result<Status> {
    if let Command::Sources = command {
        for source in EXTERNAL_SOURCES {
            writeln!(out, "{}\t{}", source.metaprefix, source.label)?;
        }
        return Ok(Status::Ok);
    }

    let manager = load_store(config)?;
    match command {
        Command::Lint => {
            let report = Validator::new(&manager, config.policy.clone()).validate_all();
            writeln!(out, "{report}")?;
            Ok(if report.is_clean() {
                Status::Ok
            } else {
                Status::Failed
            })
        }
        Command::Show { metaprefix } => show(&manager, metaprefix, out),
        Command::Provider {
            metaprefix,
            local_id,
        } => {
            if manager.get_registry(metaprefix).is_none() {
                return unknown(metaprefix);
            }
            match manager.get_registry_provider_uri_format(metaprefix, local_id) {
                Some(uri) => {
                    writeln!(out, "{uri}")?;
                    Ok(Status::Ok)
                }
                None => bail!("`{metaprefix}` has no provider_uri_format"),
            }
        }
        Command::Resolve {
            metaprefix,
            prefix,
            identifier,
        } => {
            if manager.get_registry(metaprefix).is_none() {
                return unknown(metaprefix);
            }
            match manager.get_registry_uri(metaprefix, prefix, identifier) {
                Some(uri) => {
                    writeln!(out, "{uri}")?;
                    Ok(Status::Ok)
                }
                None => bail!("`{metaprefix}` is not a resolver"),
            }
        }
        Command::Rdf { metaprefix } => match manager.get_registry(metaprefix) {
            Some(registry) => {
                write!(out, "{}", to_graph_text(registry, &manager))?;
                Ok(Status::Ok)
            }
            None => unknown(metaprefix),
        },
        Command::Align {
            source,
            path,
            processed,
        } => align_source(&manager, source, path, *processed, out),
        Command::Sources => Ok(Status::Ok),
    }
}

fn unknown(metaprefix: &str) -> Result<Status> {
    eprintln!("unknown metaprefix `{metaprefix}`");
    Ok(Status::Failed)
}

fn show(manager: &Manager, metaprefix: &str, out: &mut dyn Write) -> Result<Status> {
    let Some(registry) = manager.get_registry(metaprefix) else {
        return unknown(metaprefix);
    };
    writeln!(out, "prefix: {}", registry.prefix)?;
    let fields = [
        ("name", manager.get_registry_name(metaprefix)),
        ("homepage", manager.get_registry_homepage(metaprefix)),
        ("example", manager.get_registry_example(metaprefix)),
        ("description", manager.get_registry_description(metaprefix)),
        ("license", registry.license.as_deref()),
        ("provider_uri_format", registry.provider_uri_format.as_deref()),
        ("resolver_uri_format", registry.resolver_uri_format.as_deref()),
        ("resolver_type", registry.resolver_type.as_deref()),
        ("bioregistry_prefix", registry.bioregistry_prefix.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{label}: {value}")?;
        }
    }
    writeln!(
        out,
        "mapped_prefixes: {}",
        manager.get_registry_map(metaprefix).len()
    )?;
    Ok(Status::Ok)
}

fn align_source(
    manager: &Manager,
    source: &str,
    path: &Path,
    processed: bool,
    out: &mut dyn Write,
) -> Result<Status> {
    let aligners = AlignerRegistry::builtin();
    let Some(aligner) = aligners.get(source) else {
        let known = aligners.keys().join(", ");
        match external_source(source) {
            Some(catalogued) => bail!(
                "no aligner for {} (`{source}`); available: {known}",
                catalogued.label
            ),
            None => bail!("unknown external registry `{source}`; available: {known}"),
        }
    };

    let records = if processed {
        load_processed(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        aligner
            .parse_input(&text, &path.display().to_string())
            .with_context(|| format!("parsing {}", path.display()))?
    };
    let alignment = align(manager, aligner.as_ref(), &records);
    info!(
        "event=align_cli module=cli source={} aligned={} curation={}",
        source,
        alignment.aligned.len(),
        alignment.curation.len()
    );

    writeln!(
        out,
        "# {source}: {} records, {} aligned, {} skipped, {} to curate",
        records.len(),
        alignment.aligned.len(),
        alignment.skipped.len(),
        alignment.curation.len()
    )?;
    write!(out, "{}", alignment.curation_tsv())?;
    Ok(Status::Ok)
}
