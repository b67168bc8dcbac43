//! # ldapschema
//!
//! Command-line front end for the `ldapschema` library: checks LDIF and
//! OpenLDAP schema files, lists their definitions and shows single entities.

mod config;
mod output;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use config::CliConfig;
use ldapschema::{EntityKind, LoadReport, ModelRef, Schema, SchemaConfig, SchemaLoader};
use output::Printer;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ldapschema")]
#[command(about = "Check and inspect RFC 4512 LDAP schema definitions")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    schema: SchemaArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the schema options of the configuration file
#[derive(Args)]
struct SchemaArgs {
    /// Read AUXILIARY object classes as STRUCTURAL
    #[arg(long, global = true)]
    legacy_auxiliary: bool,

    /// Do not copy superior MUST/MAY sets into subclasses
    #[arg(long, global = true)]
    no_inheritance: bool,

    /// Do not bind attribute types to syntaxes defined after them
    #[arg(long, global = true)]
    no_reconcile: bool,
}

impl SchemaArgs {
    fn apply(&self, config: &mut SchemaConfig) {
        if self.legacy_auxiliary {
            config.legacy_auxiliary_kind = true;
        }
        if self.no_inheritance {
            config.resolve_inheritance = false;
        }
        if self.no_reconcile {
            config.reconcile_syntaxes = false;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load schema files and report rejected definitions and schema issues
    Check {
        /// LDIF or OpenLDAP schema files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Fail when any schema issue is recorded
        #[arg(long)]
        strict: bool,
    },

    /// Print one entity, looked up by OID or name
    Show {
        /// LDIF or OpenLDAP schema file
        file: PathBuf,

        /// OID or name of the entity
        name: String,

        /// Print the entity as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the OID and primary name of every definition
    List {
        /// LDIF or OpenLDAP schema file
        file: PathBuf,

        /// Only list entities of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Syntax,
    MatchingRule,
    AttributeType,
    ObjectClass,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Syntax => Self::Syntax,
            KindArg::MatchingRule => Self::MatchingRule,
            KindArg::AttributeType => Self::AttributeType,
            KindArg::ObjectClass => Self::ObjectClass,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    cli.schema.apply(&mut config.schema);
    debug!(?config, "effective configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Check { files, strict } => {
            let report = load(&files, config.schema)?;
            let passed = print_check(&mut out, &report, strict || config.strict)?;
            Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Show { file, name, json } => {
            let report = load(std::slice::from_ref(&file), config.schema)?;
            let Some(entity) = report.schema.find(&name) else {
                bail!("no definition named '{name}' in {}", file.display());
            };
            if json {
                writeln!(out, "{}", entity_json(&report.schema, entity)?)?;
            } else {
                Printer::new(&report.schema, &mut out).entity(entity)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::List { file, kind } => {
            let report = load(std::slice::from_ref(&file), config.schema)?;
            print_list(&mut out, &report.schema, kind.map(EntityKind::from))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8) {
    // schema issues are reported on stdout, their warn! mirror only with -v
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(files: &[PathBuf], config: SchemaConfig) -> Result<LoadReport> {
    let mut loader = SchemaLoader::with_config(config);
    for file in files {
        let count = loader
            .add_file(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        info!(file = %file.display(), definitions = count, "collected definitions");
    }
    Ok(loader.load()?)
}

/// Print the load summary; returns whether the check passed
fn print_check(out: &mut impl Write, report: &LoadReport, strict: bool) -> Result<bool> {
    let schema = &report.schema;
    for kind in [
        EntityKind::Syntax,
        EntityKind::MatchingRule,
        EntityKind::AttributeType,
        EntityKind::ObjectClass,
    ] {
        writeln!(out, "{:<16} {}", format!("{kind}:"), schema.count(kind))?;
    }
    writeln!(out, "{:<16} {}", "duplicates:", schema.duplicates().len())?;

    if !report.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "rejected definitions: {}", report.failures.len())?;
        for failure in &report.failures {
            writeln!(out, "   {failure}")?;
        }
    }

    if !report.log.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "schema issues: {} ({} definitions)",
            report.log.len(),
            report.log.entities_with_issues()
        )?;
        for (subject, issues) in report.log.by_subject() {
            writeln!(out, "{}:", subject.unwrap_or("<schema>"))?;
            for issue in issues {
                writeln!(out, "   {} ({})", issue.message, issue.kind)?;
            }
        }
    }

    let passed = report.failures.is_empty() && (!strict || report.log.is_empty());
    writeln!(out)?;
    writeln!(out, "{}", if passed { "ok" } else { "FAILED" })?;
    Ok(passed)
}

fn print_list(out: &mut impl Write, schema: &Schema, kind: Option<EntityKind>) -> Result<()> {
    for entity in schema.models() {
        let model = schema.model(entity);
        if kind.is_some_and(|kind| kind != model.kind) {
            continue;
        }
        let name = match entity {
            ModelRef::Syntax(_) => model.desc.as_deref(),
            ModelRef::MatchingRule(id) => schema.matching_rule(id).names.first().map(String::as_str),
            ModelRef::AttributeType(id) => schema.attribute_type(id).names.first().map(String::as_str),
            ModelRef::ObjectClass(id) => schema.object_class(id).names.first().map(String::as_str),
        };
        writeln!(out, "{:<14} {:<32} {}", model.kind.as_str(), model.oid, name.unwrap_or("-"))?;
    }
    Ok(())
}

fn entity_json(schema: &Schema, entity: ModelRef) -> Result<String> {
    let json = match entity {
        ModelRef::Syntax(id) => serde_json::to_string_pretty(schema.syntax(id)),
        ModelRef::MatchingRule(id) => serde_json::to_string_pretty(schema.matching_rule(id)),
        ModelRef::AttributeType(id) => serde_json::to_string_pretty(schema.attribute_type(id)),
        ModelRef::ObjectClass(id) => serde_json::to_string_pretty(schema.object_class(id)),
    };
    Ok(json?)
}
