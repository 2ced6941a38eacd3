//! Purpose: `assetio` CLI entry point for inspecting managers and resolving references.
//! Role: Binary crate root; parses args, drives the host façade, emits JSON on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
//! Invariants: Diagnostics go through `tracing` on stderr; stdout carries results only.
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use assetio::config::{DEFAULT_CONFIG_ENV_VAR, load_default_manager_config};
use assetio::core::access::ResolveAccess;
use assetio::core::context::Context;
use assetio::core::error::{Error, ErrorKind, to_exit_code};
use assetio::core::reference::EntityReference;
use assetio::core::session::HostInterface;
use assetio::core::traits_data::TraitSet;
use assetio::core::value::info_dictionary_json;
use assetio::host_api::policy;
use assetio::host_api::{
    Manager, ManagerFactory, ManagerImplementationFactoryInterface, ManagerRegistry,
};
use assetio::log::{LoggerInterface, SeverityFilter, TracingLogger};
use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser)]
#[command(
    name = "assetio",
    version,
    about = "Query asset managers through the batch entity protocol",
    after_help = r#"EXAMPLES
  $ assetio managers
  $ assetio config ./assetio.toml
  $ assetio resolve --config ./assetio.toml --trait locatable simple://cat
  $ ASSETIO_DEFAULT_CONFIG=./assetio.toml assetio resolve --trait locatable simple://cat"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List registered manager implementations")]
    Managers,
    #[command(about = "Parse a default-manager TOML config and print it")]
    Config {
        #[arg(help = "Path to the TOML config file")]
        path: PathBuf,
    },
    #[command(
        about = "Resolve traits for entity references",
        long_about = r#"Resolve traits for one or more entity references.

Results are printed one JSON object per reference, in input order. Element
errors are reported inline unless --fail-fast is given."#
    )]
    Resolve {
        #[arg(long, help = "Config file (default: $ASSETIO_DEFAULT_CONFIG)")]
        config: Option<PathBuf>,
        #[arg(long = "trait", required = true, help = "Trait id to resolve (repeatable)")]
        traits: Vec<String>,
        #[arg(long, value_enum, default_value = "read", help = "Resolve access mode")]
        access: AccessCli,
        #[arg(long, help = "Stop at the first element error")]
        fail_fast: bool,
        #[arg(required = true, help = "Entity references")]
        references: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AccessCli {
    Read,
    ManagerDriven,
}

impl From<AccessCli> for ResolveAccess {
    fn from(access: AccessCli) -> Self {
        match access {
            AccessCli::Read => ResolveAccess::Read,
            AccessCli::ManagerDriven => ResolveAccess::ManagerDriven,
        }
    }
}

struct CliHost;

impl HostInterface for CliHost {
    fn identifier(&self) -> String {
        "org.assetio.cli".to_string()
    }

    fn display_name(&self) -> String {
        "assetio CLI".to_string()
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage).with_message(clap_error_summary(&err)));
            }
        },
    };

    let host: Arc<dyn HostInterface> = Arc::new(CliHost);
    let registry: Arc<dyn ManagerImplementationFactoryInterface> =
        Arc::new(ManagerRegistry::with_builtin());
    let logger: Arc<dyn LoggerInterface> =
        Arc::new(SeverityFilter::new(Arc::new(TracingLogger::new())));

    match cli.command {
        Command::Managers => {
            let factory = ManagerFactory::new(host, registry, logger);
            let managers = factory
                .available_managers()?
                .into_values()
                .map(|detail| {
                    json!({
                        "identifier": detail.identifier,
                        "display_name": detail.display_name,
                        "info": info_dictionary_json(&detail.info),
                    })
                })
                .collect::<Vec<_>>();
            emit_json(json!({ "managers": managers }));
            Ok(RunOutcome::ok())
        }
        Command::Config { path } => {
            let config = load_default_manager_config(&path)?;
            emit_json(json!({
                "identifier": config.identifier,
                "settings": info_dictionary_json(&config.settings),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Resolve {
            config,
            traits,
            access,
            fail_fast,
            references,
        } => {
            let manager = match config {
                Some(path) => ManagerFactory::default_manager_for_interface_from_path(
                    &path, &host, &registry, &logger,
                )?,
                None => ManagerFactory::default_manager_for_interface(&host, &registry, &logger)?
                    .ok_or_else(|| {
                        Error::new(ErrorKind::Usage).with_message(format!(
                            "no default manager configured; pass --config or set {DEFAULT_CONFIG_ENV_VAR}"
                        ))
                    })?,
            };
            let trait_set: TraitSet = traits.into_iter().collect();
            let references: Vec<EntityReference> =
                references.into_iter().map(EntityReference::from).collect();
            resolve(&manager, &references, &trait_set, access.into(), fail_fast)
        }
    }
}

fn resolve(
    manager: &Manager,
    references: &[EntityReference],
    trait_set: &TraitSet,
    access: ResolveAccess,
    fail_fast: bool,
) -> Result<RunOutcome, Error> {
    let context = Context::new().into_shared();
    if fail_fast {
        let datas = manager.resolve(references, trait_set, access, &context, policy::Default)?;
        for (index, (reference, data)) in references.iter().zip(datas).enumerate() {
            emit_json(json!({
                "index": index,
                "entity": reference.as_str(),
                "traits": data.to_json(),
            }));
        }
        return Ok(RunOutcome::ok());
    }

    let outcomes = manager.resolve(references, trait_set, access, &context, policy::Variant)?;
    let mut failed = false;
    for (index, (reference, outcome)) in references.iter().zip(outcomes).enumerate() {
        let value = match outcome {
            Ok(data) => json!({
                "index": index,
                "entity": reference.as_str(),
                "traits": data.to_json(),
            }),
            Err(error) => {
                failed = true;
                json!({
                    "index": index,
                    "entity": reference.as_str(),
                    "error": { "code": error.code.name(), "message": error.message },
                })
            }
        };
        emit_json(value);
    }
    if failed {
        return Ok(RunOutcome::with_code(to_exit_code(ErrorKind::BatchElement)));
    }
    Ok(RunOutcome::ok())
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        for cause in error_causes(err) {
            eprintln!("  caused by: {cause}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    if let Some(element) = err.batch_element() {
        inner.insert("code".to_string(), json!(element.code.name()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_message(err: &Error) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", err.kind()))
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        causes.push(source.to_string());
        current = source.source();
    }
    causes
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
