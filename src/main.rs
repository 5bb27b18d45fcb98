//! variant-plan CLI
//!
//! Entry point for the `variant-plan` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use variant_plan::model::MultidexPolicy;
use variant_plan::{load_layered, resolve_with, Error, PlanReport, ResolveOptions};

#[derive(Parser)]
#[command(name = "variant-plan")]
#[command(about = "Resolve Android build-variant configuration into build plans", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to project config file
    #[arg(long, short = 'c', default_value = "variant.toml")]
    config: PathBuf,

    /// Path to host config file (applied below the project config)
    #[arg(long)]
    host_config: Option<PathBuf>,

    /// Override a config value, e.g. --set platform.min_sdk=24 (repeatable).
    /// Quote the value to force a string: --set app.version_name='"2"'
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MultidexChoice {
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the build plan for one build type
    Resolve {
        /// Build type to resolve (e.g. debug, release)
        #[arg(long, short = 'b')]
        build_type: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Force the multidex decision instead of the configured policy
        #[arg(long, value_enum, conflicts_with = "method_count")]
        multidex: Option<MultidexChoice>,

        /// Method-reference count estimated by the build host
        #[arg(long)]
        method_count: Option<u64>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// List configured build types
    List {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the configuration without resolving
    Verify {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            build_type,
            config,
            multidex,
            method_count,
            human,
        } => {
            let policy = match (multidex, method_count) {
                (Some(MultidexChoice::Always), _) => Some(MultidexPolicy::Always),
                (Some(MultidexChoice::Never), _) => Some(MultidexPolicy::Never),
                (None, Some(method_count)) => Some(MultidexPolicy::Estimate { method_count }),
                (None, None) => None,
            };
            run_resolve(&build_type, &config, ResolveOptions { multidex: policy }, human)
        }
        Commands::List { config, json } => run_list(&config, json),
        Commands::Verify { config } => run_verify(&config),
    };

    if let Err(e) = result {
        report_error(&e);
        process::exit(1);
    }
}

fn run_resolve(
    build_type: &str,
    args: &ConfigArgs,
    options: ResolveOptions,
    human: bool,
) -> Result<(), Error> {
    let (configuration, sources) =
        load_layered(args.host_config.as_deref(), Some(args.config.as_path()), &args.set)?;

    let plan = resolve_with(&configuration, build_type, &options)?;
    let report = PlanReport::new(plan, sources)?;

    if human {
        print!("{}", report.to_human());
    } else {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn run_list(args: &ConfigArgs, json_output: bool) -> Result<(), Error> {
    let (configuration, _) =
        load_layered(args.host_config.as_deref(), Some(args.config.as_path()), &args.set)?;

    if json_output {
        let output: Vec<serde_json::Value> = configuration
            .build_types
            .iter()
            .map(|bt| {
                serde_json::json!({
                    "name": bt.name,
                    "overrides": bt.overridden_fields(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Build types for {} ({} total):\n",
        configuration.identity.application_id,
        configuration.build_types.len()
    );
    for bt in &configuration.build_types {
        let overrides = bt.overridden_fields();
        if overrides.is_empty() {
            println!("  {} (inherits all defaults)", bt.name);
        } else {
            println!("  {} (overrides: {})", bt.name, overrides.join(", "));
        }
    }
    Ok(())
}

fn run_verify(args: &ConfigArgs) -> Result<(), Error> {
    let (configuration, sources) =
        load_layered(args.host_config.as_deref(), Some(args.config.as_path()), &args.set)?;

    println!("Configuration valid: {}", args.config.display());
    println!();
    println!("  Application id: {}", configuration.identity.application_id);
    println!(
        "  Version: {} ({})",
        configuration.identity.version_name, configuration.identity.version_code
    );
    println!(
        "  SDK: min {}, target {}, compile {}",
        configuration.bounds.min_sdk,
        configuration.bounds.target_sdk,
        configuration.bounds.compile_sdk
    );
    println!("  Build types: {}", configuration.build_type_names().join(", "));
    println!("  Default signing: {}", configuration.signing.default_ref);
    println!("  Layers: {}", sources.len());
    Ok(())
}

fn report_error(err: &Error) {
    let payload = err.to_payload();
    match serde_json::to_string(&serde_json::json!({ "error": payload })) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("Error: {}", err),
    }
}
