#![deny(unsafe_code)]
//! colonyctl: drive an in-memory Colony Network from the command line.
//!
//! - `run` executes a TOML scenario and reports each step
//! - `selector` prints the routing key of a function signature
//! - `layout` prints the frozen storage layout of a contract family

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colony_network::NetworkConfig;
use colony_storage::{layout_for, Family};
use colony_types::{selector::canonical_signature, Selector};
use tracing_subscriber::EnvFilter;

use scenario::{run_scenario, Scenario, StepOutcome};

#[derive(Parser)]
#[command(name = "colonyctl", about = "Colony Network dispatch, versioning and recovery toolkit")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. `info` or `colony_recovery=debug`
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario against a fresh in-memory network
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Network configuration, overriding the scenario's `[config]`
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the event log as JSON lines afterwards
        #[arg(long)]
        events: bool,
    },

    /// Print the selector of a function signature
    Selector { signature: String },

    /// Print the storage layout of a contract family
    Layout {
        #[arg(value_enum)]
        family: FamilyArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    Network,
    Colony,
    Extension,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Network => Family::Network,
            FamilyArg::Colony => Family::Colony,
            FamilyArg::Extension => Family::Extension,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid log filter")?)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            events,
        } => run(scenario, config, events),
        Commands::Selector { signature } => {
            let canonical = canonical_signature(&signature);
            println!("{}  {}", Selector::from_signature(&canonical), canonical);
            Ok(())
        }
        Commands::Layout { family } => {
            print_layout(family.into());
            Ok(())
        }
    }
}

fn run(path: PathBuf, config: Option<PathBuf>, events: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(&path).with_context(|| format!("loading {}", path.display()))?;
    let config = config
        .map(|p| NetworkConfig::load(&p).with_context(|| format!("loading {}", p.display())))
        .transpose()?;

    let (runner, reports) = run_scenario(&scenario, config)?;
    for report in &reports {
        match &report.outcome {
            StepOutcome::Done => println!("   [OK]  {:>3}  {}", report.index, report.op),
            StepOutcome::Rejected(code) => {
                println!("   [--]  {:>3}  {}  rejected: {}", report.index, report.op, code)
            }
        }
    }
    println!("   {} steps, {} events", reports.len(), runner.network().events().len());

    if events {
        print!("{}", runner.network().events().to_json_lines()?);
    }
    Ok(())
}

fn print_layout(family: Family) {
    let layout = layout_for(family);
    println!("{} layout", family);
    for field in layout.fields {
        let protected = match field.kind {
            colony_storage::FieldKind::Scalar => layout.protected_slots.contains(&field.index),
            colony_storage::FieldKind::Mapping => layout.protected_mappings.contains(&field.index),
        };
        println!(
            "  {:>3}  {:<8}  {:<32}{}",
            field.index,
            format!("{:?}", field.kind),
            field.name,
            if protected { "  protected" } else { "" }
        );
    }
}
