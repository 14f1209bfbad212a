/**
 * Angular Incremental - ng-incremental
 *
 * Computes the re-emit plan of one rebuild from the reflected source units
 */
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use angular_incremental::ngtsc::file_system::AbsoluteFsPath;
use angular_incremental::ngtsc::reflection::SourceUnit;
use angular_incremental::{IncrementalCompilation, IncrementalOptions};

fn main() {
    let matches = Command::new("ng-incremental")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Angular incremental rebuild planner")
        .arg(
            Arg::new("units")
                .short('u')
                .long("units")
                .value_name("PATH")
                .required(true)
                .help("JSON file with the reflected source units of this build"),
        )
        .arg(
            Arg::new("changed")
                .short('c')
                .long("changed")
                .value_name("FILE")
                .action(ArgAction::Append)
                .help("A source unit changed since the last build (repeatable)"),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PATH")
                .help("Project file with an `incremental` section"),
        )
        .arg(
            Arg::new("snapshot")
                .short('s')
                .long("snapshot")
                .value_name("PATH")
                .help("Graph snapshot of the previous build; overrides the project setting"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the plan without updating the snapshot"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log propagation details"),
        )
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    let args = Args {
        units: PathBuf::from(matches.get_one::<String>("units").cloned().unwrap_or_default()),
        changed: matches
            .get_many::<String>("changed")
            .map(|values| values.map(AbsoluteFsPath::from_path).collect())
            .unwrap_or_default(),
        project: matches.get_one::<String>("project").map(PathBuf::from),
        snapshot: matches.get_one::<String>("snapshot").map(PathBuf::from),
        dry_run: matches.get_flag("dry-run"),
    };

    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

struct Args {
    units: PathBuf,
    changed: BTreeSet<AbsoluteFsPath>,
    project: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    dry_run: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut options = match &args.project {
        Some(path) => IncrementalOptions::load(path)
            .with_context(|| format!("failed to load project file {}", path.display()))?,
        None => IncrementalOptions::default(),
    };
    if args.snapshot.is_some() {
        options.snapshot_path = args.snapshot;
    }

    let content = fs::read_to_string(&args.units)
        .with_context(|| format!("failed to read {}", args.units.display()))?;
    let units: Vec<SourceUnit> = serde_json::from_str(&content)
        .with_context(|| format!("malformed source units in {}", args.units.display()))?;

    let mut compilation = IncrementalCompilation::from_options(options);
    let pass = compilation.begin_pass(&units, &args.changed);
    let plan = pass.plan();

    if plan.full_rebuild {
        println!("Full rebuild ({} units)", plan.units.len());
    } else {
        println!("Re-emitting {} of {} units", plan.units.len(), units.len());
    }
    for artifact in plan.artifacts(compilation.options()) {
        println!(
            "  {} -> {}, {}",
            artifact.source,
            artifact.primary.display(),
            artifact.declaration.display()
        );
    }
    let type_check_only: Vec<_> = plan.type_check_units.difference(&plan.units).collect();
    if !type_check_only.is_empty() {
        println!("Type-check only:");
        for unit in type_check_only {
            println!("  {}", unit);
        }
    }

    if !args.dry_run {
        compilation.record_successful_pass(pass);
        compilation.save_snapshot().context("failed to save graph snapshot")?;
    }
    Ok(())
}
