//! Resource reference resolution CLI
//!
//! Entry point for the `resref` command-line tool.

use clap::{Parser, Subcommand};
use resref_merge::config::{compare_layers, EffectiveRefs, ResolveError};
use resref_merge::DescriptorLayer;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resref")]
#[command(about = "Resolve layered resource reference declarations", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge layer files into the effective resource references
    Merge {
        /// Layer files (TOML); ordered by origin, then by position
        #[arg(required = true)]
        layers: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Write the effective snapshot to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Report every difference between same-named references of two layers
    Compare {
        left: PathBuf,

        right: PathBuf,

        /// Only compare this reference
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Print a previously written snapshot
    Show {
        snapshot: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Merge {
            layers,
            json,
            output,
        } => run_merge(&layers, json, output),
        Commands::Compare { left, right, name } => run_compare(left, right, name.as_deref()),
        Commands::Show { snapshot, json } => run_show(snapshot, json),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_merge(paths: &[PathBuf], json_output: bool, output: Option<PathBuf>) {
    let layers = match EffectiveRefs::load_layers(paths) {
        Ok(layers) => layers,
        Err(e) => {
            eprintln!("Error loading layers: {}", e);
            process::exit(1);
        }
    };

    let effective = match EffectiveRefs::build(layers) {
        Ok(effective) => effective,
        Err(ResolveError::Conflicts(errors)) => {
            eprintln!("{} conflicting resource reference(s):", errors.len());
            for e in errors {
                eprintln!();
                eprintln!("{}", e);
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error resolving references: {}", e);
            process::exit(1);
        }
    };

    if let Some(ref path) = output {
        if let Err(e) = effective.write_to_file(path) {
            eprintln!("Error writing snapshot {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    print_effective(&effective, json_output);
}

fn run_compare(left: PathBuf, right: PathBuf, name: Option<&str>) {
    let loaded = (DescriptorLayer::load(&left), DescriptorLayer::load(&right));
    let (left_layer, right_layer) = match loaded {
        (Ok(l), Ok(r)) => (l, r),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error loading layers: {}", e);
            process::exit(1);
        }
    };

    let differences = compare_layers(&left_layer, &right_layer, name);
    if differences.is_empty() {
        println!(
            "{} and {} agree",
            left_layer.label(),
            right_layer.label()
        );
        return;
    }

    for (reference, conflicts) in &differences {
        println!("{}:", reference);
        for conflict in conflicts {
            println!("  {}", conflict);
        }
    }
    process::exit(1);
}

fn run_show(path: PathBuf, json_output: bool) {
    match EffectiveRefs::read_from_file(&path) {
        Ok(effective) => print_effective(&effective, json_output),
        Err(e) => {
            eprintln!("Error reading snapshot: {}", e);
            process::exit(1);
        }
    }
}

fn print_effective(effective: &EffectiveRefs, json_output: bool) {
    if json_output {
        match effective.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Sources:");
    for source in &effective.sources {
        match source.path {
            Some(ref path) => println!("  [{}] {:?} {}", source.index, source.origin, path),
            None => println!("  [{}] {:?}", source.index, source.origin),
        }
    }
    println!();
    println!("References: {}", effective.references.len());
    for config in &effective.references {
        println!("  {}", config);
    }
    println!();
    println!("Digest: {}", effective.snapshot_digest);
}
