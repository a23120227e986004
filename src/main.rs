//! Skill Index CLI
//!
//! Entry point for the `skill-index` command-line tool.

use clap::{Parser, Subcommand};
use skill_index::pipeline::{self, ExitCode};
use skill_index::IndexError;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "skill-index")]
#[command(about = "Content-hash index and duplicate check for skill collections", version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the collection, hash every skill, report duplicates and save the index
    BuildIndex {
        /// Collection root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check whether a candidate skill duplicates one already indexed
    Check {
        /// Candidate SKILL.md to check
        candidate: PathBuf,

        /// Collection root holding the index (default: current directory)
        #[arg(long, short = 'r', default_value = ".")]
        root: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the persisted index
    Show {
        /// Collection root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::BuildIndex { root, json } => run_build_index(&root, json),
        Commands::Check {
            candidate,
            root,
            json,
        } => run_check(&candidate, &root, json),
        Commands::Show { root, json } => run_show(&root, json),
    };

    process::exit(code.as_i32());
}

fn init_tracing(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_build_index(root: &Path, json: bool) -> ExitCode {
    if !json {
        println!("Scanning skills and computing hashes...\n");
    }

    let run = match pipeline::build_and_save(root) {
        Ok(run) => run,
        Err(e) => return report_error("Index build failed", &e),
    };

    let report = run.report();
    if json {
        match report.to_json() {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::Failure;
            }
        }
    } else {
        print!("{}", report.to_human());
    }

    run.exit_code()
}

fn run_check(candidate: &Path, root: &Path, json: bool) -> ExitCode {
    let run = match pipeline::check(candidate, root) {
        Ok(run) => run,
        Err(e) => return report_error("Duplicate check failed", &e),
    };

    let report = run.report();
    if json {
        match report.to_json() {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::Failure;
            }
        }
    } else {
        print!("{}", report.to_human());
    }

    run.exit_code()
}

fn run_show(root: &Path, json: bool) -> ExitCode {
    let listing = match pipeline::listing(root) {
        Ok(listing) => listing,
        Err(e) => return report_error("Cannot read index", &e),
    };

    if json {
        match listing.to_json() {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::Failure;
            }
        }
    } else {
        print!("{}", listing.to_human());
    }

    ExitCode::Success
}

fn report_error(context: &str, err: &IndexError) -> ExitCode {
    eprintln!("{}: {}", context, err);
    if let IndexError::Format { .. } = err {
        eprintln!("The index file is not trusted; rebuild it with `skill-index build-index`.");
    }
    ExitCode::Failure
}
