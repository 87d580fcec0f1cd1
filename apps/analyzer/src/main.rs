//! Analyzer CLI binary entry point.
//! Delegates to the library for analysis and prints results.

use analyzer::analyze::{self, Options};
use analyzer::cli::{Cli, Commands};
use analyzer::config;
use analyzer::error::AnalyzerError;
use analyzer::exercises::Catalogue;
use analyzer::output;
use analyzer::utils::{error_prefix, note_prefix};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "analyzer=debug" } else { "analyzer=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fail(err: AnalyzerError) -> ! {
    eprintln!("{} {}", error_prefix(), err);
    std::process::exit(2);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Analyze {
            exercise,
            solutions,
            root,
            output,
            write,
            goodness,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                output.as_deref(),
                if write { Some(true) } else { None },
            )
            .unwrap_or_else(|e| fail(e));
            // Friendly note if no analyzer config was found
            if eff.config_path.is_none() && eff.output != "json" {
                eprintln!(
                    "{} No analyzer.toml found in {}; using defaults.",
                    note_prefix(),
                    eff.root.to_string_lossy()
                );
            }

            let catalogue = Catalogue::builtin();
            let ex = catalogue.get(&exercise).unwrap_or_else(|e| fail(e));
            let opts = Options {
                goodness,
                severity: eff.severity_for(ex.slug()),
            };
            let dirs: Vec<PathBuf> = solutions.iter().map(PathBuf::from).collect();

            let mut reports = Vec::with_capacity(dirs.len());
            let mut failed = false;
            for res in analyze::analyze_all(ex, &dirs, &opts) {
                match res {
                    Ok(r) => reports.push(r),
                    Err(e) => {
                        eprintln!("{} {}", error_prefix(), e);
                        failed = true;
                    }
                }
            }

            if let Err(e) = output::print_reports(&reports, &eff.output) {
                fail(e);
            }
            if eff.write {
                for r in &reports {
                    match output::write_analysis(Path::new(&r.solution), &r.result) {
                        Ok(path) => tracing::debug!(path = %path.display(), "wrote analysis"),
                        Err(e) => {
                            eprintln!("{} {}", error_prefix(), e);
                            failed = true;
                        }
                    }
                }
            }
            if failed {
                std::process::exit(2);
            }
        }
        Commands::Exercises { output } => {
            let out = output.unwrap_or_else(|| "human".to_string());
            if let Err(e) = output::print_exercises(&Catalogue::builtin(), &out) {
                fail(e);
            }
        }
    }
}
