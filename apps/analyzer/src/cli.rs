//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "analyzer",
    version,
    about = "Static analyzer for Go exercise submissions",
    long_about = "Analyzer — runs an exercise's rules over a Go submission, aggregates findings, and decides whether to approve, disapprove, or refer it to a mentor.\n\nConfiguration precedence: CLI > analyzer.toml > defaults.",
    after_help = "Examples:\n  analyzer analyze two-fer solutions/alice\n  analyzer analyze two-fer solutions/* --output json\n  analyzer analyze two-fer solutions/alice --write\n  analyzer exercises",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current analyzer version."
    )]
    Version,
    /// Analyze one or more submissions
    #[command(
        about = "Analyze submissions",
        long_about = "Parse every non-test .go file in each solution directory, run the exercise rules, and print the decision. Any rule error refers the submission to a mentor.",
        after_help = "Examples:\n  analyzer analyze two-fer solutions/alice\n  analyzer analyze two-fer a b c --output json\n  analyzer analyze two-fer solutions/alice --goodness 1.0"
    )]
    Analyze {
        #[arg(help = "Exercise slug (e.g. two-fer)")]
        exercise: String,
        #[arg(required = true, num_args = 1.., help = "Solution directories")]
        solutions: Vec<String>,
        #[arg(long, help = "Project root used for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write analysis.json into each solution directory")]
        write: bool,
        #[arg(long, value_parser = parse_goodness, help = "Override the computed goodness score (0.0..=1.0)")]
        goodness: Option<f64>,
    },
    /// List known exercises
    #[command(
        about = "List exercises",
        long_about = "List the built-in exercises with their rule counts and severity tables."
    )]
    Exercises {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

/// Accepts a finite number in `[0, 1]`.
pub fn parse_goodness(s: &str) -> Result<f64, String> {
    let g: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", s))?;
    if !(0.0..=1.0).contains(&g) {
        return Err(format!("goodness must be within 0.0..=1.0, got {}", g));
    }
    Ok(g)
}
