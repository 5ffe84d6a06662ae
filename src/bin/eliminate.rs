//! Print which teams of a division are eliminated, and by whom.
//!
//! Usage: eliminate <PATH> [--format auto|standings|csv] [--solver edmonds-karp|dinic] [--json]
//! Log level from RUST_LOG (default info).

use clap::{Parser, ValueEnum};
use division_elimination::{load_division_as, Elimination, EliminationEngine, Format, Solver};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Auto,
    Standings,
    Csv,
}

impl From<FormatArg> for Format {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Auto => Format::Auto,
            FormatArg::Standings => Format::Standings,
            FormatArg::Csv => Format::Csv,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SolverArg {
    EdmondsKarp,
    Dinic,
}

impl From<SolverArg> for Solver {
    fn from(s: SolverArg) -> Self {
        match s {
            SolverArg::EdmondsKarp => Solver::EdmondsKarp,
            SolverArg::Dinic => Solver::Dinic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "eliminate", about = "Find mathematically eliminated teams in a division")]
struct Args {
    /// Standings file (text or CSV)
    path: PathBuf,

    #[arg(long, value_enum, default_value = "auto")]
    format: FormatArg,

    #[arg(long, value_enum, default_value = "edmonds-karp")]
    solver: SolverArg,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Report lines, or the report as pretty JSON.
fn render(report: &[Elimination], json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(report);
    }
    Ok(report
        .iter()
        .map(|result| format!("{}\n", result))
        .collect())
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let division = load_division_as(&args.path, args.format.into())?;
    let report = EliminationEngine::with_solver(&division, Solver::from(args.solver)).report()?;
    Ok(render(&report, args.json)?)
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            if args.json {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
