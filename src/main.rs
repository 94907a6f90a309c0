use std::io::Write;

use circuitgrader::import::{self, ImportError};
use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

/// Grades the circuit in a scene file against the tasks it defines.
#[derive(Debug, Parser)]
#[command(version, about, arg_required_else_help = true)]
struct Args {
    /// The scene file (json) with the gates, switches, indicators, wires and tasks.
    scene: String,

    /// Only print the total achievable score.
    #[arg(long)]
    max_score: bool,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Error, Debug)]
enum GraderError {
    #[error("failed to load scene, more details: {0}")]
    Import(#[from] ImportError),
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
}

fn configure_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new().format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args())).filter_level(level_filter).target(env_logger::Target::Stderr).init();
}

fn run() -> Result<(), GraderError> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let mut grader = import::load(&args.scene)?;
    let mut stdout = std::io::stdout().lock();
    if args.max_score {
        writeln!(stdout, "{}", grader.max_score())?;
    } else {
        write!(stdout, "{}", grader.grade_all())?;
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
