//! `geokig`: opens a `.kig` or `.kgeo` file and reports what it found. The
//! computational core has no UI of its own (spec's Non-goals exclude
//! rendering); this binary exists to exercise it from a terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "geokig", about = "Load a Kig or KGeo geometry document")]
struct Cli {
    /// A local `.kig` or `.kgeo` path.
    path: Option<PathBuf>,

    /// Increase log verbosity; repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let Some(path) = cli.path else {
        eprintln!("usage: geokig <path.kig|path.kgeo>");
        return ExitCode::FAILURE;
    };

    match geo_codec::open(&path) {
        Ok((doc, metrics)) => {
            println!("loaded {} objects from {}", doc.len(), path.display());
            if let Some(m) = metrics {
                println!("kgeo metrics: {}x{}", m.x_max, m.y_max);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to load {}: {e}", path.display());
            ExitCode::FAILURE
        }
    }
}
