use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use seg7_sim::hardware::HardwareDescription;
use seg7_sim::Simulator;

/// seg7-sim - drive simulated seven-segment displays through the seg7 driver
///
/// Each command is written to the device file as-is: a display digit
/// followed by a value digit, e.g. `05` shows 5 on display 0.
#[derive(Parser, Debug)]
#[command(name = "seg7-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board description file
    #[arg(value_name = "BOARD_FILE")]
    board: PathBuf,

    /// Commands to write; read from stdin, one per line, when omitted
    #[arg(value_name = "COMMAND")]
    commands: Vec<String>,

    /// Debug verbosity level (0=warn, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    let description = HardwareDescription::load(&cli.board)
        .with_context(|| format!("loading {}", cli.board.display()))?;
    let mut sim = Simulator::start(&description)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", sim.render())?;

    if cli.commands.is_empty() {
        for line in io::stdin().lock().lines() {
            step(&mut sim, &mut out, line?.as_bytes())?;
        }
    } else {
        for command in &cli.commands {
            step(&mut sim, &mut out, command.as_bytes())?;
        }
    }

    let report = sim.shutdown();
    info!(
        "released {} displays ({} lines failed)",
        report.displays, report.failed_lines
    );
    Ok(())
}

/// Write one command and redraw on success
fn step(sim: &mut Simulator, out: &mut impl Write, input: &[u8]) -> Result<()> {
    // Rejected writes are already logged; keep going
    if sim.write(input).is_ok() {
        writeln!(out, "{}", sim.render())?;
    }
    Ok(())
}
