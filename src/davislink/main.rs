use std::path::PathBuf;

use clap::{Parser, Subcommand};
use davislink::error::DavisResult;
use logging::init_logger;
use station::{OnceOptions, RunOptions, handle_once, handle_ports, handle_run};

mod logging;
mod station;

#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
struct Cli {
    /// Log protocol steps and decoded fields
    #[clap(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Directory for rotating log files, created if missing
    #[clap(long, global = true, default_value = "log")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Poll the station forever, archiving every sample
    #[command(name = "run", alias = "r")]
    Run(RunOptions),

    /// Acquire one sample and print it
    #[command(name = "once", alias = "o")]
    Once(OnceOptions),

    /// List serial ports on this machine
    #[command(name = "ports")]
    Ports,
}

fn main() -> DavisResult<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, &cli.log_dir)?;

    match cli.command {
        Command::Run(opts) => handle_run(opts),
        Command::Once(opts) => handle_once(opts)?,
        Command::Ports => handle_ports()?,
    }

    Ok(())
}

