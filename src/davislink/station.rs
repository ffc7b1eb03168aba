use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use clap::{Args, ValueEnum};
use davislink::{
    ArchiveRecord, FileSink, LinkConfig, Station,
    constants::DEFAULT_BAUD_RATE,
    cycle::{Backoff, CycleOutcome, run_cycle, run_forever},
    error::DavisResult,
    interface::serialport::available_ports,
};
use serialport::{DataBits, Parity, StopBits};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ParityArg {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum StopBitsArg {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum DataBitsArg {
    #[value(name = "5")]
    Five,
    #[value(name = "6")]
    Six,
    #[value(name = "7")]
    Seven,
    #[value(name = "8")]
    Eight,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LinkOptions {
    /// Serial port the console is attached to
    #[clap(short, long)]
    serial: String,

    /// Baud rate
    #[clap(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baudrate: u32,

    #[clap(long, value_enum, default_value = "none")]
    parity: ParityArg,

    #[clap(long, value_enum, default_value = "one")]
    stop_bits: StopBitsArg,

    #[clap(long, value_enum, default_value = "8")]
    data_bits: DataBitsArg,
}

impl LinkOptions {
    fn link_config(&self) -> LinkConfig {
        let mut config = LinkConfig::new(self.serial.clone(), self.baudrate);
        config.parity = match self.parity {
            ParityArg::None => Parity::None,
            ParityArg::Odd => Parity::Odd,
            ParityArg::Even => Parity::Even,
        };
        config.stop_bits = match self.stop_bits {
            StopBitsArg::One => StopBits::One,
            StopBitsArg::Two => StopBits::Two,
        };
        config.data_bits = match self.data_bits {
            DataBitsArg::Five => DataBits::Five,
            DataBitsArg::Six => DataBits::Six,
            DataBitsArg::Seven => DataBits::Seven,
            DataBitsArg::Eight => DataBits::Eight,
        };
        config
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SinkOptions {
    /// Archive root, one sub-directory per day
    #[clap(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Fixed file always holding a copy of the latest archive
    #[clap(short, long, default_value = "pipe/vantage2pro.csv")]
    mirror: PathBuf,
}

impl SinkOptions {
    fn file_sink(&self) -> FileSink {
        FileSink::new(self.data_dir.clone(), self.mirror.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct RunOptions {
    #[command(flatten)]
    link: LinkOptions,

    #[command(flatten)]
    sink: SinkOptions,

    /// Seconds between successful polls
    #[clap(short, long, default_value_t = 5)]
    interval_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct OnceOptions {
    #[command(flatten)]
    link: LinkOptions,

    #[command(flatten)]
    sink: SinkOptions,

    /// Also archive and publish the sample
    #[clap(short, long, default_value_t = false)]
    archive: bool,
}

fn start_banner(config: &LinkConfig, now: NaiveDateTime) -> String {
    format!(
        "Program start @ {} on {} polling {} at {} baud",
        now.format("%Y-%m-%d %H:%M:%S"),
        std::env::consts::OS,
        config.port,
        config.baud
    )
}

pub(crate) fn handle_run(opts: RunOptions) -> ! {
    let config = opts.link.link_config();
    info!("{}", start_banner(&config, Local::now().naive_local()));

    let mut station = Station::new(config);
    let mut sink = opts.sink.file_sink();
    let backoff = Backoff {
        cadence: Duration::from_secs(opts.interval_secs),
        ..Backoff::default()
    };

    run_forever(&mut station, &mut sink, &backoff)
}

pub(crate) fn handle_once(opts: OnceOptions) -> DavisResult<()> {
    let mut station = Station::new(opts.link.link_config());

    if !opts.archive {
        let sample = station.acquire()?;
        let record = ArchiveRecord {
            captured_at: Local::now().naive_local(),
            sample,
        };
        println!("{}", record);
        return Ok(());
    }

    let mut sink = opts.sink.file_sink();
    let report = run_cycle(&mut station, &mut sink, &Backoff::default());
    match report.outcome {
        CycleOutcome::Acquired {
            record, archived, ..
        } => {
            println!("{}", record);
            if let Some(path) = archived {
                println!("{}", path.display());
            }
            Ok(())
        }
        CycleOutcome::Failed(e) => Err(e),
    }
}

pub(crate) fn handle_ports() -> DavisResult<()> {
    for port in available_ports()? {
        match port.description {
            Some(description) => println!("{}\t{}", port.name, description),
            None => println!("{}", port.name),
        }
    }
    Ok(())
}
