//! One polling cycle: acquire, archive, publish, and decide how long to wait
//! before the next one.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use crate::Station;
use crate::constants::{LINK_BACKOFF_SECS, NO_DATA_BACKOFF_SECS, POLL_CADENCE_SECS};
use crate::error::DavisError;
use crate::sink::{ArchiveRecord, SampleSink};

/// Delay before the next cycle, by how the last one ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// After a successful cycle
    pub cadence: Duration,
    /// No frame or a wrongly sized one
    pub no_data: Duration,
    /// Port would not open, transport failure, or the console never woke up
    pub link_failure: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            cadence: Duration::from_secs(POLL_CADENCE_SECS),
            no_data: Duration::from_secs(NO_DATA_BACKOFF_SECS),
            link_failure: Duration::from_secs(LINK_BACKOFF_SECS),
        }
    }
}

impl Backoff {
    pub fn delay_for(&self, error: &DavisError) -> Duration {
        match error {
            DavisError::Link(_) | DavisError::HandshakeTimeout { .. } => self.link_failure,
            DavisError::FrameLengthMismatch { .. } => self.no_data,
            // Neither fails a cycle, treat as success if one leaks here
            DavisError::Sink(_) | DavisError::Config(_) => self.cadence,
        }
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// A sample was decoded. `archived` is `None` when the archive write
    /// failed; the sample is still valid.
    Acquired {
        record: ArchiveRecord,
        archived: Option<PathBuf>,
        published: bool,
    },
    Failed(DavisError),
}

#[derive(Debug)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub next_delay: Duration,
}

/// Run one cycle stamped with the local wall clock
pub fn run_cycle(
    station: &mut Station,
    sink: &mut dyn SampleSink,
    backoff: &Backoff,
) -> CycleReport {
    run_cycle_at(station, sink, backoff, || Local::now().naive_local())
}

/// Run one cycle; `now` is consulted once, right after a successful acquisition.
pub fn run_cycle_at(
    station: &mut Station,
    sink: &mut dyn SampleSink,
    backoff: &Backoff,
    now: impl FnOnce() -> NaiveDateTime,
) -> CycleReport {
    let sample = match station.acquire() {
        Ok(sample) => sample,
        Err(e) => {
            let next_delay = backoff.delay_for(&e);
            warn!("Cycle failed: {}, retrying in {:?}", e, next_delay);
            return CycleReport {
                outcome: CycleOutcome::Failed(e),
                next_delay,
            };
        }
    };

    let record = ArchiveRecord {
        captured_at: now(),
        sample,
    };

    let (archived, published) = match sink.archive(&record.sample, record.captured_at) {
        Ok(path) => {
            info!("Archived {} to {}", record, path.display());
            let published = match sink.publish(&path) {
                Ok(()) => true,
                Err(e) => {
                    error!("{}", e);
                    false
                }
            };
            (Some(path), published)
        }
        Err(e) => {
            error!("{}", e);
            (None, false)
        }
    };

    CycleReport {
        outcome: CycleOutcome::Acquired {
            record,
            archived,
            published,
        },
        next_delay: backoff.cadence,
    }
}

/// Poll the station forever. Domain errors only ever lengthen the wait.
pub fn run_forever(station: &mut Station, sink: &mut dyn SampleSink, backoff: &Backoff) -> ! {
    loop {
        let report = run_cycle(station, sink, backoff);
        thread::sleep(report.next_delay);
    }
}
