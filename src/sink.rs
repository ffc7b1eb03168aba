use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{DavisError, DavisResult};
use crate::protocols::vantage::loop_packet::DecodedSample;
use crate::util::decimal_comma;

/// A decoded sample as written to the archive:
/// `temperature;humidity;pressure;wind speed;wind direction;rainfall`
/// with `,` as the decimal separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveRecord {
    pub captured_at: NaiveDateTime,
    pub sample: DecodedSample,
}

impl fmt::Display for ArchiveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sample;
        // Humidity and direction are integral counts on the wire
        write!(
            f,
            "{};{:.0};{};{};{:.0};{}",
            decimal_comma(s.temperature),
            s.humidity,
            decimal_comma(s.pressure),
            decimal_comma(s.wind_speed),
            s.wind_direction,
            decimal_comma(s.rainfall)
        )
    }
}

/// Where acquired samples go.
pub trait SampleSink {
    /// Persist the sample, returning the archive file it was written to
    fn archive(&mut self, sample: &DecodedSample, captured_at: NaiveDateTime)
    -> DavisResult<PathBuf>;

    /// Mirror an archived file to the downstream consumer's location
    fn publish(&mut self, archived: &Path) -> DavisResult<()>;
}

/// Per-day archive directories under `data_dir`, latest file copied to `mirror`.
#[derive(Debug, Clone)]
pub struct FileSink {
    data_dir: PathBuf,
    mirror: PathBuf,
}

impl FileSink {
    pub fn new(data_dir: impl Into<PathBuf>, mirror: impl Into<PathBuf>) -> Self {
        FileSink {
            data_dir: data_dir.into(),
            mirror: mirror.into(),
        }
    }

    /// `<data_dir>/YYYYMMDD/davis_YYYYMMDD-HHMMSS.dat`
    pub fn archive_path(&self, captured_at: NaiveDateTime) -> PathBuf {
        self.data_dir
            .join(captured_at.format("%Y%m%d").to_string())
            .join(format!("davis_{}.dat", captured_at.format("%Y%m%d-%H%M%S")))
    }

    pub fn mirror_path(&self) -> &Path {
        &self.mirror
    }
}

impl SampleSink for FileSink {
    fn archive(
        &mut self,
        sample: &DecodedSample,
        captured_at: NaiveDateTime,
    ) -> DavisResult<PathBuf> {
        let path = self.archive_path(captured_at);
        if let Some(day_dir) = path.parent() {
            fs::create_dir_all(day_dir).map_err(|e| {
                DavisError::Sink(format!("Failed to create {}: {}", day_dir.display(), e))
            })?;
        }

        let record = ArchiveRecord {
            captured_at,
            sample: *sample,
        };
        debug!("Saving data to file {}", path.display());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DavisError::Sink(format!("Failed to open {}: {}", path.display(), e)))?;
        write!(file, "{}", record)
            .map_err(|e| DavisError::Sink(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path)
    }

    fn publish(&mut self, archived: &Path) -> DavisResult<()> {
        debug!("Copying to mirror path {}", self.mirror.display());
        if let Some(parent) = self.mirror.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DavisError::Sink(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::copy(archived, &self.mirror).map_err(|e| {
            DavisError::Sink(format!(
                "Failed to copy {} to {}: {}",
                archived.display(),
                self.mirror.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> DecodedSample {
        DecodedSample {
            temperature: 23.89,
            humidity: 55.0,
            pressure: 1013.24,
            wind_speed: 4.47,
            wind_direction: 270.0,
            rainfall: 0.0,
        }
    }

    fn captured_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 5, 31)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap()
    }

    #[test]
    fn record_uses_comma_decimals_and_semicolons() {
        let record = ArchiveRecord {
            captured_at: captured_at(),
            sample: sample(),
        };
        assert_eq!(record.to_string(), "23,89;55;1013,24;4,47;270;0,0");
    }

    #[test]
    fn record_keeps_sign_of_cold_readings() {
        let mut cold = sample();
        cold.temperature = -10.0;
        let record = ArchiveRecord {
            captured_at: captured_at(),
            sample: cold,
        };
        assert!(record.to_string().starts_with("-10,0;"));
    }

    #[test]
    fn archive_path_is_keyed_by_date_and_timestamp() {
        let sink = FileSink::new("/var/davis/data", "/var/davis/pipe/vantage2pro.csv");
        assert_eq!(
            sink.archive_path(captured_at()),
            PathBuf::from("/var/davis/data/20180531/davis_20180531-140309.dat")
        );
    }

    #[test]
    fn archive_creates_day_directory_and_writes_record() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("data"), dir.path().join("mirror.csv"));

        let path = sink.archive(&sample(), captured_at()).unwrap();
        assert!(path.starts_with(dir.path().join("data").join("20180531")));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "23,89;55;1013,24;4,47;270;0,0"
        );
    }

    #[test]
    fn publish_mirrors_latest_archive() {
        let dir = TempDir::new().unwrap();
        let mirror = dir.path().join("pipe").join("vantage2pro.csv");
        let mut sink = FileSink::new(dir.path().join("data"), &mirror);

        let first = sink.archive(&sample(), captured_at()).unwrap();
        sink.publish(&first).unwrap();

        let mut warmer = sample();
        warmer.temperature = 25.5;
        let later = captured_at() + chrono::TimeDelta::seconds(5);
        let second = sink.archive(&warmer, later).unwrap();
        sink.publish(&second).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            fs::read_to_string(&mirror).unwrap(),
            "25,5;55;1013,24;4,47;270;0,0"
        );
    }

    #[test]
    fn publish_failure_is_a_sink_error() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("data"), dir.path().join("mirror.csv"));

        let missing = dir.path().join("nope.dat");
        assert!(matches!(sink.publish(&missing), Err(DavisError::Sink(_))));
    }
}
