#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDateTime;
use davislink::interface::{Connector, DeviceInterface};
use davislink::protocols::timing::{AcquirePolicy, RetryPolicy};
use davislink::{
    DavisError, DavisResult, DecodedSample, LinkConfig, ProtocolType, SampleSink, SerialLink,
    Station, VantageParams,
};

/// What the simulated console does and what it has seen
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub refuse_open: bool,
    pub broken: bool,
    pub wake_response: Vec<u8>,
    pub loop_response: Vec<u8>,
    pub rx: VecDeque<u8>,
    pub writes: Vec<Vec<u8>>,
    pub connects: u32,
    pub closes: u32,
}

/// In-memory console answering the wake-up request and the LOOP command
#[derive(Clone, Default)]
pub struct ScriptedConsole(pub Rc<RefCell<ConsoleState>>);

impl ScriptedConsole {
    pub fn new(wake_response: &[u8], loop_response: Vec<u8>) -> Self {
        let console = ScriptedConsole::default();
        {
            let mut state = console.0.borrow_mut();
            state.wake_response = wake_response.to_vec();
            state.loop_response = loop_response;
        }
        console
    }

    pub fn unreachable() -> Self {
        let console = ScriptedConsole::default();
        console.0.borrow_mut().refuse_open = true;
        console
    }

    pub fn state(&self) -> std::cell::RefMut<'_, ConsoleState> {
        self.0.borrow_mut()
    }

    pub fn station(&self) -> Station {
        let link = SerialLink::with_connector(
            LinkConfig::new("/dev/ttyVANTAGE", 19200),
            Box::new(self.clone()),
        );
        Station::from_protocol(link, ProtocolType::Vantage(fast_params()))
    }
}

struct ConsoleDevice {
    console: ScriptedConsole,
    open: bool,
}

impl DeviceInterface for ConsoleDevice {
    fn is_open(&self) -> bool {
        self.open
    }

    fn write(&mut self, bytes: &[u8]) -> DavisResult<()> {
        let mut state = self.console.state();
        if state.broken {
            return Err(DavisError::Link("write failed".to_string()));
        }
        state.writes.push(bytes.to_vec());
        let response = match bytes {
            b"\n" => state.wake_response.clone(),
            b"LOOP 1\n" => state.loop_response.clone(),
            _ => Vec::new(),
        };
        state.rx.extend(response);
        Ok(())
    }

    fn flush(&mut self) -> DavisResult<()> {
        Ok(())
    }

    fn read(&mut self, max: usize) -> DavisResult<Vec<u8>> {
        let mut state = self.console.state();
        let n = max.min(state.rx.len());
        Ok(state.rx.drain(..n).collect())
    }

    fn flush_input(&mut self) -> DavisResult<()> {
        self.console.state().rx.clear();
        Ok(())
    }

    fn flush_output(&mut self) -> DavisResult<()> {
        Ok(())
    }

    fn close(&mut self) -> DavisResult<()> {
        self.open = false;
        self.console.state().closes += 1;
        Ok(())
    }
}

impl Connector for ScriptedConsole {
    fn connect(&self, _config: &LinkConfig) -> DavisResult<Box<dyn DeviceInterface>> {
        let mut state = self.state();
        state.connects += 1;
        if state.refuse_open {
            return Err(DavisError::Link("No such file or directory".to_string()));
        }
        Ok(Box::new(ConsoleDevice {
            console: self.clone(),
            open: true,
        }))
    }
}

/// Same algorithm as the stock timings, scaled down to milliseconds
pub fn fast_params() -> VantageParams {
    VantageParams {
        wake_up: RetryPolicy {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(30),
            retry_delay: Duration::from_millis(10),
            poll_interval: Duration::from_millis(1),
        },
        acquire: AcquirePolicy {
            settle: Duration::from_millis(5),
            budget: Duration::from_millis(100),
            poll_interval: Duration::from_millis(5),
            read_chunk: 200,
        },
    }
}

/// 100-byte response with the given little-endian fields set
pub fn frame(fields: &[(usize, &[u8])]) -> Vec<u8> {
    let mut bytes = vec![0u8; 100];
    bytes[0] = 0x06;
    bytes[1..4].copy_from_slice(b"LOO");
    for (offset, value) in fields {
        bytes[*offset..*offset + value.len()].copy_from_slice(value);
    }
    bytes
}

/// Records calls instead of touching the filesystem
#[derive(Default)]
pub struct RecordingSink {
    pub archived: Vec<(DecodedSample, NaiveDateTime)>,
    pub published: Vec<PathBuf>,
    pub fail_archive: bool,
    pub fail_publish: bool,
}

impl SampleSink for RecordingSink {
    fn archive(
        &mut self,
        sample: &DecodedSample,
        captured_at: NaiveDateTime,
    ) -> DavisResult<PathBuf> {
        if self.fail_archive {
            return Err(DavisError::Sink("disk full".to_string()));
        }
        self.archived.push((*sample, captured_at));
        Ok(PathBuf::from(format!("archive-{}.dat", self.archived.len())))
    }

    fn publish(&mut self, archived: &Path) -> DavisResult<()> {
        if self.fail_publish {
            return Err(DavisError::Sink("mirror unreachable".to_string()));
        }
        self.published.push(archived.to_path_buf());
        Ok(())
    }
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
