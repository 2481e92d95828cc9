//! Event output sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nuject_core::{ErrorInfo, Event, InjectError};

/// Durable record of generated events.
///
/// The sink is the only serialization point of a run: workers generate
/// independently and the controller drains through a single `append` stream.
/// Implementations must preserve enough precision that `one_weight` survives
/// a round trip bit for bit.
pub trait OutputSink {
    /// Appends one finished event.
    fn append(&mut self, event: &Event) -> Result<(), InjectError>;

    /// Flushes and closes the sink.
    fn close(&mut self) -> Result<(), InjectError>;
}

/// Newline-delimited JSON sink backed by a buffered file writer.
#[derive(Debug)]
pub struct JsonLinesSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JsonLinesSink {
    /// Creates (or truncates) the output file.
    pub fn open(path: &Path) -> Result<Self, InjectError> {
        let file = File::create(path).map_err(|err| {
            InjectError::Io(
                ErrorInfo::new("sink-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    fn io_error(&self, code: &str, err: impl ToString) -> InjectError {
        InjectError::Io(
            ErrorInfo::new(code, err.to_string())
                .with_context("path", self.path.display().to_string()),
        )
    }
}

impl OutputSink for JsonLinesSink {
    fn append(&mut self, event: &Event) -> Result<(), InjectError> {
        let line = serde_json::to_string(event)
            .map_err(|err| self.io_error("sink-encode", err.to_string()))?;
        writeln!(self.writer, "{line}").map_err(|err| self.io_error("sink-append", err))
    }

    fn close(&mut self) -> Result<(), InjectError> {
        self.writer
            .flush()
            .map_err(|err| self.io_error("sink-close", err))
    }
}

/// In-memory sink for tests and benchmarks.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<Event>,
    closed: bool,
}

impl MemorySink {
    /// Empty open sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events appended so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consumes the sink, returning its events.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl OutputSink for MemorySink {
    fn append(&mut self, event: &Event) -> Result<(), InjectError> {
        self.events.push(event.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), InjectError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nuject_core::{FinalStateKinematics, InteractionChannel, ParticleType};

    use super::*;

    fn sample_event(weight: f64) -> Event {
        Event {
            channel: InteractionChannel::from_final_state(
                ParticleType::MuPlus,
                ParticleType::Hadrons,
            )
            .unwrap(),
            energy: 1.25e4,
            zenith: 1.9,
            azimuth: 0.3,
            vertex: [10.0, -20.0, 30.0],
            kinematics: FinalStateKinematics { inelasticity: 0.4 },
            one_weight: weight,
        }
    }

    #[test]
    fn json_lines_round_trip_preserves_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let weights = [1.0e-30, 0.1234567890123456789, 9.87e21];

        let mut sink = JsonLinesSink::open(&path).unwrap();
        for weight in weights {
            sink.append(&sample_event(weight)).unwrap();
        }
        sink.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let decoded: Vec<Event> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(decoded.len(), weights.len());
        for (event, weight) in decoded.iter().zip(weights) {
            assert_eq!(event.one_weight.to_bits(), weight.to_bits());
        }
    }

    #[test]
    fn open_fails_with_path_context_for_bad_directory() {
        let err = JsonLinesSink::open(Path::new("/nonexistent/dir/events.jsonl")).unwrap_err();
        assert_eq!(err.info().code, "sink-open");
        assert!(err.info().context.contains_key("path"));
    }

    #[test]
    fn memory_sink_records_appends_and_close() {
        let mut sink = MemorySink::new();
        sink.append(&sample_event(1.0)).unwrap();
        sink.append(&sample_event(2.0)).unwrap();
        assert_eq!(sink.events().len(), 2);
        assert!(!sink.is_closed());
        sink.close().unwrap();
        assert!(sink.is_closed());
    }
}
