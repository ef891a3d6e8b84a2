//! Line grammar of the roaster's reporting protocol.
//!
//! The device reports one physical reading per line, tagged with a marker
//! token; the host replies with single-byte command tokens. Classification
//! works on raw bytes so a garbled line can never take the parser down.

use crate::error::SessionError;

/// Request one sample round.
pub const CMD_SAMPLE: &[u8] = b"s";
/// Acknowledge the end of the stream / ask the device to stop.
pub const CMD_ACK: &[u8] = b"a";
/// Start-roast command (opaque to the acquisition core).
pub const CMD_START: &[u8] = b"g";
/// Cycle-parameter command prefix (opaque; parameters are appended raw).
pub const CMD_CYCLE: &[u8] = b"r";

/// One classified report line. Produced per line; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleEvent {
    /// Elapsed roast time in seconds.
    TimeMark(i64),
    /// Hot-junction temperature in °C.
    HotReading(f64),
    /// Cold-junction temperature in °C.
    ColdReading(f64),
    /// Roast-stage index; the last field reported in each round.
    CrackMark(i32),
    /// Diagnostic or pre-stream noise; not part of the profile.
    Ignore,
    /// Unrecognized line after real data started: the stream is over.
    Terminate,
}

/// Classifies raw report lines into [`SampleEvent`]s.
///
/// The only parsing state is whether a `Time` line has ever been seen:
/// before the first one, unrecognized lines are boot-banner noise; after
/// it, an unrecognized line signals the end of the stream.
#[derive(Debug, Default)]
pub struct LineClassifier {
    seen_time: bool,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one raw line to an event. A marker line whose numeric payload
    /// fails to parse is a protocol violation: dropping it silently would
    /// desynchronize the channel alignment.
    pub fn classify(&mut self, raw: &[u8]) -> Result<SampleEvent, SessionError> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim();
        if line.contains("Time") {
            let secs = parse_trailing::<i64>(line, "Time")?;
            self.seen_time = true;
            Ok(SampleEvent::TimeMark(secs))
        } else if line.contains("Hot") {
            Ok(SampleEvent::HotReading(parse_trailing::<f64>(line, "Hot")?))
        } else if line.contains("Cold") {
            Ok(SampleEvent::ColdReading(parse_trailing::<f64>(
                line, "Cold",
            )?))
        } else if line.contains("Crack") {
            Ok(SampleEvent::CrackMark(parse_second::<i32>(line, "Crack")?))
        } else if line.contains("ADC") {
            Ok(SampleEvent::Ignore)
        } else if self.seen_time {
            Ok(SampleEvent::Terminate)
        } else {
            Ok(SampleEvent::Ignore)
        }
    }
}

fn parse_trailing<T: std::str::FromStr>(line: &str, marker: &str) -> Result<T, SessionError> {
    line.split_whitespace()
        .last()
        .and_then(|tok| tok.parse().ok())
        .ok_or_else(|| violation(line, marker))
}

fn parse_second<T: std::str::FromStr>(line: &str, marker: &str) -> Result<T, SessionError> {
    line.split_whitespace()
        .nth(1)
        .and_then(|tok| tok.parse().ok())
        .ok_or_else(|| violation(line, marker))
}

fn violation(line: &str, marker: &str) -> SessionError {
    SessionError::ProtocolViolation(format!("unparsable {marker} payload in line {line:?}"))
}
