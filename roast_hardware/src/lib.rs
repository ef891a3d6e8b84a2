pub mod error;
#[cfg(feature = "hardware")]
pub mod serial;

#[cfg(feature = "hardware")]
pub use serial::{SerialTransport, list_ports};

use roast_traits::Transport;
use std::collections::VecDeque;

/// Scripted roaster for development and tests.
///
/// Speaks the device's line grammar: each sample request (`'s'`) queues one
/// reporting round (`Time`, `Hot`, `Cold`, `Crack`), with an occasional raw
/// ADC diagnostic line mixed in. After the configured number of rounds the
/// device answers requests with a closing banner the host does not
/// recognize, which ends the session. The temperature trace is a
/// deterministic exponential approach so repeated runs are comparable.
pub struct SimulatedRoaster {
    pending: VecDeque<Vec<u8>>,
    round: u32,
    total_rounds: u32,
    hot_c: f64,
    cold_c: f64,
    started: bool,
    stopped: bool,
    closed: bool,
}

/// Asymptotic hot-junction temperature of the simulated element.
const HOT_LIMIT_C: f64 = 235.0;
/// First/second crack onset temperatures for the scripted stage index.
const FIRST_CRACK_C: f64 = 196.0;
const SECOND_CRACK_C: f64 = 224.0;

impl SimulatedRoaster {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            pending: VecDeque::new(),
            round: 0,
            total_rounds,
            hot_c: 20.0,
            cold_c: 19.5,
            started: false,
            stopped: false,
            closed: false,
        }
    }

    /// Whether the host acknowledged the end of the stream (`'a'`).
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Whether a start-roast command (`'g'`) was received.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Rounds queued so far.
    pub fn rounds_emitted(&self) -> u32 {
        self.round
    }

    fn crack_stage(&self) -> i32 {
        if self.hot_c >= SECOND_CRACK_C {
            2
        } else if self.hot_c >= FIRST_CRACK_C {
            1
        } else {
            0
        }
    }

    fn queue_round(&mut self) {
        let t = i64::from(self.round);
        self.hot_c += (HOT_LIMIT_C - self.hot_c) * 0.03;
        self.cold_c += 0.02;
        if self.round % 10 == 0 {
            // Raw converter diagnostic the host ignores.
            self.pending
                .push_back(format!("ADC {}", 840_000 + i64::from(self.round) * 37).into_bytes());
        }
        self.pending.push_back(format!("Time {t}").into_bytes());
        self.pending
            .push_back(format!("Hot {:.1}", self.hot_c).into_bytes());
        self.pending
            .push_back(format!("Cold {:.1}", self.cold_c).into_bytes());
        self.pending
            .push_back(format!("Crack {}", self.crack_stage()).into_bytes());
        self.round += 1;
    }
}

impl Transport for SimulatedRoaster {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(error::HwError::Closed));
        }
        match bytes.first() {
            Some(b's') => {
                if self.round < self.total_rounds {
                    self.queue_round();
                } else {
                    self.pending.push_back(b"Roast complete".to_vec());
                }
            }
            Some(b'a') => {
                self.stopped = true;
            }
            Some(b'g') => {
                self.started = true;
            }
            Some(b'r') => {
                tracing::debug!(params = ?&bytes[1..], "cycle parameters received");
            }
            _ => {}
        }
        Ok(())
    }

    fn read_line(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(error::HwError::Closed));
        }
        Ok(self.pending.pop_front())
    }

    fn bytes_available(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(error::HwError::Closed));
        }
        Ok(!self.pending.is_empty())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.closed = true;
        Ok(())
    }
}
