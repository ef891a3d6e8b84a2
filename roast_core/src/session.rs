//! Polling acquisition session.
//!
//! Drives the request/response exchange with the roaster, feeds classified
//! lines into the sample store, and finalizes the profile on every exit
//! path. State machine:
//!
//! ```text
//! Idle -> AwaitingFirst -> Polling -> Draining -> Terminated
//!              |               |
//!              +---------------+--> Cancelled | Failed
//! ```
//!
//! All three terminal states converge on finalization: acquisition time is
//! expensive, so partial data always yields a profile.

use crate::error::{BuildError, Result, SessionError};
use crate::profile::{self, RoastProfile};
use crate::protocol::{CMD_ACK, CMD_SAMPLE, LineClassifier, SampleEvent};
use crate::ror::{self, RateOfRise};
use crate::store::SampleStore;
use roast_traits::{Clock, MonotonicClock, Transport};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built, nothing sent yet.
    Idle,
    /// Initial sample request sent; no line classified yet.
    AwaitingFirst,
    /// At least one sample line applied to the store.
    Polling,
    /// Terminate observed; acknowledging and closing.
    Draining,
    Terminated,
    Cancelled,
    Failed,
}

/// Acquisition tunables (see `roast_config::Acquisition`).
#[derive(Debug, Clone)]
pub struct SessionTunables {
    /// Max wait for one report line before treating the read as empty (ms).
    pub read_timeout_ms: u64,
    /// Fixed backoff before re-issuing a sample request when the device has
    /// nothing buffered (ms). Bounds round-trip latency without saturating
    /// the link.
    pub poll_backoff_ms: u64,
    /// Completed rounds required before the live hook gets a derivative.
    pub live_min_rounds: usize,
}

impl Default for SessionTunables {
    fn default() -> Self {
        Self {
            read_timeout_ms: 2_000,
            poll_backoff_ms: 250,
            live_min_rounds: 10,
        }
    }
}

/// Read-only view of the aligned channels after a completed round, handed
/// to the live hook for incremental redraw.
pub struct LiveSnapshot<'a> {
    pub time: &'a [i64],
    pub hot: &'a [f64],
    pub cold: &'a [f64],
    pub crack_edge: Vec<bool>,
    /// Present once enough rounds exist for a stable fit.
    pub rate_of_rise: Option<RateOfRise>,
}

/// How a session ended. Every ending still carries a finalized profile.
#[derive(Debug)]
pub enum SessionEnding {
    /// The device closed the stream and the host acknowledged it.
    Completed,
    /// The operator stopped the roast; collected rounds are kept.
    Cancelled,
    /// Protocol violation or transport failure; partial data is kept.
    Failed(SessionError),
}

impl SessionEnding {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of a finished session: the immutable profile, how the session
/// ended, and the wall-clock start/stop instants (synchronization hooks
/// for external recorders such as audio capture).
#[derive(Debug)]
pub struct SessionOutcome {
    pub profile: RoastProfile,
    pub ending: SessionEnding,
    pub rounds: usize,
    pub started_at: SystemTime,
    pub ended_at: SystemTime,
}

type CancelCheck = Box<dyn Fn() -> bool>;
type LiveHook = Box<dyn FnMut(LiveSnapshot<'_>)>;

/// Single-threaded acquisition session. Exclusively owns the transport and
/// the store for its whole lifetime; no other code may touch either while
/// the session runs.
pub struct PollingSession<T: Transport> {
    transport: T,
    store: SampleStore,
    classifier: LineClassifier,
    state: SessionState,
    clock: Arc<dyn Clock + Send + Sync>,
    read_timeout: Duration,
    poll_backoff: Duration,
    live_min_rounds: usize,
    cancel_check: Option<CancelCheck>,
    live_hook: Option<LiveHook>,
    startup_commands: Vec<Vec<u8>>,
}

impl<T: Transport> std::fmt::Debug for PollingSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingSession")
            .field("state", &self.state)
            .field("read_timeout", &self.read_timeout)
            .field("poll_backoff", &self.poll_backoff)
            .field("live_min_rounds", &self.live_min_rounds)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> PollingSession<T> {
    pub fn builder(transport: T) -> SessionBuilder<T> {
        SessionBuilder {
            transport,
            tunables: SessionTunables::default(),
            clock: None,
            cancel_check: None,
            live_hook: None,
            startup_commands: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to a terminal state and finalize whatever was
    /// collected. Never panics and never discards data: cancellation and
    /// failures produce partial profiles.
    pub fn run(mut self) -> SessionOutcome {
        let started_at = SystemTime::now();
        tracing::info!("acquisition start");
        let ending = self.acquire();
        let ended_at = SystemTime::now();
        let rounds = self.store.completed_rounds();
        match &ending {
            SessionEnding::Completed => tracing::info!(rounds, "acquisition complete"),
            SessionEnding::Cancelled => {
                tracing::info!(rounds, "acquisition cancelled by operator");
            }
            SessionEnding::Failed(e) => {
                tracing::error!(rounds, error = %e, "acquisition failed");
            }
        }
        let profile = profile::finalize(self.store);
        SessionOutcome {
            profile,
            ending,
            rounds,
            started_at,
            ended_at,
        }
    }

    fn acquire(&mut self) -> SessionEnding {
        if let Err(e) = self.begin_requests() {
            return self.fail(e);
        }
        loop {
            // Cancellation is honored between iterations only; an in-flight
            // read is bounded by the read timeout.
            if self.is_cancelled() {
                return self.cancel();
            }
            match self.poll_once() {
                Ok(None) => {}
                Ok(Some(ending)) => return ending,
                Err(e) => return self.fail(e),
            }
        }
    }

    /// Send any pass-through device commands, then the first sample request.
    fn begin_requests(&mut self) -> std::result::Result<(), SessionError> {
        for cmd in std::mem::take(&mut self.startup_commands) {
            self.transport.write(&cmd).map_err(map_transport_error)?;
        }
        self.transport
            .write(CMD_SAMPLE)
            .map_err(map_transport_error)?;
        self.set_state(SessionState::AwaitingFirst);
        Ok(())
    }

    /// One loop iteration: read-and-classify if data is waiting, otherwise
    /// back off and re-probe. `Ok(Some(_))` is a terminal transition.
    fn poll_once(&mut self) -> std::result::Result<Option<SessionEnding>, SessionError> {
        if !self.transport.bytes_available().map_err(map_transport_error)? {
            self.clock.sleep(self.poll_backoff);
            self.transport
                .write(CMD_SAMPLE)
                .map_err(map_transport_error)?;
            return Ok(None);
        }

        let line = match self.transport.read_line(self.read_timeout) {
            Ok(Some(line)) => line,
            // No complete line within the timeout: recoverable, keep polling.
            Ok(None) => return Ok(None),
            Err(e) => match map_transport_error(e) {
                SessionError::Timeout => return Ok(None),
                fatal => return Err(fatal),
            },
        };
        tracing::trace!(line = %String::from_utf8_lossy(&line), "device line");

        match self.classifier.classify(&line)? {
            SampleEvent::TimeMark(secs) => {
                self.store.append_time(secs);
                self.mark_polling();
            }
            SampleEvent::HotReading(c) => {
                self.store.append_hot(c);
                self.mark_polling();
            }
            SampleEvent::ColdReading(c) => {
                self.store.append_cold(c);
                self.mark_polling();
            }
            SampleEvent::CrackMark(stage) => {
                // The crack marker is the last field of a round, so this is
                // the round-complete signal.
                self.store.append_crack(stage);
                self.mark_polling();
                self.emit_live();
            }
            SampleEvent::Ignore => {}
            SampleEvent::Terminate => return Ok(Some(self.drain())),
        }
        Ok(None)
    }

    fn emit_live(&mut self) {
        if self.live_hook.is_none() {
            return;
        }
        let rounds = self.store.completed_rounds();
        let rate_of_rise = if rounds > self.live_min_rounds {
            let time_f: Vec<f64> = self.store.time()[..rounds]
                .iter()
                .map(|&t| t as f64)
                .collect();
            match ror::fit(&time_f, &self.store.hot()[..rounds]) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!(error = %e, rounds, "live rate-of-rise unavailable this round");
                    None
                }
            }
        } else {
            None
        };
        let crack_edge = profile::crack_edges(&self.store.crack()[..rounds]);
        if let Some(hook) = self.live_hook.as_mut() {
            hook(LiveSnapshot {
                time: &self.store.time()[..rounds],
                hot: &self.store.hot()[..rounds],
                cold: &self.store.cold()[..rounds],
                crack_edge,
                rate_of_rise,
            });
        }
    }

    fn mark_polling(&mut self) {
        if self.state == SessionState::AwaitingFirst {
            self.set_state(SessionState::Polling);
        }
    }

    fn drain(&mut self) -> SessionEnding {
        self.set_state(SessionState::Draining);
        if let Err(e) = self.transport.write(CMD_ACK) {
            tracing::warn!(error = %e, "stop acknowledgment failed");
        }
        if let Err(e) = self.transport.close() {
            tracing::warn!(error = %e, "transport close failed");
        }
        self.set_state(SessionState::Terminated);
        SessionEnding::Completed
    }

    fn cancel(&mut self) -> SessionEnding {
        if let Err(e) = self.transport.write(CMD_ACK) {
            tracing::warn!(error = %e, "stop token on cancel failed");
        }
        if let Err(e) = self.transport.close() {
            tracing::warn!(error = %e, "transport close failed");
        }
        self.set_state(SessionState::Cancelled);
        SessionEnding::Cancelled
    }

    fn fail(&mut self, err: SessionError) -> SessionEnding {
        // The link is already suspect; close without the stop token.
        if let Err(e) = self.transport.close() {
            tracing::warn!(error = %e, "transport close failed");
        }
        self.set_state(SessionState::Failed);
        SessionEnding::Failed(err)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_check.as_ref().is_some_and(|c| c())
    }

    fn set_state(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}

/// Builder for [`PollingSession`]. The transport is required up front; all
/// other collaborators are optional capabilities.
pub struct SessionBuilder<T: Transport> {
    transport: T,
    tunables: SessionTunables,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    cancel_check: Option<CancelCheck>,
    live_hook: Option<LiveHook>,
    startup_commands: Vec<Vec<u8>>,
}

impl<T: Transport> SessionBuilder<T> {
    pub fn with_tunables(mut self, tunables: SessionTunables) -> Self {
        self.tunables = tunables;
        self
    }

    /// Provide a custom clock; defaults to MonotonicClock when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// External cancellation signal, checked between loop iterations.
    pub fn with_cancel_check<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.cancel_check = Some(Box::new(f));
        self
    }

    /// Per-round snapshot callback for live rendering.
    pub fn with_live_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(LiveSnapshot<'_>) + 'static,
    {
        self.live_hook = Some(Box::new(f));
        self
    }

    /// Queue an opaque device command (start-roast, cycle parameters) to be
    /// written before the first sample request.
    pub fn with_startup_command(mut self, cmd: impl Into<Vec<u8>>) -> Self {
        self.startup_commands.push(cmd.into());
        self
    }

    pub fn build(self) -> Result<PollingSession<T>> {
        if self.tunables.read_timeout_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "read_timeout_ms must be >= 1",
            )));
        }
        if self.tunables.poll_backoff_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "poll_backoff_ms must be >= 1",
            )));
        }
        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(b) => Arc::from(b),
            None => Arc::new(MonotonicClock::new()),
        };
        Ok(PollingSession {
            transport: self.transport,
            store: SampleStore::new(),
            classifier: LineClassifier::new(),
            state: SessionState::Idle,
            clock,
            read_timeout: Duration::from_millis(self.tunables.read_timeout_ms),
            poll_backoff: Duration::from_millis(self.tunables.poll_backoff_ms),
            live_min_rounds: self.tunables.live_min_rounds,
            cancel_check: self.cancel_check,
            live_hook: self.live_hook,
            startup_commands: self.startup_commands,
        })
    }
}

// Map any transport error to a typed SessionError, with special handling
// for hardware errors.
fn map_transport_error(e: Box<dyn std::error::Error + Send + Sync>) -> SessionError {
    #[cfg(feature = "hardware-errors")]
    if let Some(hw) = e.downcast_ref::<roast_hardware::error::HwError>() {
        return match hw {
            roast_hardware::error::HwError::Timeout => SessionError::Timeout,
            other => SessionError::Transport(other.to_string()),
        };
    }
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        SessionError::Timeout
    } else {
        SessionError::Transport(s)
    }
}
