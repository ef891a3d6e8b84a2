#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core acquisition and post-processing for the roast profiler
//! (hardware-agnostic).
//!
//! All device interaction goes through `roast_traits::Transport`; the
//! crates in this workspace provide serial and simulated implementations.
//!
//! ## Architecture
//!
//! - **Protocol**: line grammar and command tokens (`protocol` module)
//! - **Store**: append-only per-channel buffers (`store` module)
//! - **Session**: the polling state machine driving the device (`session`)
//! - **Rate of rise**: spline-fit derivative estimation (`ror`, `spline`)
//! - **Profile**: finalization into an immutable record (`profile`)
//!
//! One session owns one transport and one store on a single thread; every
//! terminal path (completion, cancellation, failure) finalizes whatever
//! data exists into a `RoastProfile`.

pub mod conversions;
pub mod error;
pub mod mocks;
pub mod profile;
pub mod protocol;
pub mod ror;
pub mod session;
pub mod spline;
pub mod store;

pub use error::{BuildError, SessionError};
pub use profile::{RoastProfile, finalize};
pub use protocol::{LineClassifier, SampleEvent};
pub use ror::{FitError, RateOfRise};
pub use session::{
    LiveSnapshot, PollingSession, SessionBuilder, SessionEnding, SessionOutcome, SessionState,
    SessionTunables,
};
pub use store::{SampleStore, StoreSnapshot};
