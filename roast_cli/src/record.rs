//! Roast recording: transport assembly, session execution, and export.

use eyre::WrapErr;
use roast_core::protocol;
use roast_core::session::{PollingSession, SessionEnding, SessionOutcome, SessionTunables};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct RecordOpts {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub output: Option<PathBuf>,
    pub live: bool,
    pub simulate: bool,
    pub sim_rounds: u32,
    pub start_roast: bool,
    pub cycle_params: Option<String>,
}

pub fn run_record(
    cfg: &roast_config::Config,
    opts: RecordOpts,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<()> {
    if opts.simulate {
        let transport = roast_hardware::SimulatedRoaster::new(opts.sim_rounds);
        return run_session(cfg, &opts, shutdown, transport);
    }
    #[cfg(feature = "hardware")]
    {
        let path = opts.port.clone().unwrap_or_else(|| cfg.port.path.clone());
        let baud = opts.baud.unwrap_or(cfg.port.baud);
        let transport = roast_hardware::SerialTransport::open(&path, baud)
            .map_err(|e| eyre::eyre!("open serial port {path}: {e}"))?;
        run_session(cfg, &opts, shutdown, transport)
    }
    #[cfg(not(feature = "hardware"))]
    {
        eyre::bail!(
            "built without serial support; use --simulate or rebuild with --features hardware"
        )
    }
}

fn run_session<T: roast_traits::Transport>(
    cfg: &roast_config::Config,
    opts: &RecordOpts,
    shutdown: Arc<AtomicBool>,
    transport: T,
) -> eyre::Result<()> {
    let tunables: SessionTunables = (&cfg.acquisition).into();
    let mut builder = PollingSession::builder(transport)
        .with_tunables(tunables)
        .with_cancel_check(move || shutdown.load(Ordering::Relaxed));

    if opts.start_roast {
        builder = builder.with_startup_command(protocol::CMD_START);
    }
    if let Some(params) = &opts.cycle_params {
        let mut cmd = protocol::CMD_CYCLE.to_vec();
        cmd.extend_from_slice(params.as_bytes());
        builder = builder.with_startup_command(cmd);
    }
    if opts.live {
        builder = builder.with_live_hook(|snap| {
            let (Some(&t), Some(&hot), Some(&cold)) =
                (snap.time.last(), snap.hot.last(), snap.cold.last())
            else {
                return;
            };
            match snap.rate_of_rise.as_ref().map(|r| r.at(t as f64)) {
                Some(v) => {
                    println!("t={t:>4}s  hot={hot:6.1}C  cold={cold:5.1}C  ror={v:5.2}C/s");
                }
                None => println!("t={t:>4}s  hot={hot:6.1}C  cold={cold:5.1}C"),
            }
        });
    }

    let session = builder.build()?;
    let outcome = session.run();

    // Export before reporting any failure: partial data is still a roast.
    if let Some(path) = &opts.output {
        roast_config::write_profile_csv(
            path,
            outcome.profile.time(),
            outcome.profile.cold(),
            outcome.profile.hot(),
            outcome.profile.crack_edge(),
        )
        .wrap_err_with(|| format!("write profile CSV {path:?}"))?;
        tracing::info!(?path, rows = outcome.profile.len(), "profile exported");
    }

    summarize(&outcome);

    match outcome.ending {
        SessionEnding::Completed | SessionEnding::Cancelled => Ok(()),
        SessionEnding::Failed(e) => Err(eyre::Report::new(e)),
    }
}

fn summarize(outcome: &SessionOutcome) {
    let profile = &outcome.profile;
    let duration = outcome
        .ended_at
        .duration_since(outcome.started_at)
        .unwrap_or_default();
    match &outcome.ending {
        SessionEnding::Completed => println!(
            "roast complete: {} samples in {}s",
            profile.len(),
            duration.as_secs()
        ),
        SessionEnding::Cancelled => println!("roast cancelled: kept {} samples", profile.len()),
        SessionEnding::Failed(_) => println!("roast failed: kept {} samples", profile.len()),
    }
    if let Some((t, v)) = profile.peak_rate_of_rise() {
        println!("peak rate of rise: {v:.2} C/s at {t:.0} s");
    }
    // Wall-clock bounds for external recorders (e.g. audio) to sync against.
    tracing::debug!(started_at = ?outcome.started_at, ended_at = ?outcome.ended_at, "session timestamps");
}
