mod cli;
mod error_fmt;
mod record;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use eyre::WrapErr;
use record::RecordOpts;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let cfg = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => report_and_exit(&e),
    };
    init_tracing(&cli, &cfg.logging);

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        }) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    let result = match cli.cmd {
        Commands::Record {
            port,
            baud,
            output,
            live,
            simulate,
            sim_rounds,
            start_roast,
            cycle_params,
        } => record::run_record(
            &cfg,
            RecordOpts {
                port,
                baud,
                output,
                live,
                simulate,
                sim_rounds,
                start_roast,
                cycle_params,
            },
            shutdown,
        ),
        Commands::Analyze { input, at } => analyze(&input, at),
        Commands::Ports => ports(),
    };

    if let Err(e) = result {
        report_and_exit(&e);
    }
}

fn report_and_exit(err: &eyre::Report) -> ! {
    if JSON_MODE.get().copied().unwrap_or(false) {
        println!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
    std::process::exit(error_fmt::exit_code_for_error(err));
}

fn load_config(path: &Path) -> eyre::Result<roast_config::Config> {
    if !path.exists() {
        // No config file is fine: defaults cover the simulated workflow.
        return Ok(roast_config::Config::default());
    }
    let content =
        std::fs::read_to_string(path).wrap_err_with(|| format!("read config {path:?}"))?;
    let cfg = roast_config::load_toml(&content)
        .map_err(|e| eyre::eyre!("parse config {path:?}: {e}"))?;
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing(cli: &Cli, logging: &roast_config::Logging) {
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));

    let file_layer = logging.file.as_ref().map(|path| {
        let (dir, name) = split_log_path(path);
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(&dir, &name),
            Some("hourly") => tracing_appender::rolling::hourly(&dir, &name),
            _ => tracing_appender::rolling::never(&dir, &name),
        };
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_ansi(false)
    });

    let console_layer = if cli.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn split_log_path(path: &str) -> (PathBuf, String) {
    let p = Path::new(path);
    let dir = p
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roast.log".to_string());
    (dir, name)
}

fn analyze(input: &Path, at: Option<f64>) -> eyre::Result<()> {
    let cols = roast_config::load_profile_csv(input)?;
    if cols.time.len() < 2 {
        eyre::bail!("profile {input:?} has too few samples to analyze");
    }
    let ror = roast_core::ror::fit(&cols.time, &cols.hot).wrap_err("fitting rate of rise")?;
    if let Some((t, v)) = cols
        .time
        .iter()
        .map(|&t| (t, ror.at(t)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        println!("peak rate of rise: {v:.2} C/s at {t:.0} s");
    }
    if let Some(t) = at {
        println!("rate of rise at {t:.0} s: {:.2} C/s", ror.at(t));
    }
    Ok(())
}

fn ports() -> eyre::Result<()> {
    #[cfg(feature = "hardware")]
    {
        let ports = roast_hardware::list_ports().map_err(|e| eyre::eyre!("list ports: {e}"))?;
        if ports.is_empty() {
            println!("no serial devices found");
        }
        for p in ports {
            println!("{p}");
        }
        Ok(())
    }
    #[cfg(not(feature = "hardware"))]
    {
        eyre::bail!("built without serial support; rebuild with --features hardware")
    }
}
