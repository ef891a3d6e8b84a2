#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and profile persistence for the roast profiler.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The profile CSV writer/reader enforces the `time,cold,hot,cracks`
//!   header so exported roasts stay loadable by the analyze path.
use serde::Deserialize;

/// Serial link settings for the roaster.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PortCfg {
    /// Device path, e.g. /dev/ttyUSB0 or /dev/cu.usbmodem301
    pub path: String,
    pub baud: u32,
}

impl Default for PortCfg {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".to_string(),
            baud: 115_200,
        }
    }
}

/// Acquisition loop tunables.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Acquisition {
    /// Max wait for one report line before treating the read as empty (ms)
    pub read_timeout_ms: u64,
    /// Fixed backoff before re-issuing a sample request when the device
    /// has nothing buffered (ms)
    pub poll_backoff_ms: u64,
    /// Completed rounds required before the live hook gets a derivative
    pub live_min_rounds: usize,
}

impl Default for Acquisition {
    fn default() -> Self {
        Self {
            read_timeout_ms: 2_000,
            poll_backoff_ms: 250,
            live_min_rounds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub port: PortCfg,
    pub acquisition: Acquisition,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.port.path.is_empty() {
            eyre::bail!("port.path must not be empty");
        }
        if self.port.baud == 0 {
            eyre::bail!("port.baud must be > 0");
        }

        if self.acquisition.read_timeout_ms == 0 {
            eyre::bail!("acquisition.read_timeout_ms must be >= 1");
        }
        if self.acquisition.poll_backoff_ms == 0 {
            eyre::bail!("acquisition.poll_backoff_ms must be >= 1");
        }
        if self.acquisition.poll_backoff_ms > 60_000 {
            eyre::bail!("acquisition.poll_backoff_ms is unreasonably large (>60s)");
        }

        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of: never, daily, hourly");
        }

        Ok(())
    }
}

/// One row of an exported roast profile.
///
/// Expected headers:
/// time,cold,hot,cracks
///
/// Example:
/// time,cold,hot,cracks
/// 0,19.5,20.0,0
/// 1,19.6,25.0,0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProfileRow {
    pub time: f64,
    pub cold: f64,
    pub hot: f64,
    /// Crack transition flag for the sample (0 or 1)
    pub cracks: u8,
}

/// Column-oriented view of a loaded profile CSV.
#[derive(Debug, Default, Clone)]
pub struct ProfileColumns {
    pub time: Vec<f64>,
    pub cold: Vec<f64>,
    pub hot: Vec<f64>,
    pub cracks: Vec<bool>,
}

const PROFILE_HEADERS: [&str; 4] = ["time", "cold", "hot", "cracks"];

/// Write a finalized profile as delimited text with a header row.
/// All column slices must have equal length (the finalized alignment).
pub fn write_profile_csv(
    path: &std::path::Path,
    time: &[f64],
    cold: &[f64],
    hot: &[f64],
    cracks: &[bool],
) -> eyre::Result<()> {
    let n = time.len();
    if cold.len() != n || hot.len() != n || cracks.len() != n {
        eyre::bail!(
            "profile columns must have equal length (time={}, cold={}, hot={}, cracks={})",
            n,
            cold.len(),
            hot.len(),
            cracks.len()
        );
    }

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| eyre::eyre!("create profile CSV {:?}: {}", path, e))?;
    wtr.write_record(PROFILE_HEADERS)?;
    for i in 0..n {
        wtr.write_record([
            time[i].to_string(),
            cold[i].to_string(),
            hot[i].to_string(),
            u8::from(cracks[i]).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn load_profile_csv(path: &std::path::Path) -> eyre::Result<ProfileColumns> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open profile CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != PROFILE_HEADERS {
        eyre::bail!(
            "profile CSV must have headers 'time,cold,hot,cracks', got: {}",
            actual.join(",")
        );
    }

    let mut cols = ProfileColumns::default();
    for (idx, rec) in rdr.deserialize::<ProfileRow>().enumerate() {
        match rec {
            Ok(row) => {
                if row.cracks > 1 {
                    eyre::bail!("invalid CSV row {}: cracks must be 0 or 1", idx + 2);
                }
                cols.time.push(row.time);
                cols.cold.push(row.cold);
                cols.hot.push(row.hot);
                cols.cracks.push(row.cracks == 1);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    Ok(cols)
}
