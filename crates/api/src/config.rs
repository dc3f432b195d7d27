use std::path::PathBuf;
use std::time::Duration;

use stables_core::simulation::{default_lots, parse_lot_list, SimulatedLot};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Occupancy snapshot settings.
    pub snapshot: SnapshotConfig,
    /// Sensor simulator settings.
    pub simulation: SimulationConfig,
    /// Seed the user store with the demo accounts on startup.
    pub seed_demo_users: bool,
}

/// Where the occupancy document lives and how often it is reloaded.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub path: PathBuf,
    /// Background reload cadence.
    pub refresh_interval: Duration,
    /// A request reloads synchronously once the published snapshot is older than this.
    pub max_age: Duration,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub lots: Vec<SimulatedLot>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `*`                        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SNAPSHOT_PATH`        | `data/simulated_data.json` |
    /// | `SNAPSHOT_REFRESH_MS`  | `1000` (must be > 0)       |
    /// | `SNAPSHOT_MAX_AGE_MS`  | `2000`                     |
    /// | `SENSOR_SIMULATION`    | `false`                    |
    /// | `SENSOR_INTERVAL_MS`   | `1000` (must be > 0)       |
    /// | `SENSOR_LOTS`          | `Lot_A:zone_1:50,...`      |
    /// | `SEED_DEMO_USERS`      | `true`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_cors_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let snapshot = SnapshotConfig {
            path: std::env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| "data/simulated_data.json".into())
                .into(),
            refresh_interval: env_interval("SNAPSHOT_REFRESH_MS", 1000),
            max_age: env_millis("SNAPSHOT_MAX_AGE_MS", 2000),
        };

        let lots = match std::env::var("SENSOR_LOTS") {
            Ok(list) => parse_lot_list(&list).unwrap_or_else(|e| panic!("SENSOR_LOTS: {e}")),
            Err(_) => default_lots(),
        };
        let simulation = SimulationConfig {
            enabled: env_flag("SENSOR_SIMULATION", false),
            interval: env_interval("SENSOR_INTERVAL_MS", 1000),
            lots,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            snapshot,
            simulation,
            seed_demo_users: env_flag("SEED_DEMO_USERS", true),
        }
    }
}

/// Split a comma-separated origin list. `*` (or nothing) allows any origin.
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "*")
        .collect()
}

fn env_millis(key: &str, default: u64) -> Duration {
    let millis: u64 = std::env::var(key)
        .ok()
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{key} must be a valid u64"))
        })
        .unwrap_or(default);
    Duration::from_millis(millis)
}

/// Like [`env_millis`] but zero is rejected: these drive `tokio::time::interval`.
fn env_interval(key: &str, default: u64) -> Duration {
    match std::env::var(key) {
        Ok(raw) => parse_interval(key, &raw).unwrap_or_else(|e| panic!("{e}")),
        Err(_) => Duration::from_millis(default),
    }
}

/// Parse a positive millisecond count.
pub fn parse_interval(key: &str, raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(format!("{key} must be greater than zero")),
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(_) => Err(format!("{key} must be a valid u64")),
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
