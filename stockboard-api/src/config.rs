//! Server configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

use stockboard_services::{SchedulerConfig, DEFAULT_RESET_INTERVAL, DEFAULT_UPDATE_INTERVAL};
use tracing::warn;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DB_PATH: &str = "data/stockboard.db";
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Which store backs users and prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub store: StoreKind,
    pub public_dir: PathBuf,
    pub scheduler_enabled: bool,
    pub scheduler: SchedulerConfig,
}

/// Load `.env.local`, then `.env`; missing files are fine
pub fn load_env_files() {
    for file in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(file) {
            if !matches!(e, dotenvy::Error::Io(_)) {
                eprintln!("Warning: Failed to load {}: {}", file, e);
            }
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT);

        let store = match lookup("STOCKBOARD_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("sqlite") => StoreKind::Sqlite,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                warn!("Unknown STOCKBOARD_STORE {:?}, using sqlite", other);
                StoreKind::Sqlite
            }
        };

        let update_secs = parse_or(
            &lookup,
            "STOCKBOARD_UPDATE_INTERVAL_SECS",
            DEFAULT_UPDATE_INTERVAL.as_secs(),
        );
        let reset_secs = parse_or(
            &lookup,
            "STOCKBOARD_RESET_INTERVAL_SECS",
            DEFAULT_RESET_INTERVAL.as_secs(),
        );

        Self {
            port,
            db_path: lookup("STOCKBOARD_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),
            store,
            public_dir: lookup("STOCKBOARD_PUBLIC_DIR")
                .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string())
                .into(),
            scheduler_enabled: parse_or(&lookup, "STOCKBOARD_SCHEDULER", true),
            scheduler: SchedulerConfig {
                update_interval: Duration::from_secs(update_secs.max(1)),
                reset_interval: Duration::from_secs(reset_secs.max(1)),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {}={:?}, using default {:?}", key, raw, default);
                default
            }
        },
    }
}
