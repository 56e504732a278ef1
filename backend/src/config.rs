//! Runtime configuration, read from `MEDIPASS_*` environment variables.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const APP_NAME: &str = "MediPass";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_SIMULATED_LATENCY_MS: u64 = 1500;
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OVERDUE_GRACE_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Front-end origin allowed by CORS
    pub cors_origin: String,
    /// Directory holding `preferences.json`
    pub data_dir: PathBuf,
    /// Optional directory of a built front end, served as fallback
    pub static_dir: Option<PathBuf>,
    /// Remote chat assistant endpoint; local canned replies only when unset
    pub chat_api_url: Option<String>,
    pub chat_timeout: Duration,
    /// Artificial delay applied to login and registration
    pub simulated_latency: Duration,
    /// How long after its start a missed appointment still shows a reminder
    pub overdue_reminder_grace: chrono::Duration,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("MEDIPASS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("MEDIPASS_BIND_ADDR must be a socket address like 127.0.0.1:3000")?;

        let cors_origin =
            lookup("MEDIPASS_CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let data_dir = lookup("MEDIPASS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let static_dir = non_empty(lookup("MEDIPASS_STATIC_DIR")).map(PathBuf::from);
        let chat_api_url = non_empty(lookup("MEDIPASS_CHAT_API_URL"));

        let simulated_latency = Duration::from_millis(parse_number(
            &lookup,
            "MEDIPASS_SIMULATED_LATENCY_MS",
            DEFAULT_SIMULATED_LATENCY_MS,
        )?);
        let chat_timeout = Duration::from_secs(parse_number(
            &lookup,
            "MEDIPASS_CHAT_TIMEOUT_SECS",
            DEFAULT_CHAT_TIMEOUT_SECS,
        )?);
        let grace_minutes = parse_number(
            &lookup,
            "MEDIPASS_OVERDUE_REMINDER_GRACE_MINUTES",
            DEFAULT_OVERDUE_GRACE_MINUTES,
        )?;
        if grace_minutes < 0 {
            anyhow::bail!("MEDIPASS_OVERDUE_REMINDER_GRACE_MINUTES cannot be negative");
        }

        Ok(Self {
            bind_addr,
            cors_origin,
            data_dir,
            static_dir,
            chat_api_url,
            chat_timeout,
            simulated_latency,
            overdue_reminder_grace: chrono::Duration::minutes(grace_minutes),
        })
    }

    /// Configuration for tests: no latency, no remote chat, given data directory.
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            data_dir,
            static_dir: None,
            chat_api_url: None,
            chat_timeout: Duration::from_secs(1),
            simulated_latency: Duration::ZERO,
            overdue_reminder_grace: chrono::Duration::minutes(DEFAULT_OVERDUE_GRACE_MINUTES),
        }
    }
}

/// `<platform data dir>/MediPass`, or `./medipass-data` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("medipass-data"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
