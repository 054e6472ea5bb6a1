use anyhow::{Context as _, Result};
use claim_wise::{Credentials, DEFAULT_PREDICTION_DELAY, DEFAULT_REPORT_URL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Unset keeps the session flag in memory only.
    pub session_store_path: Option<PathBuf>,
    pub claims_csv_path: PathBuf,
    pub prediction_delay: Duration,
    pub login_delay: Duration,
    pub credentials: Credentials,
    pub report_url: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            session_store_path: None,
            claims_csv_path: PathBuf::from("data/insurance.csv"),
            prediction_delay: DEFAULT_PREDICTION_DELAY,
            login_delay: DEFAULT_LOGIN_DELAY,
            credentials: Credentials::default(),
            report_url: DEFAULT_REPORT_URL.to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; missing or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = var("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid BIND_ADDR: {addr}"))?;
        } else if let Some(port) = var("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("invalid PORT: {port}"))?;
            config.bind_addr.set_port(port);
        }
        if let Some(path) = var("SESSION_STORE_PATH") {
            config.session_store_path = Some(PathBuf::from(path));
        }
        if let Some(path) = var("CLAIMS_CSV_PATH") {
            config.claims_csv_path = PathBuf::from(path);
        }
        if let Some(ms) = var("PREDICTION_DELAY_MS") {
            config.prediction_delay = parse_millis("PREDICTION_DELAY_MS", &ms)?;
        }
        if let Some(ms) = var("LOGIN_DELAY_MS") {
            config.login_delay = parse_millis("LOGIN_DELAY_MS", &ms)?;
        }
        if let Some(username) = var("ADMIN_USERNAME") {
            config.credentials.username = username;
        }
        if let Some(password) = var("ADMIN_PASSWORD") {
            config.credentials.password = password;
        }
        if let Some(url) = var("REPORT_EMBED_URL") {
            config.report_url = url;
        }
        if let Some(format) = var("LOG_FORMAT") {
            config.log_format = match format.as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        Ok(config)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    let ms: u64 = value
        .parse()
        .with_context(|| format!("invalid {key}: {value}"))?;
    Ok(Duration::from_millis(ms))
}
