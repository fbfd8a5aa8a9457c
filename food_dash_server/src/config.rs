use std::env;

use food_dash_engine::DEFAULT_DB_URL;
use log::*;

const DEFAULT_FDS_HOST: &str = "127.0.0.1";
const DEFAULT_FDS_PORT: u16 = 8370;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, every accepted webhook body is rebroadcast to connected browsers on the live event stream.
    pub webhook_broadcast: bool,
    /// If true, a log record of every webhook body is stored. Logging failures never fail the webhook.
    pub webhook_logging: bool,
    /// Capacity of the live event stream and of each change feed subscriber's queue.
    pub event_buffer_size: usize,
    /// The initial state of the notification sound switch.
    pub sound_on: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FDS_HOST.to_string(),
            port: DEFAULT_FDS_PORT,
            database_url: DEFAULT_DB_URL.to_string(),
            webhook_broadcast: false,
            webhook_logging: true,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            sound_on: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FDS_HOST").ok().unwrap_or_else(|| DEFAULT_FDS_HOST.into());
        let port = env::var("FDS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FDS_PORT. {e} Using the default, {DEFAULT_FDS_PORT}, instead."
                    );
                    DEFAULT_FDS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FDS_PORT);
        let database_url = env::var("FDS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ FDS_DATABASE_URL is not set. Using the default, {DEFAULT_DB_URL}.");
            DEFAULT_DB_URL.to_string()
        });
        let event_buffer_size = env::var("FDS_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| match s.parse::<usize>() {
                Ok(0) => {
                    warn!("🪛️ FDS_EVENT_BUFFER_SIZE must be at least 1. Using {DEFAULT_EVENT_BUFFER_SIZE}.");
                    None
                },
                Ok(n) => Some(n),
                Err(e) => {
                    warn!("🪛️ Invalid configuration value for FDS_EVENT_BUFFER_SIZE. {e}");
                    None
                },
            })
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let webhook_broadcast = env_flag("FDS_WEBHOOK_BROADCAST", false);
        if webhook_broadcast {
            info!("🪛️ Webhook bodies will be rebroadcast on the live event stream.");
        }
        let webhook_logging = env_flag("FDS_WEBHOOK_LOGGING", true);
        let sound_on = env_flag("FDS_SOUND_ON", true);
        Self { host, port, database_url, webhook_broadcast, webhook_logging, event_buffer_size, sound_on }
    }
}

/// Reads a boolean switch. `1`, `true`, `yes` and `on` enable it, `0`, `false`, `no` and `off` disable it. Anything else
/// leaves the default in place.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(s) => parse_flag(&s).unwrap_or_else(|| {
            warn!("🪛️ Invalid configuration value for {name}: '{s}'. Using the default, {default}.");
            default
        }),
        Err(_) => default,
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
