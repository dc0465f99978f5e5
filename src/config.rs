use std::{env, path::PathBuf, str::FromStr};

use tracing::Level;

use crate::error::{config, AppErr, AppResult};

/// Process settings, read once before serving.
#[derive(Debug, Clone)]
pub struct Config {
    pub port:         u16,
    pub allowed_host: String,
    pub history_size: usize,
    pub log_level:    Level,
    pub debug:        bool,
    pub static_dir:   PathBuf,
    pub send_buffer:  usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port:         8888,
            allowed_host: "localhost".into(),
            history_size: 50,
            log_level:    Level::ERROR,
            debug:        false,
            static_dir:   "static".into(),
            send_buffer:  64,
        }
    }
}

impl Config {
    /// `.env` (or the file named by `TWEEFEED_CONFIG`), then the environment.
    pub fn load() -> AppResult<Self> {
        match env::var("TWEEFEED_CONFIG") {
            Ok(path) => { dotenvy::from_path(&path).map_err(|e| config(format!("{path}: {e}")))?; }
            Err(_)   => { dotenvy::dotenv().ok(); }
        }
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut c = Self::default();
        if let Some(v) = get("TWEEFEED_PORT")             { c.port = parse("TWEEFEED_PORT", &v)?; }
        if let Some(v) = get("TWEEFEED_API_ALLOWED_HOST") { c.allowed_host = v; }
        if let Some(v) = get("TWEEFEED_HISTORY_SIZE")     { c.history_size = parse("TWEEFEED_HISTORY_SIZE", &v)?; }
        c.log_level = log_level(&get)?;
        if let Some(v) = get("TWEEFEED_DEBUG")            { c.debug = parse_bool(&v)?; }
        if let Some(v) = get("TWEEFEED_STATIC_DIR")       { c.static_dir = v.into(); }
        if let Some(v) = get("TWEEFEED_SEND_BUFFER")      { c.send_buffer = parse("TWEEFEED_SEND_BUFFER", &v)?; }

        if c.send_buffer == 0 {
            return Err(AppErr::Config("TWEEFEED_SEND_BUFFER must be at least 1".into()));
        }
        Ok(c)
    }

    /// Debug mode never logs less than DEBUG.
    pub fn effective_level(&self) -> Level {
        if self.debug { self.log_level.max(Level::DEBUG) } else { self.log_level }
    }
}

/// `TWEEFEED_LOGGING`, "error" when unset. Shared with the push tool.
pub fn log_level(get: impl Fn(&str) -> Option<String>) -> AppResult<Level> {
    match get("TWEEFEED_LOGGING") {
        Some(v) => parse("TWEEFEED_LOGGING", &v),
        None    => Ok(Level::ERROR),
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| config(format!("{key}={raw}: {e}")))
}

fn parse_bool(raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on"  => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config(format!("TWEEFEED_DEBUG={raw}: expected a boolean"))),
    }
}
