//! Optional TOML configuration.
//!
//! ```toml
//! [defaults]
//! ntp_log = "logs/ntp_output.txt"
//! traceroute_log = "logs/traceroute_results.txt"
//! format = "json"
//! color = false
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use tracing::debug;

use crate::error::NetlensError;

pub const DEFAULT_NTP_LOG: &str = "ntp_output.txt";
pub const DEFAULT_TRACEROUTE_LOG: &str = "traceroute_results.txt";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub ntp_log: Option<PathBuf>,
    pub traceroute_log: Option<PathBuf>,
    pub format: Option<String>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    pub defaults: Defaults,
}

impl Config {
    /// Load from `explicit` if given, otherwise from the default location.
    ///
    /// A missing default file yields an empty config; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, NetlensError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = default_path();
                if !p.exists() {
                    debug!(path = %p.display(), "no config file");
                    return Ok(Self::default());
                }
                p
            }
        };
        let content = fs::read_to_string(&path)
            .map_err(|e| NetlensError::Config(format!("{}: {e}", path.display())))?;
        let defaults = Self::parse(&content)?;
        debug!(path = %path.display(), ?defaults, "config loaded");
        Ok(Self {
            path: Some(path),
            defaults,
        })
    }

    pub fn parse(content: &str) -> Result<Defaults, NetlensError> {
        let root: Value = content.parse::<Value>()?;
        parse_value(&root)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn ntp_log(&self) -> PathBuf {
        self.defaults
            .ntp_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NTP_LOG))
    }

    pub fn traceroute_log(&self) -> PathBuf {
        self.defaults
            .traceroute_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACEROUTE_LOG))
    }
}

fn parse_value(root: &Value) -> Result<Defaults, NetlensError> {
    let mut defaults = Defaults::default();
    let Some(table) = root.get("defaults") else {
        return Ok(defaults);
    };
    let table = table
        .as_table()
        .ok_or_else(|| NetlensError::Config("[defaults] must be a table".into()))?;

    for (key, value) in table {
        match key.as_str() {
            "ntp_log" => defaults.ntp_log = Some(PathBuf::from(expect_str(key, value)?)),
            "traceroute_log" => {
                defaults.traceroute_log = Some(PathBuf::from(expect_str(key, value)?))
            }
            "format" => {
                let format = expect_str(key, value)?;
                if !matches!(format, "text" | "json") {
                    return Err(NetlensError::Config(format!(
                        "format must be \"text\" or \"json\", got \"{format}\""
                    )));
                }
                defaults.format = Some(format.to_string());
            }
            "color" => {
                defaults.color = Some(value.as_bool().ok_or_else(|| {
                    NetlensError::Config("color must be a boolean".into())
                })?)
            }
            other => debug!(key = other, "unknown config key ignored"),
        }
    }
    Ok(defaults)
}

fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str, NetlensError> {
    value
        .as_str()
        .ok_or_else(|| NetlensError::Config(format!("{key} must be a string")))
}

pub fn default_path() -> PathBuf {
    resolve_config_dir().join("config.toml")
}

fn resolve_config_dir() -> PathBuf {
    if let Some(val) = env::var_os("NETLENS_CONFIG_DIR") {
        let path = PathBuf::from(val);
        if path.is_absolute() {
            return path;
        }
        return env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| PathBuf::from("."));
    }
    if let Some(base) = dirs::config_dir() {
        return base.join("netlens");
    }
    PathBuf::from(".netlens")
}
