use crate::clock::{LocalClock, parse_time_of_day};
use chrono::NaiveTime;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_REPORT_AT: (u32, u32) = (23, 59);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub clock: LocalClock,
    /// Reject `begin` while another interval is open. When off, a second
    /// `begin` opens another interval next to the first.
    pub single_open_session: bool,
    /// Local time of the daily report; `None` disables it.
    pub daily_report_at: Option<NaiveTime>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            clock: LocalClock::default(),
            single_open_session: false,
            daily_report_at: NaiveTime::from_hms_opt(DEFAULT_REPORT_AT.0, DEFAULT_REPORT_AT.1, 0),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|_| invalid("PORT", &value, "expected a port number"))?;
        }

        if let Some(value) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(value);
        }

        if let Some(value) = lookup("APP_UTC_OFFSET_HOURS") {
            let hours: i32 = value
                .trim()
                .parse()
                .map_err(|_| invalid("APP_UTC_OFFSET_HOURS", &value, "expected whole hours"))?;
            config.clock = LocalClock::from_hours(hours).ok_or_else(|| {
                invalid("APP_UTC_OFFSET_HOURS", &value, "offset out of range")
            })?;
        }

        if let Some(value) = lookup("APP_SINGLE_OPEN_SESSION") {
            config.single_open_session = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid("APP_SINGLE_OPEN_SESSION", &value, "expected a boolean")),
            };
        }

        if let Some(value) = lookup("APP_DAILY_REPORT_AT") {
            config.daily_report_at = match value.trim().to_ascii_lowercase().as_str() {
                "off" | "none" | "" => None,
                raw => Some(
                    parse_time_of_day(raw)
                        .map_err(|_| invalid("APP_DAILY_REPORT_AT", &value, "expected HH:MM"))?,
                ),
            };
        }

        Ok(config)
    }

    pub fn utc_offset_hours(&self) -> i32 {
        self.clock.offset().local_minus_utc() / 3600
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DEFAULT_UTC_OFFSET_HOURS;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.utc_offset_hours(), DEFAULT_UTC_OFFSET_HOURS);
        assert!(!config.single_open_session);
        assert_eq!(config.daily_report_at, NaiveTime::from_hms_opt(23, 59, 0));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/log.json"),
            ("APP_UTC_OFFSET_HOURS", "-4"),
            ("APP_SINGLE_OPEN_SESSION", "true"),
            ("APP_DAILY_REPORT_AT", "off"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/tmp/log.json"));
        assert_eq!(config.utc_offset_hours(), -4);
        assert!(config.single_open_session);
        assert_eq!(config.daily_report_at, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("APP_UTC_OFFSET_HOURS", "30")])).unwrap_err();
        assert_eq!(err.key, "APP_UTC_OFFSET_HOURS");
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("APP_SINGLE_OPEN_SESSION", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("APP_DAILY_REPORT_AT", "25:00")])).is_err());
    }
}
