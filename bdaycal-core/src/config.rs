//! Runtime settings, read from `BIRTHDAY_*` environment variables.

use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{BirthdayError, BirthdayResult};

const ENV_PREFIX: &str = "BIRTHDAY";

/// How a changed path is matched against a contact UID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UidMatch {
    /// The changed path contains the UID anywhere.
    #[default]
    Substring,
    /// The changed path is `<collection>/<uid>` or `<collection>/<uid>.<ext>`.
    Exact,
}

/// Settings for a synchronization run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Directory the changed paths are relative to.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Raw reminder offset in hours. Kept as text so that garbage
    /// disables the alarm instead of failing the run.
    #[serde(default)]
    pub reminder_at_hour: Option<String>,

    /// Fixed color for newly created birthday calendars.
    #[serde(default)]
    pub calendar_color: Option<String>,

    #[serde(default)]
    pub uid_match: UidMatch,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> BirthdayResult<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: Environment) -> BirthdayResult<Self> {
        Config::builder()
            .add_source(env)
            .build()
            .map_err(|e| BirthdayError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| BirthdayError::Config(e.to_string()))
    }

    /// Reminder offset in hours, if one is configured and valid.
    ///
    /// Offsets too large to express as a duration count as invalid.
    pub fn reminder_hours(&self) -> Option<i64> {
        let hours = self.reminder_at_hour.as_deref()?.trim().parse().ok()?;
        chrono::TimeDelta::try_hours(hours).map(|_| hours)
    }

    /// Configured calendar color without its leading `#`.
    pub fn calendar_color(&self) -> Option<&str> {
        self.calendar_color
            .as_deref()
            .map(|c| c.trim().trim_start_matches('#'))
            .filter(|c| !c.is_empty())
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(vars: &[(&str, &str)]) -> Settings {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_source(Environment::with_prefix(ENV_PREFIX).source(Some(source)))
            .expect("settings should load")
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings.reminder_hours(), None);
        assert_eq!(settings.calendar_color(), None);
        assert_eq!(settings.uid_match, UidMatch::Substring);
        assert_eq!(settings.storage_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_reminder_hour_is_parsed() {
        let settings = settings_from(&[("BIRTHDAY_REMINDER_AT_HOUR", "2")]);
        assert_eq!(settings.reminder_hours(), Some(2));
    }

    #[test]
    fn test_invalid_reminder_hour_disables_alarm() {
        let settings = settings_from(&[("BIRTHDAY_REMINDER_AT_HOUR", "soon")]);
        assert_eq!(settings.reminder_hours(), None);
    }

    #[test]
    fn test_out_of_range_reminder_hour_disables_alarm() {
        let settings = settings_from(&[("BIRTHDAY_REMINDER_AT_HOUR", "9999999999999999")]);
        assert_eq!(settings.reminder_hours(), None);

        let settings = settings_from(&[("BIRTHDAY_REMINDER_AT_HOUR", "-12")]);
        assert_eq!(settings.reminder_hours(), Some(-12));
    }

    #[test]
    fn test_color_and_match_mode() {
        let settings = settings_from(&[
            ("BIRTHDAY_CALENDAR_COLOR", "#a1b2c3"),
            ("BIRTHDAY_UID_MATCH", "exact"),
            ("BIRTHDAY_STORAGE_DIR", "/var/lib/radicale/collections"),
        ]);
        assert_eq!(settings.calendar_color(), Some("a1b2c3"));
        assert_eq!(settings.uid_match, UidMatch::Exact);
        assert_eq!(
            settings.storage_dir(),
            PathBuf::from("/var/lib/radicale/collections")
        );
    }
}
