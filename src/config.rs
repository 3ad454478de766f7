use crate::day::{parse, weekday_from_index};
use crate::debounce::DEFAULT_WINDOW;
use crate::disabled::{Constraints, WeekdaySet};
use crate::picker::{Picker, PickerOptions};
use crate::range::{AssignPolicy, Part, Range, DEFAULT_COLOR, DEFAULT_KEY};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use time::{Date, Weekday};
use tracing::warn;

pub const MAX_MONTHS: usize = 12;

/// Picker settings as read from a TOML file.
///
/// Dates are kept as the strings the user wrote and only interpreted when
/// the picker is built; a date that can't be read is logged and dropped.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PickerConfig {
    pub months: usize,
    /// 0 = Sunday through 6 = Saturday
    pub week_start: u8,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub disabled_dates: Vec<String>,
    pub disabled_weekdays: Vec<String>,
    pub drag_selection: bool,
    pub move_range_on_first_selection: bool,
    pub retain_end_date_on_first_selection: bool,
    pub focused_part: Part,
    pub show_preview: bool,
    pub adjacent_days_selectable: bool,
    pub debounce_ms: u64,
    pub key: String,
    pub color: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> PickerConfig {
        let options = PickerOptions::default();
        PickerConfig {
            months: options.months,
            week_start: 0,
            min_date: None,
            max_date: None,
            disabled_dates: Vec::new(),
            disabled_weekdays: Vec::new(),
            drag_selection: options.drag_selection,
            move_range_on_first_selection: false,
            retain_end_date_on_first_selection: false,
            focused_part: options.initial_part,
            show_preview: options.show_preview,
            adjacent_days_selectable: options.adjacent_days_selectable,
            debounce_ms: u64::try_from(DEFAULT_WINDOW.as_millis()).unwrap_or(16),
            key: String::from(DEFAULT_KEY),
            color: String::from(DEFAULT_COLOR),
            start_date: None,
            end_date: None,
            log_file: None,
        }
    }
}

impl PickerConfig {
    pub fn from_toml_str(s: &str) -> Result<PickerConfig, ConfigError> {
        let cfg = toml::from_str::<PickerConfig>(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PickerConfig, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        PickerConfig::from_toml_str(&s)
    }

    /// Check the settings that can't be represented at all.  Unreadable
    /// dates are not errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_MONTHS).contains(&self.months) {
            return Err(ConfigError::Months(self.months));
        }
        self.week_start()?;
        self.disabled_weekdays()?;
        Ok(())
    }

    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        weekday_from_index(self.week_start).ok_or(ConfigError::WeekStart(self.week_start))
    }

    pub fn disabled_weekdays(&self) -> Result<WeekdaySet, ConfigError> {
        self.disabled_weekdays
            .iter()
            .map(|name| parse_weekday(name))
            .collect()
    }

    pub fn options(&self) -> Result<PickerOptions, ConfigError> {
        self.validate()?;
        Ok(PickerOptions {
            months: self.months,
            week_start: self.week_start()?,
            drag_selection: self.drag_selection,
            adjacent_days_selectable: self.adjacent_days_selectable,
            show_preview: self.show_preview,
            debounce: Duration::from_millis(self.debounce_ms),
            policy: AssignPolicy {
                move_range_on_first_selection: self.move_range_on_first_selection,
                retain_end_date_on_first_selection: self.retain_end_date_on_first_selection,
            },
            initial_part: self.focused_part,
        })
    }

    pub fn constraints(&self) -> Result<Constraints<WeekdaySet>, ConfigError> {
        Ok(Constraints {
            min_date: date_setting("min-date", self.min_date.as_deref()),
            max_date: date_setting("max-date", self.max_date.as_deref()),
            disabled_dates: self
                .disabled_dates
                .iter()
                .filter_map(|s| date_setting("disabled-dates", Some(s)))
                .collect(),
            predicate: self.disabled_weekdays()?,
        })
    }

    pub fn initial_range(&self) -> Range {
        let mut range = Range::new(self.key.clone()).with_color(self.color.clone());
        range.start = date_setting("start-date", self.start_date.as_deref());
        range.end = date_setting("end-date", self.end_date.as_deref());
        range.normalized()
    }

    pub fn build(&self, today: Date) -> Result<Picker<WeekdaySet>, ConfigError> {
        Ok(Picker::new(
            self.options()?,
            self.constraints()?,
            self.initial_range(),
            today,
        ))
    }
}

fn date_setting(field: &str, value: Option<&str>) -> Option<Date> {
    let value = value?;
    let date = parse(value);
    if date.is_none() {
        warn!(field, value, "Ignoring unparseable date");
    }
    date
}

/// Parse a full or three-letter English weekday name, case-insensitively
pub fn parse_weekday(name: &str) -> Result<Weekday, ConfigError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Ok(Weekday::Sunday),
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        _ => Err(ConfigError::Weekday(name.to_owned())),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("number of months must be between 1 and {MAX_MONTHS}, got {0}")]
    Months(usize),
    #[error("week start must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    WeekStart(u8),
    #[error("unknown weekday name {0:?}")]
    Weekday(String),
}
