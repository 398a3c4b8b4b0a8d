use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{
    DataSource, WeekdayConvention, WeekendCodes, DEFAULT_SOURCE_URL, DEFAULT_TARGET_COLUMN,
};

/// Directory under the home directory holding persisted params and logs.
pub const APP_DIR_NAME: &str = ".bike-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive terminal dashboard for daily bike rental data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bike-dashboard",
    about = "Interactive terminal dashboard for daily bike rental data",
    version
)]
pub struct Settings {
    /// Dataset location: an http(s) URL or a local CSV path
    #[arg(long, env = "BIKE_DASHBOARD_SOURCE", default_value = DEFAULT_SOURCE_URL)]
    pub source: String,

    /// Column every aggregation is computed against
    #[arg(long, default_value = DEFAULT_TARGET_COLUMN)]
    pub target: String,

    /// Comma-separated weekday codes treated as weekend days
    #[arg(long, default_value = "5,6", value_parser = parse_weekend_codes)]
    pub weekend_codes: WeekendCodes,

    /// How weekday codes map onto named days
    #[arg(long, default_value = "sunday-zero", value_parser = ["sunday-zero", "monday-zero"])]
    pub weekday_convention: String,

    /// Seconds before the cached dataset is considered stale (never, if omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cache_ttl: Option<u64>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Label language
    #[arg(long, default_value = "en", value_parser = ["en", "id"])]
    pub lang: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_weekend_codes(raw: &str) -> Result<WeekendCodes, String> {
    raw.parse::<WeekendCodes>().map_err(|e| e.to_string())
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Display preferences saved to `~/.bike-dashboard/last_used.json`.
///
/// Only presentation choices are remembered; the data source and aggregation
/// parameters always come from the current command line.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_convention: Option<String>,
}

impl LastUsedParams {
    /// Default path: `~/.bike-dashboard/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring unreadable last-used params: {e}");
            Self::default()
        })
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments, merge persisted display preferences and
    /// save the result for the next run.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Self::load_with_last_used`] with explicit arguments and
    /// config path.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("failed to clear last-used params: {e}");
            }
            return settings.apply_debug();
        }

        let last = LastUsedParams::load_from(config_path);

        // clap keys args by field name (underscores), not the flag spelling.
        let merge = |field: &str, target: &mut String, saved: Option<String>| {
            if !is_arg_explicitly_set(&matches, field) {
                if let Some(v) = saved {
                    *target = v;
                }
            }
        };
        merge("theme", &mut settings.theme, last.theme);
        merge("lang", &mut settings.lang, last.lang);
        merge("view", &mut settings.view, last.view);
        merge(
            "weekday_convention",
            &mut settings.weekday_convention,
            last.weekday_convention,
        );

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("failed to persist last-used params: {e}");
        }

        settings.apply_debug()
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    /// Unknown values (e.g. from a hand-edited config) fall back to the default.
    pub fn weekday_convention(&self) -> WeekdayConvention {
        self.weekday_convention.parse().unwrap_or_default()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl.map(Duration::from_secs)
    }

    pub fn is_report_view(&self) -> bool {
        self.view == "report"
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            lang: Some(s.lang.clone()),
            view: Some(s.view.clone()),
            weekday_convention: Some(s.weekday_convention.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied on the command line (not via
/// default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn run(args: &[&str], config_path: &Path) -> Settings {
        let mut argv: Vec<std::ffi::OsString> = vec!["bike-dashboard".into()];
        argv.extend(args.iter().map(|a| (*a).into()));
        Settings::load_with_last_used_impl(argv, config_path)
    }

    // ── LastUsedParams ───────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            lang: Some("id".to_string()),
            view: Some("report".to_string()),
            weekday_convention: Some("monday-zero".to_string()),
        };

        params.save_to(&path).expect("save");
        assert_eq!(LastUsedParams::load_from(&path), params);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
        // Clearing a missing file is not an error.
        LastUsedParams::clear_at(&path).expect("clear again");
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());
    }

    // ── CLI parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["bike-dashboard"]);

        assert_eq!(settings.source, DEFAULT_SOURCE_URL);
        assert_eq!(settings.target, "cnt");
        assert_eq!(settings.weekend_codes, WeekendCodes::default());
        assert_eq!(settings.weekday_convention(), WeekdayConvention::SundayZero);
        assert!(settings.cache_ttl().is_none());
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.lang, "en");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert!(settings.data_source().is_remote());
    }

    #[test]
    fn test_settings_cli_source_path() {
        let settings = Settings::parse_from(["bike-dashboard", "--source", "data/day.csv"]);
        assert_eq!(
            settings.data_source(),
            DataSource::File(PathBuf::from("data/day.csv"))
        );
    }

    #[test]
    fn test_settings_cli_weekend_codes() {
        let settings = Settings::parse_from(["bike-dashboard", "--weekend-codes", "0,6"]);
        assert!(settings.weekend_codes.contains(0));
        assert!(settings.weekend_codes.contains(6));
        assert!(!settings.weekend_codes.contains(5));
    }

    #[test]
    fn test_settings_cli_rejects_bad_weekend_codes() {
        let result = Settings::try_parse_from(["bike-dashboard", "--weekend-codes", "6,9"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_cache_ttl() {
        let settings = Settings::parse_from(["bike-dashboard", "--cache-ttl", "600"]);
        assert_eq!(settings.cache_ttl(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_settings_cli_rejects_zero_cache_ttl() {
        let result = Settings::try_parse_from(["bike-dashboard", "--cache-ttl", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_report_view() {
        let settings = Settings::parse_from(["bike-dashboard", "--view", "report"]);
        assert!(settings.is_report_view());
    }

    // ── load_with_last_used ──────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            lang: Some("id".to_string()),
            view: None,
            weekday_convention: Some("monday-zero".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = run(&[], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.lang, "id");
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.weekday_convention(), WeekdayConvention::MondayZero);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            lang: Some("id".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = run(&["--theme", "light", "--lang", "en"], &config_path);
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.lang, "en");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        run(&["--theme", "classic", "--view", "report"], &config_path);

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme, Some("classic".to_string()));
        assert_eq!(loaded.view, Some("report".to_string()));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = run(&["--clear"], &config_path);

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = run(&["--debug"], &tmp_config_path(&tmp));
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_source_is_not_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        run(&["--source", "/tmp/day.csv"], &config_path);
        let raw = std::fs::read_to_string(&config_path).expect("read");
        assert!(!raw.contains("day.csv"));
    }
}
