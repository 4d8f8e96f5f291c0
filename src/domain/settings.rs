//! Runtime settings resolved from a [`ConfigPort`], with defaults for every
//! key.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::error::LedgerError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LEDGER_PATH: &str = "ledger.csv";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_CHART_OUTPUT: &str = "dashboard.svg";
pub const DEFAULT_CHART_WIDTH: u32 = 900;
pub const DEFAULT_CHART_HEIGHT: u32 = 360;
/// Smallest dashboard that leaves room for both plots and their labels.
pub const MIN_CHART_WIDTH: u32 = 240;
pub const MIN_CHART_HEIGHT: u32 = 160;
pub const DEFAULT_CURRENCY: &str = "$";

/// What to do with a ledger file whose header has no type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegacySchemaPolicy {
    /// Move the old file to `<file>.bak` and start empty.
    #[default]
    Backup,
    /// Overwrite the old file with an empty ledger.
    Discard,
    /// Leave the file alone and report a schema error.
    Refuse,
}

impl FromStr for LegacySchemaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backup" => Ok(Self::Backup),
            "discard" => Ok(Self::Discard),
            "refuse" => Ok(Self::Refuse),
            other => Err(format!(
                "unknown policy '{}' (expected backup, discard or refuse)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ledger_path: PathBuf,
    pub legacy_schema: LegacySchemaPolicy,
    pub listen: SocketAddr,
    pub chart: ChartSettings,
    pub currency: String,
    /// List the most recent transaction first in the web view.
    pub newest_first: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            legacy_schema: LegacySchemaPolicy::default(),
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            chart: ChartSettings {
                output: PathBuf::from(DEFAULT_CHART_OUTPUT),
                width: DEFAULT_CHART_WIDTH,
                height: DEFAULT_CHART_HEIGHT,
            },
            currency: DEFAULT_CURRENCY.to_string(),
            newest_first: true,
        }
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn chart_dimension(
    config: &dyn ConfigPort,
    key: &str,
    default: u32,
    min: u32,
) -> Result<u32, LedgerError> {
    let value = match config.get_int("chart", key) {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(default),
        Err(raw) => {
            return Err(invalid("chart", key, format!("'{}' is not an integer", raw)));
        }
    };
    if value < i64::from(min) {
        return Err(invalid("chart", key, format!("must be at least {}", min)));
    }
    u32::try_from(value).map_err(|_| invalid("chart", key, "value too large"))
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, LedgerError> {
        let defaults = Settings::default();

        let ledger_path = config
            .get_string("ledger", "path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.ledger_path);

        let legacy_schema = match config.get_string("ledger", "legacy_schema") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| invalid("ledger", "legacy_schema", reason))?,
            None => defaults.legacy_schema,
        };

        let listen = match config.get_string("web", "listen") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| invalid("web", "listen", format!("'{}' is not host:port", raw)))?,
            None => defaults.listen,
        };

        let chart = ChartSettings {
            output: config
                .get_string("chart", "output")
                .map(PathBuf::from)
                .unwrap_or(defaults.chart.output),
            width: chart_dimension(config, "width", DEFAULT_CHART_WIDTH, MIN_CHART_WIDTH)?,
            height: chart_dimension(config, "height", DEFAULT_CHART_HEIGHT, MIN_CHART_HEIGHT)?,
        };

        let currency = config
            .get_string("display", "currency")
            .unwrap_or(defaults.currency);
        let newest_first = config
            .get_bool("display", "newest_first")
            .map_err(|raw| {
                invalid(
                    "display",
                    "newest_first",
                    format!("'{}' is not true or false", raw),
                )
            })?
            .unwrap_or(defaults.newest_first);

        Ok(Self {
            ledger_path,
            legacy_schema,
            listen,
            chart,
            currency,
            newest_first,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapConfig(Vec<((&'static str, &'static str), &'static str)>);

    impl MapConfig {
        fn new(entries: &[((&'static str, &'static str), &'static str)]) -> Self {
            Self(entries.to_vec())
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0
                .iter()
                .find(|((s, k), _)| *s == section && *k == key)
                .map(|(_, v)| v.to_string())
        }

        fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
            self.get_string(section, key)
                .map(|v| v.parse().map_err(|_| v))
                .transpose()
        }

        fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String> {
            self.get_string(section, key)
                .map(|v| match v.as_str() {
                    "true" => Ok(true),
                    "false" => Ok(false),
                    _ => Err(v),
                })
                .transpose()
        }
    }

    #[test]
    fn empty_config_yields_defaults() {
        let settings = Settings::from_config(&MapConfig::new(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.listen.to_string(), DEFAULT_LISTEN);
    }

    #[test]
    fn reads_all_sections() {
        let config = MapConfig::new(&[
            (("ledger", "path"), "/tmp/money.csv"),
            (("ledger", "legacy_schema"), "Refuse"),
            (("web", "listen"), "0.0.0.0:8080"),
            (("chart", "output"), "out.svg"),
            (("chart", "width"), "640"),
            (("chart", "height"), "240"),
            (("display", "currency"), "R$"),
            (("display", "newest_first"), "false"),
        ]);
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.ledger_path, PathBuf::from("/tmp/money.csv"));
        assert_eq!(settings.legacy_schema, LegacySchemaPolicy::Refuse);
        assert_eq!(settings.listen.port(), 8080);
        assert_eq!(settings.chart.output, PathBuf::from("out.svg"));
        assert_eq!(settings.chart.width, 640);
        assert_eq!(settings.chart.height, 240);
        assert_eq!(settings.currency, "R$");
        assert!(!settings.newest_first);
    }

    #[test]
    fn rejects_unknown_legacy_policy() {
        let config = MapConfig::new(&[(("ledger", "legacy_schema"), "shred")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "legacy_schema"));
    }

    #[test]
    fn rejects_bad_listen_address() {
        let config = MapConfig::new(&[(("web", "listen"), "localhost")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { section, .. } if section == "web"));
    }

    #[test]
    fn rejects_non_positive_chart_size() {
        let config = MapConfig::new(&[(("chart", "width"), "0")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "width"));
    }

    #[test]
    fn rejects_non_numeric_chart_size() {
        let config = MapConfig::new(&[(("chart", "width"), "wide")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(
            matches!(err, LedgerError::ConfigInvalid { key, reason, .. } if key == "width" && reason.contains("wide"))
        );
    }

    #[test]
    fn rejects_chart_too_small_to_draw() {
        let config = MapConfig::new(&[(("chart", "height"), "100")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "height"));

        let config = MapConfig::new(&[
            (("chart", "width"), "240"),
            (("chart", "height"), "160"),
        ]);
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.chart.width, MIN_CHART_WIDTH);
        assert_eq!(settings.chart.height, MIN_CHART_HEIGHT);
    }

    #[test]
    fn rejects_unrecognized_boolean() {
        let config = MapConfig::new(&[(("display", "newest_first"), "sometimes")]);
        let err = Settings::from_config(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "newest_first"));
    }
}
