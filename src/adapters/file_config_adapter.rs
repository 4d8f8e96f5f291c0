//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

/// Empty configuration: every lookup falls back to its default.
impl Default for FileConfigAdapter {
    fn default() -> Self {
        Self { config: Ini::new() }
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
        match self.config.get(section, key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| raw),
        }
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String> {
        match self.config.get(section, key) {
            None => Ok(None),
            Some(raw) => Self::parse_bool(raw.trim()).map(Some).ok_or(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[ledger]
path = /home/me/ledger.csv
legacy_schema = refuse

[web]
listen = 0.0.0.0:8080
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "path"),
            Some("/home/me/ledger.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("0.0.0.0:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[ledger]\npath = a.csv\n").unwrap();
        assert_eq!(adapter.get_string("ledger", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn default_adapter_is_empty() {
        let adapter = FileConfigAdapter::default();
        assert_eq!(adapter.get_string("ledger", "path"), None);
        assert_eq!(adapter.get_int("chart", "width"), Ok(None));
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[chart]\nwidth = 640\n").unwrap();
        assert_eq!(adapter.get_int("chart", "width"), Ok(Some(640)));
    }

    #[test]
    fn get_int_reports_non_numeric_text() {
        let adapter = FileConfigAdapter::from_string("[chart]\nwidth = wide\n").unwrap();
        assert_eq!(adapter.get_int("chart", "width"), Err("wide".to_string()));
    }

    #[test]
    fn get_bool_parses_true_and_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[web]\na = true\nb = yes\nc = 0\nd = no\n").unwrap();
        assert_eq!(adapter.get_bool("web", "a"), Ok(Some(true)));
        assert_eq!(adapter.get_bool("web", "b"), Ok(Some(true)));
        assert_eq!(adapter.get_bool("web", "c"), Ok(Some(false)));
        assert_eq!(adapter.get_bool("web", "d"), Ok(Some(false)));
        assert_eq!(adapter.get_bool("web", "missing"), Ok(None));
    }

    #[test]
    fn get_bool_reports_unrecognized_text() {
        let adapter = FileConfigAdapter::from_string("[display]\nnewest_first = maybe\n").unwrap();
        assert_eq!(
            adapter.get_bool("display", "newest_first"),
            Err("maybe".to_string())
        );
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[chart]\noutput = /tmp/dashboard.svg\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("chart", "output"),
            Some("/tmp/dashboard.svg".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/finledger.ini");
        assert!(result.is_err());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Display]\nCurrency = R$\n").unwrap();
        assert_eq!(
            adapter.get_string("display", "currency"),
            Some("R$".to_string())
        );
    }
}
