//! INI file configuration adapter.

use crate::domain::error::BarTraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BarTraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BarTraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BarTraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BarTraderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
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
[instrument]
symbol = SPY
timezone = America/New_York

[session]
reset_time = 09:30

[strategy]
policy = mean_reversion
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("instrument", "timezone"),
            Some("America/New_York".to_string())
        );
        // ':' inside a value after '=' stays in the value
        assert_eq!(
            adapter.get_string("session", "reset_time"),
            Some("09:30".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "policy"),
            Some("mean_reversion".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[instrument]\nsymbol = SPY\n").unwrap();
        assert_eq!(adapter.get_string("instrument", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Sizing]\nAccount_Equity = 5000.5\n").unwrap();
        assert_eq!(
            adapter.get_string("sizing", "account_equity"),
            Some("5000.5".to_string())
        );
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[execution]\nfirst_order_id = 100\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("execution", "first_order_id"),
            Some("100".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(BarTraderError::ConfigParse { .. })));
    }
}
