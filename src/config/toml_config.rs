use crate::config::OutputFormat;
use crate::utils::error::{Result, RouteError};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub data: DataConfig,
    pub route: RouteConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Aerosoft 格式的 Navigraph 資料目錄
    pub navdata_path: Option<String>,
    /// 編譯輸出目錄，同時也是查詢航路時讀取的目錄
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub default_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub system_stats: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RouteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RouteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NAVDATA_PATH})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RouteError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled && self.monitoring.system_stats.unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.data.navdata_path {
            validate_path("data.navdata_path", path)?;
        }
        if let Some(path) = &self.data.output_dir {
            validate_path("data.output_dir", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[data]
navdata_path = "/opt/navdata"
output_dir = "./compiled"

[route]
default_format = "json"

[monitoring]
enabled = true
"#,
        )
        .unwrap();

        assert_eq!(config.data.navdata_path.as_deref(), Some("/opt/navdata"));
        assert_eq!(config.data.output_dir.as_deref(), Some("./compiled"));
        assert_eq!(config.route.default_format, Some(OutputFormat::Json));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.data.navdata_path.is_none());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ROUTEFINDER_TEST_NAVDATA", "/data/asdata");
        let config = TomlConfig::from_toml_str(
            r#"
[data]
navdata_path = "${ROUTEFINDER_TEST_NAVDATA}"
output_dir = "${ROUTEFINDER_TEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();
        assert_eq!(config.data.navdata_path.as_deref(), Some("/data/asdata"));
        assert_eq!(
            config.data.output_dir.as_deref(),
            Some("${ROUTEFINDER_TEST_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[data\nnavdata_path = 1").unwrap_err();
        assert!(matches!(err, RouteError::ConfigError { .. }));

        let err = TomlConfig::from_toml_str("[route]\ndefault_format = \"xml\"").unwrap_err();
        assert!(matches!(err, RouteError::ConfigError { .. }));
    }

    #[test]
    fn test_load_failures_map_to_exit_codes() {
        let err = TomlConfig::from_file("/definitely/not/here/routefinder.toml").unwrap_err();
        assert!(matches!(err, RouteError::IoError(_)));
        assert_eq!(err.exit_code(), 3);

        let err = TomlConfig::from_toml_str("[data\n").unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = TomlConfig::from_toml_str("[data]\noutput_dir = \"\"").unwrap();
        assert!(config.validate().is_err());
    }
}
