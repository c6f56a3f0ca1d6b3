use crate::config::{OutputFormat, TomlConfig};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_existing_dir, validate_icao, validate_non_empty_string, validate_path,
    validate_required_field, Validate,
};
use clap::Parser;

const DEFAULT_DATA_DIR: &str = ".";

#[derive(Debug, Clone, Parser)]
#[command(name = "routefinder")]
#[command(about = "Find an IFR route between two airports using compiled navdata")]
pub struct RouteCliConfig {
    /// ICAO of departure airport
    pub orig: String,

    /// ICAO of arrival airport
    pub dest: String,

    /// Directory holding graph.json and info.json
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Restrict the SID to the one exiting at this fix
    #[arg(long)]
    pub sid_exit: Option<String>,

    /// Restrict the STAR to the one entering at this fix
    #[arg(long)]
    pub star_entry: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl RouteCliConfig {
    /// 命令列參數優先於設定檔
    pub fn apply_file_config(&mut self, file: &TomlConfig) {
        if self.data_dir.is_none() {
            self.data_dir = file.data.output_dir.clone();
        }
        if self.format.is_none() {
            self.format = file.route.default_format;
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

impl ConfigProvider for RouteCliConfig {
    fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn monitoring_enabled(&self) -> bool {
        false
    }
}

impl Validate for RouteCliConfig {
    fn validate(&self) -> Result<()> {
        validate_icao("orig", &self.orig)?;
        validate_icao("dest", &self.dest)?;
        validate_path("data_dir", self.data_dir())?;
        if let Some(fix) = &self.sid_exit {
            validate_non_empty_string("sid_exit", fix)?;
        }
        if let Some(fix) = &self.star_entry {
            validate_non_empty_string("star_entry", fix)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "compile-navdata")]
#[command(about = "Compile Navigraph data for Aerosoft into routefinder data files")]
pub struct CompileCliConfig {
    /// Path of Navigraph data for Aerosoft
    pub navdata_path: Option<String>,

    /// Where to write graph.json, info.json and manifest.json
    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CompileCliConfig {
    pub fn apply_file_config(&mut self, file: &TomlConfig) {
        if self.navdata_path.is_none() {
            self.navdata_path = file.data.navdata_path.clone();
        }
        if self.output_dir.is_none() {
            self.output_dir = file.data.output_dir.clone();
        }
        self.monitor |= file.monitoring_enabled();
    }

    pub fn navdata_path(&self) -> &str {
        self.navdata_path.as_deref().unwrap_or_default()
    }
}

impl ConfigProvider for CompileCliConfig {
    fn data_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CompileCliConfig {
    fn validate(&self) -> Result<()> {
        let navdata = validate_required_field("navdata_path", &self.navdata_path)?;
        validate_existing_dir("navdata_path", navdata)?;
        validate_path("output_dir", self.data_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RouteError;

    #[test]
    fn test_parse_route_args() {
        let config = RouteCliConfig::try_parse_from([
            "routefinder",
            "ZSFZ",
            "ZSPD",
            "--sid-exit",
            "DST",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.orig, "ZSFZ");
        assert_eq!(config.sid_exit.as_deref(), Some("DST"));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.data_dir(), ".");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_route_args_require_two_airports() {
        assert!(RouteCliConfig::try_parse_from(["routefinder", "ZSFZ"]).is_err());
    }

    #[test]
    fn test_route_validation_rejects_bad_icao() {
        let config = RouteCliConfig::try_parse_from(["routefinder", "ZSF", "ZSPD"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RouteError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_cli_flags_override_file_config() {
        let file = TomlConfig::from_toml_str(
            "[data]\noutput_dir = \"/srv/compiled\"\n[route]\ndefault_format = \"json\"\n",
        )
        .unwrap();

        let mut config = RouteCliConfig::try_parse_from(["routefinder", "ZSFZ", "ZSPD"]).unwrap();
        config.apply_file_config(&file);
        assert_eq!(config.data_dir(), "/srv/compiled");
        assert_eq!(config.output_format(), OutputFormat::Json);

        let mut config = RouteCliConfig::try_parse_from([
            "routefinder",
            "ZSFZ",
            "ZSPD",
            "--data-dir",
            "./local",
            "--format",
            "text",
        ])
        .unwrap();
        config.apply_file_config(&file);
        assert_eq!(config.data_dir(), "./local");
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_compile_requires_navdata_path() {
        let config = CompileCliConfig::try_parse_from(["compile-navdata"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RouteError::MissingConfigError { .. })
        ));

        let mut config = CompileCliConfig::try_parse_from(["compile-navdata"]).unwrap();
        let file = TomlConfig::from_toml_str(
            "[data]\nnavdata_path = \"/definitely/not/here\"\n[monitoring]\nenabled = true\n",
        )
        .unwrap();
        config.apply_file_config(&file);
        assert_eq!(config.navdata_path(), "/definitely/not/here");
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_err());
    }
}
