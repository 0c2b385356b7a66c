use crate::adapters::reader::SUPPORTED_EXTENSIONS;
use crate::config::options::{ColumnSelection, ExportLayout, ProcessingOptions};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CleanError, Result};
use crate::utils::validation::{self, Validate};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MAX_INPUT_MB: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    /// Sheet name -> column keys; `"*"` applies to every other sheet.
    #[serde(default)]
    pub columns: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub options: ProcessingOptions,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub max_size_mb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub layout: Option<ExportLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub system_stats: Option<bool>,
    /// `compact` (default) or `json`.
    pub log_format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CleanError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CleanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// in place. `$${name}` is written out as a literal `${name}`, which is how
    /// replacement targets spell named capture references.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$(\$)?\{([^}]+)\}").map_err(|e| CleanError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[2];
            if caps.get(1).is_some() {
                return format!("${{{}}}", var_name);
            }
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;

        if self.input.path.contains("${") {
            return Err(CleanError::MissingConfigError {
                field: format!("input.path ({})", self.input.path),
            });
        }
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, SUPPORTED_EXTENSIONS)?;

        if let Some(max) = self.input.max_size_mb {
            validation::validate_positive_number("input.max_size_mb", max, 1)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;

        for (sheet, columns) in &self.columns {
            if columns.is_empty() {
                return Err(CleanError::InvalidConfigValueError {
                    field: format!("columns.{}", sheet),
                    value: "[]".to_string(),
                    reason: "List at least one column or remove the entry".to_string(),
                });
            }
        }

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format) {
                return Err(CleanError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        self.options.validate()
    }

    pub fn system_stats_enabled(&self) -> bool {
        self.monitoring
            .as_ref()
            .map(|m| m.enabled && m.system_stats.unwrap_or(true))
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|f| f == "json")
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn processing_options(&self) -> ProcessingOptions {
        self.options.clone()
    }

    fn column_selection(&self) -> ColumnSelection {
        ColumnSelection::from_table(self.columns.clone())
    }

    fn export_layout(&self) -> ExportLayout {
        self.load.layout.unwrap_or_default()
    }

    fn max_input_bytes(&self) -> usize {
        self.input
            .max_size_mb
            .unwrap_or(DEFAULT_MAX_INPUT_MB)
            .saturating_mul(1024 * 1024)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{PatternPolicy, ReplacementRule};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "customers-cleanup"

[input]
path = "customers.json"

[columns]
"*" = ["email"]
suppliers = ["company", "email"]

[options]
convert_to_lowercase = true
on_invalid_pattern = "abort"

[[options.custom_replacements]]
from = "\\s+"
to = ""

[load]
output_path = "./out"
layout = "compact"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.job.name, "customers-cleanup");
        assert_eq!(config.input_path(), "customers.json");
        assert_eq!(config.export_layout(), ExportLayout::Compact);
        assert_eq!(config.max_input_bytes(), 10 * 1024 * 1024);

        let options = config.processing_options();
        assert!(options.convert_to_lowercase);
        // Unlisted options keep their defaults.
        assert!(options.remove_duplicates);
        assert!(options.trim_whitespace);
        assert_eq!(options.on_invalid_pattern, PatternPolicy::Abort);
        assert_eq!(options.custom_replacements, vec![ReplacementRule::new("\\s+", "")]);

        let selection = config.column_selection();
        assert_eq!(selection.columns_for("suppliers").len(), 2);
        assert_eq!(selection.columns_for("clients"), ["email".to_string()]);
        assert!(config.validate().is_ok());
        assert!(!config.system_stats_enabled());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_minimal_config_selects_nothing_explicitly() {
        let config = TomlConfig::from_toml_str(
            r#"
[job]
name = "min"

[input]
path = "a.csv"

[load]
output_path = "./out"
"#,
        )
        .unwrap();

        assert!(config.column_selection().is_unspecified());
        assert_eq!(config.processing_options(), ProcessingOptions::default());
        assert_eq!(config.export_layout(), ExportLayout::Detailed);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHEET_CLEAN_TEST_INPUT", "from_env.csv");

        let config = TomlConfig::from_toml_str(
            r#"
[job]
name = "env"

[input]
path = "${SHEET_CLEAN_TEST_INPUT}"

[load]
output_path = "./out"
"#,
        )
        .unwrap();
        assert_eq!(config.input.path, "from_env.csv");

        std::env::remove_var("SHEET_CLEAN_TEST_INPUT");
    }

    #[test]
    fn test_escaped_capture_reference_is_not_substituted() {
        std::env::set_var("area", "from_env");

        let config = TomlConfig::from_toml_str(
            r#"
[job]
name = "phones"

[input]
path = "phones.csv"

[[options.custom_replacements]]
from = "\\((?P<area>\\d{3})\\) "
to = "$${area}-"

[[options.custom_replacements]]
from = "\\.(?P<tail>\\d{4})$"
to = "-$tail"

[load]
output_path = "./out"
"#,
        )
        .unwrap();
        std::env::remove_var("area");

        let rules = &config.options.custom_replacements;
        assert_eq!(rules[0].to, "${area}-");
        assert_eq!(rules[1].to, "-$tail");
    }

    #[test]
    fn test_unresolved_variable_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[job]
name = "env"

[input]
path = "${SHEET_CLEAN_DEFINITELY_UNSET}"

[load]
output_path = "./out"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(CleanError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let bad_case = BASIC.replace(
            "convert_to_lowercase = true",
            "convert_to_lowercase = true\nconvert_to_uppercase = true",
        );
        let config = TomlConfig::from_toml_str(&bad_case).unwrap();
        assert!(matches!(config.validate(), Err(CleanError::CaseConflict)));

        let bad_ext = BASIC.replace("customers.json", "customers.xlsx");
        let config = TomlConfig::from_toml_str(&bad_ext).unwrap();
        assert!(config.validate().is_err());

        let empty_columns = BASIC.replace("suppliers = [\"company\", \"email\"]", "suppliers = []");
        let config = TomlConfig::from_toml_str(&empty_columns).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_config_validation_error() {
        let err = TomlConfig::from_toml_str("[job\nname=").unwrap_err();
        assert!(matches!(err, CleanError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_monitoring_section() {
        let with_monitoring = format!(
            "{}\n[monitoring]\nenabled = true\nlog_format = \"json\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&with_monitoring).unwrap();
        assert!(config.system_stats_enabled());
        assert!(config.json_logs());

        let bad = with_monitoring.replace("\"json\"", "\"xml\"");
        let config = TomlConfig::from_toml_str(&bad).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "customers-cleanup");
    }
}
