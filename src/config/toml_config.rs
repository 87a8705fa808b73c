use crate::utils::error::{ChecklistError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_CONFIG_FILE: &str = "sheet-checklist.toml";
pub const DEFAULT_DATA_DIR: &str = "./.sheet-checklist";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("sheet-checklist/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub rows: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ChecklistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ChecklistError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Loads `path` when given, else the default file when it exists, else
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path.display());
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 600)?;
        validation::validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        validation::validate_positive_number("preview.rows", self.preview.rows, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
data_dir = "/tmp/checklist"

[http]
timeout_seconds = 10
user_agent = "custom/2.0"

[preview]
rows = 3
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/checklist"));
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.http.user_agent, "custom/2.0");
        assert_eq!(config.preview.rows, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AppConfig::from_toml_str("[preview]\nrows = 8\n").unwrap();

        assert_eq!(config.preview.rows, 8);
        assert_eq!(config.storage.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHEET_CHECKLIST_TEST_DIR", "/var/lib/checklist");

        let config =
            AppConfig::from_toml_str("[storage]\ndata_dir = \"${SHEET_CHECKLIST_TEST_DIR}\"\n").unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/checklist"));

        std::env::remove_var("SHEET_CHECKLIST_TEST_DIR");
    }

    #[test]
    fn test_unset_env_var_left_as_is() {
        let config =
            AppConfig::from_toml_str("[http]\nuser_agent = \"${SHEET_CHECKLIST_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.http.user_agent, "${SHEET_CHECKLIST_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str("[preview]\nrows = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[http]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml_str("[preview]\nrows = \"many\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./from-file\"\n")
            .unwrap();

        let config = AppConfig::load(Some(temp_file.path())).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("./from-file"));
    }
}
