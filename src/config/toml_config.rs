use crate::core::ConfigProvider;
use crate::core::table::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
    pub debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub breadcrumb_max_items: usize,
    pub toast_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            breadcrumb_max_items: 4,
            toast_capacity: crate::core::notify::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: "./exports".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static placeholder pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(token) = &self.api.token {
            if token.starts_with("${") {
                return Err(AdminError::MissingConfigError {
                    field: format!("api.token (environment variable {})", token),
                });
            }
        }

        if let Some(timeout) = self.api.timeout_seconds {
            crate::utils::validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        crate::utils::validation::validate_range("table.page_size", self.table.page_size, 1, 500)?;
        crate::utils::validation::validate_positive_number(
            "ui.toast_capacity",
            self.ui.toast_capacity,
            1,
        )?;
        crate::utils::validation::validate_non_empty_string("export.dir", &self.export.dir)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn auth_token(&self) -> Option<&str> {
        self.api.token.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(30))
    }

    fn page_size(&self) -> usize {
        self.table.page_size
    }

    fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.table.debounce_ms)
    }

    fn breadcrumb_max_items(&self) -> usize {
        self.ui.breadcrumb_max_items
    }

    fn toast_capacity(&self) -> usize {
        self.ui.toast_capacity
    }

    fn export_dir(&self) -> &str {
        &self.export.dir
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
