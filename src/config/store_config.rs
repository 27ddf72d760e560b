use crate::domain::model::MatchTuning;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{OrderError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, validate_url, validate_whatsapp_number, Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap()
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store: StoreSection,
    pub catalog: Option<CatalogConfig>,
    pub matching: Option<MatchingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub name: String,
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub source: CatalogSourceKind,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub min_token_chars: Option<usize>,
    pub required_overlap: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store: StoreSection {
                name: "Mi Tienda".to_string(),
                whatsapp_number: "573001234567".to_string(),
            },
            catalog: None,
            matching: None,
        }
    }
}

impl StoreConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OrderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${CATALOG_TOKEN}` 或 `${CATALOG_TOKEN:-預設值}`。
    ///
    /// 沒有設定也沒有預設值時回傳錯誤，避免把 `${...}` 原樣當成 token 送給後台。
    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut missing = Vec::new();

        let result = ENV_REFERENCE.replace_all(content, |caps: &Captures| {
            match (std::env::var(&caps[1]), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => {
                    missing.push(caps[1].to_string());
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            return Err(OrderError::ConfigError {
                message: format!("environment variable(s) not set: {}", missing.join(", ")),
            });
        }

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("store.name", &self.store.name)?;
        validate_whatsapp_number("store.whatsapp_number", &self.store.whatsapp_number)?;

        if let Some(catalog) = &self.catalog {
            match catalog.source {
                CatalogSourceKind::File => {
                    let path = validate_required_field("catalog.path", &catalog.path)?;
                    validate_path("catalog.path", path)?;
                    validate_file_extension("catalog.path", path, &["json"])?;
                }
                CatalogSourceKind::Http => {
                    let endpoint = validate_required_field("catalog.endpoint", &catalog.endpoint)?;
                    validate_url("catalog.endpoint", endpoint)?;
                }
            }
            if let Some(timeout) = catalog.timeout_seconds {
                validate_positive_number("catalog.timeout_seconds", timeout as usize, 1)?;
            }
        }

        if let Some(matching) = &self.matching {
            if let Some(overlap) = matching.required_overlap {
                validate_positive_number("matching.required_overlap", overlap, 1)?;
            }
        }

        Ok(())
    }

    pub fn match_tuning(&self) -> MatchTuning {
        let defaults = MatchTuning::default();
        let matching = self.matching.clone().unwrap_or_default();
        MatchTuning {
            min_token_chars: matching.min_token_chars.unwrap_or(defaults.min_token_chars),
            required_overlap: matching.required_overlap.unwrap_or(defaults.required_overlap),
        }
    }
}

impl ConfigProvider for StoreConfig {
    fn store_name(&self) -> &str {
        &self.store.name
    }

    fn whatsapp_number(&self) -> &str {
        &self.store.whatsapp_number
    }

    fn match_tuning(&self) -> MatchTuning {
        StoreConfig::match_tuning(self)
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_store_config() {
        let toml_content = r#"
[store]
name = "Carnes La 14"
whatsapp_number = "573001112233"

[catalog]
source = "http"
endpoint = "https://tienda.example.com/api/products"
timeout_seconds = 5

[matching]
required_overlap = 1
"#;

        let config = StoreConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.store_name(), "Carnes La 14");
        assert_eq!(config.catalog.as_ref().unwrap().source, CatalogSourceKind::Http);
        assert_eq!(
            config.match_tuning(),
            MatchTuning {
                min_token_chars: 2,
                required_overlap: 1
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_STORE_CATALOG_TOKEN", "secreto-123");

        let toml_content = r#"
[store]
name = "Mi Tienda"
whatsapp_number = "573001234567"

[catalog]
source = "http"
endpoint = "http://localhost:3000/api/products"
token = "${TEST_STORE_CATALOG_TOKEN}"
"#;

        let config = StoreConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.catalog.unwrap().token.as_deref(),
            Some("secreto-123")
        );

        std::env::remove_var("TEST_STORE_CATALOG_TOKEN");
    }

    #[test]
    fn test_env_var_default_and_missing() {
        let with_default = r#"
[store]
name = "${TEST_STORE_NAME_UNSET:-Carnes La 80}"
whatsapp_number = "573001234567"
"#;
        let config = StoreConfig::from_toml_str(with_default).unwrap();
        assert_eq!(config.store.name, "Carnes La 80");

        // 沒有預設值的變數不能原樣留在 token 裡
        let without_default = r#"
[store]
name = "Mi Tienda"
whatsapp_number = "573001234567"

[catalog]
source = "http"
endpoint = "http://localhost:3000/api/products"
token = "${TEST_STORE_TOKEN_UNSET}"
"#;
        let err = StoreConfig::from_toml_str(without_default).unwrap_err();
        assert!(matches!(err, OrderError::ConfigError { .. }));
        assert!(err.to_string().contains("TEST_STORE_TOKEN_UNSET"));
    }

    #[test]
    fn test_config_validation() {
        let bad_number = r#"
[store]
name = "Mi Tienda"
whatsapp_number = "+57 300 123"
"#;
        assert!(StoreConfig::from_toml_str(bad_number).unwrap().validate().is_err());

        let missing_path = r#"
[store]
name = "Mi Tienda"
whatsapp_number = "573001234567"

[catalog]
source = "file"
"#;
        assert!(matches!(
            StoreConfig::from_toml_str(missing_path).unwrap().validate(),
            Err(OrderError::MissingConfigError { .. })
        ));

        let zero_overlap = r#"
[store]
name = "Mi Tienda"
whatsapp_number = "573001234567"

[matching]
required_overlap = 0
"#;
        assert!(StoreConfig::from_toml_str(zero_overlap).unwrap().validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            StoreConfig::from_toml_str("[store\nname ="),
            Err(OrderError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.match_tuning(), MatchTuning::default());
    }
}
