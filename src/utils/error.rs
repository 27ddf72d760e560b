use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Order message is empty")]
    EmptyMessage,

    #[error("No products found in order message")]
    NoProductsFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Catalog,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OrderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OrderError::ValidationError { .. }
            | OrderError::EmptyMessage
            | OrderError::NoProductsFound => ErrorCategory::Input,
            OrderError::ConfigError { .. }
            | OrderError::ConfigValidationError { .. }
            | OrderError::InvalidConfigValueError { .. }
            | OrderError::MissingConfigError { .. } => ErrorCategory::Configuration,
            OrderError::HttpError(_) | OrderError::CatalogError { .. } => ErrorCategory::Catalog,
            OrderError::IoError(_)
            | OrderError::SerializationError(_)
            | OrderError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 訊息裡沒有商品只是提示，不算失敗
            OrderError::NoProductsFound => ErrorSeverity::Low,
            OrderError::HttpError(_) | OrderError::CatalogError { .. } => ErrorSeverity::Medium,
            OrderError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給店員看的訊息（西班牙文，與後台介面一致）
    pub fn user_friendly_message(&self) -> String {
        match self {
            OrderError::EmptyMessage => "Pega un mensaje de WhatsApp primero".to_string(),
            OrderError::NoProductsFound => "No se encontraron productos en el mensaje".to_string(),
            OrderError::ValidationError { message } => message.clone(),
            OrderError::HttpError(_) | OrderError::CatalogError { .. } => {
                "No se pudo cargar el catálogo de productos".to_string()
            }
            OrderError::ConfigError { .. }
            | OrderError::ConfigValidationError { .. }
            | OrderError::InvalidConfigValueError { .. }
            | OrderError::MissingConfigError { .. } => format!("Configuración inválida: {}", self),
            _ => format!("Error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check that the message contains a '--- PRODUCTOS ---' section with Cantidad/Precio lines"
            }
            ErrorCategory::Configuration => "Review the TOML config file and command line flags",
            ErrorCategory::Catalog => {
                "Verify the catalog endpoint or file is reachable and returns a JSON array of products"
            }
            ErrorCategory::System => "Check file paths and permissions, then retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
