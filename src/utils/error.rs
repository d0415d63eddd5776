use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceAlertError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Check func not found: {name}")]
    CheckFuncNotFound { name: String },

    #[error("Could not read price from {shop}: {message}")]
    ParseError { shop: String, message: String },

    #[error("Inconsistent prices from {shop}: regular {regular:.2} is not above current {current:.2}")]
    InconsistentPrice {
        shop: String,
        current: f64,
        regular: f64,
    },

    #[error("Notification via {channel} failed: {message}")]
    NotificationError { channel: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Parsing,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PriceAlertError {
    pub fn parse(shop: &str, message: impl Into<String>) -> Self {
        PriceAlertError::ParseError {
            shop: shop.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PriceAlertError::HttpError(_) => ErrorCategory::Network,
            PriceAlertError::ConfigError { .. }
            | PriceAlertError::MissingConfigError { .. }
            | PriceAlertError::InvalidConfigValueError { .. }
            | PriceAlertError::CheckFuncNotFound { .. }
            | PriceAlertError::YamlError(_) => ErrorCategory::Configuration,
            PriceAlertError::ParseError { .. }
            | PriceAlertError::InconsistentPrice { .. }
            | PriceAlertError::SerializationError(_) => ErrorCategory::Parsing,
            PriceAlertError::NotificationError { .. } => ErrorCategory::Notification,
            PriceAlertError::IoError(_)
            | PriceAlertError::CsvError(_)
            | PriceAlertError::TaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Notification => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Parsing => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 程序結束碼：設定錯誤為 1，單次檢查失敗為 2，系統錯誤為 3
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PriceAlertError::HttpError(_) => {
                "Check the network connection and that the product URL is still online"
            }
            PriceAlertError::CheckFuncNotFound { .. } => {
                "Use one of: check_galaxus, check_baechli, check_intersport, check_primal, check_transa"
            }
            PriceAlertError::ParseError { .. } | PriceAlertError::InconsistentPrice { .. } => {
                "The shop page layout may have changed; verify the URL in a browser"
            }
            PriceAlertError::NotificationError { .. } => {
                "Check the webhook URL and that the receiving service is reachable"
            }
            PriceAlertError::YamlError(_) => "Make sure the config file is valid YAML",
            PriceAlertError::ConfigError { .. }
            | PriceAlertError::MissingConfigError { .. }
            | PriceAlertError::InvalidConfigValueError { .. } => {
                "Fix the highlighted value in config.yml and try again"
            }
            PriceAlertError::IoError(_) | PriceAlertError::CsvError(_) => {
                "Check file permissions and available disk space"
            }
            PriceAlertError::SerializationError(_) | PriceAlertError::TaskError(_) => {
                "Re-run with --verbose and report the log output"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Network => format!("Could not reach shop: {}", self),
            ErrorCategory::Parsing => format!("Could not read price: {}", self),
            ErrorCategory::Notification => format!("Could not send alert: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceAlertError>;
