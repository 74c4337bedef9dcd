use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafariError {
    #[error("Failed to retrieve {url}: {source}")]
    RetrievalError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} while retrieving {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("No <title> element found in {url}")]
    ParseError { url: String },

    #[error("Encoding error in {field}: {message}")]
    EncodingError { field: String, message: String },

    #[error("No launch target accepted the note (tried: {})", .attempted.join(", "))]
    LaunchError { attempted: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Encoding,
    Launch,
    Io,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SafariError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SafariError::RetrievalError { .. } | SafariError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            SafariError::ParseError { .. } => ErrorCategory::Parse,
            SafariError::EncodingError { .. } => ErrorCategory::Encoding,
            SafariError::LaunchError { .. } => ErrorCategory::Launch,
            SafariError::IoError(_) => ErrorCategory::Io,
            SafariError::ConfigError { .. }
            | SafariError::ConfigValidationError { .. }
            | SafariError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Encoding | ErrorCategory::Launch => {
                ErrorSeverity::High
            }
            ErrorCategory::Io | ErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SafariError::RetrievalError { .. } => {
                "Check your network connection and that the URL is reachable"
            }
            SafariError::HttpStatusError { .. } => {
                "The server rejected the request; open the page in a browser to confirm it exists"
            }
            SafariError::ParseError { .. } => {
                "The page has no <title>; it may require JavaScript or a login to render"
            }
            SafariError::EncodingError { .. } => {
                "Make sure the input is valid UTF-8 and the launch template is a valid URL"
            }
            SafariError::LaunchError { .. } => {
                "Install one of the configured apps, or pass --print to write the note to stdout"
            }
            SafariError::IoError(_) => "Check file permissions and that the paths exist",
            SafariError::ConfigError { .. }
            | SafariError::ConfigValidationError { .. }
            | SafariError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SafariError::RetrievalError { url, .. } => format!("Could not reach {}", url),
            SafariError::HttpStatusError { url, status } => {
                format!("{} answered with HTTP {}", url, status)
            }
            SafariError::ParseError { url } => format!("No page title found at {}", url),
            SafariError::LaunchError { .. } => "No app could open the note".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SafariError>;
