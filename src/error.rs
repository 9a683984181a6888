use thiserror::Error;

/// Comprehensive error types for impresascope
#[derive(Error, Debug)]
pub enum ResearchError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file: {path}")]
    InvalidConfig { path: String },

    #[error("Invalid extraction rule for field '{field}': {message}")]
    InvalidRule { field: String, message: String },

    // Network errors
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP request failed: {url} - {status}")]
    HttpRequest { url: String, status: u16 },

    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    #[error("Rate limit exceeded for domain: {domain}")]
    RateLimit { domain: String },

    // Search/fetch errors
    #[error("Search failed for query '{query}': {message}")]
    Search { query: String, message: String },

    #[error("Missing credentials for backend: {backend}")]
    MissingCredentials { backend: String },

    // Aspect pipeline errors
    #[error("Aspect '{aspect}' failed: {message}")]
    Aspect { aspect: String, message: String },

    #[error("All aspects failed for company: {company}")]
    AllAspectsFailed { company: String },

    // Export errors
    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ResearchError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Create a search error
    pub fn search(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Search { query: query.into(), message: message.into() }
    }

    /// Create an aspect failure
    pub fn aspect(aspect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Aspect { aspect: aspect.into(), message: message.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Check if error is recoverable.
    ///
    /// Recoverable errors cost the failing query its results but do not
    /// abort the aspect; non-recoverable errors mark the whole aspect as
    /// failed in the consolidated record.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. }
            | Self::HttpRequest { .. }
            | Self::Timeout { .. }
            | Self::RateLimit { .. }
            | Self::Search { .. } => true,

            Self::Configuration { .. }
            | Self::InvalidConfig { .. }
            | Self::InvalidRule { .. }
            | Self::MissingCredentials { .. } => false,

            _ => false,
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } | Self::InvalidConfig { .. } | Self::InvalidRule { .. } => {
                "configuration"
            }
            Self::Network { .. } | Self::HttpRequest { .. } | Self::Timeout { .. } => "network",
            Self::RateLimit { .. } | Self::Search { .. } | Self::MissingCredentials { .. } => {
                "fetch"
            }
            Self::Aspect { .. } | Self::AllAspectsFailed { .. } => "aspect",
            Self::Export { .. } | Self::UnsupportedFormat { .. } => "export",
            Self::Internal { .. } | Self::Cancelled => "internal",
        }
    }

    /// Get suggested retry delay for recoverable errors
    pub fn retry_delay(&self) -> Option<std::time::Duration> {
        match self {
            Self::Network { .. } => Some(std::time::Duration::from_secs(5)),
            Self::HttpRequest { .. } => Some(std::time::Duration::from_secs(10)),
            Self::Timeout { .. } => Some(std::time::Duration::from_secs(15)),
            Self::RateLimit { .. } => Some(std::time::Duration::from_secs(60)),
            _ => None,
        }
    }
}

/// Result type alias for impresascope
pub type ResearchResult<T> = std::result::Result<T, ResearchError>;

impl From<reqwest::Error> for ResearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if let Some(status) = err.status() {
            Self::HttpRequest {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else {
            Self::Network { message: err.to_string() }
        }
    }
}

impl From<anyhow::Error> for ResearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ResearchError::config("Invalid setting");
        assert_eq!(error.category(), "configuration");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_recoverable_errors() {
        let network_error = ResearchError::network("Connection failed");
        assert!(network_error.is_recoverable());
        assert!(network_error.retry_delay().is_some());

        let rule_error = ResearchError::InvalidRule {
            field: "fatturato".to_string(),
            message: "unclosed group".to_string(),
        };
        assert!(!rule_error.is_recoverable());
        assert!(rule_error.retry_delay().is_none());
    }

    #[test]
    fn test_search_errors_recover_locally() {
        let error = ResearchError::search("\"Ferrero\" bilancio", "dns failure");
        assert!(error.is_recoverable());
        assert_eq!(error.category(), "fetch");
    }
}
