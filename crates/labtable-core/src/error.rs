//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Backend Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Backend request failed: {message}")]
    Backend { message: String },

    #[error("Backend returned HTTP {status} for {endpoint}")]
    BackendStatus { endpoint: String, status: u16 },

    #[error("Invalid backend URL: {url}")]
    InvalidUrl { url: String },

    // ─────────────────────────────────────────────────────────────
    // Push Channel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Push channel error: {message}")]
    Push { message: String },

    #[error("Push protocol error: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid log date '{input}', expected MM/DD/YYYY")]
    InvalidLogDate { input: String },

    // ─────────────────────────────────────────────────────────────
    // Table Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Please stop current test before starting a new one")]
    RowRunning,

    #[error("No row at index {index}")]
    RowNotFound { index: usize },

    #[error("Column '{column}' is not editable")]
    CellLocked { column: String },

    #[error("Test id counter exhausted at {last_tid}")]
    CounterExhausted { last_tid: u64 },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn backend_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::BackendStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn push(message: impl Into<String>) -> Self {
        Self::Push {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_log_date(input: impl Into<String>) -> Self {
        Self::InvalidLogDate {
            input: input.into(),
        }
    }

    pub fn cell_locked(column: impl Into<String>) -> Self {
        Self::CellLocked {
            column: column.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Backend { .. }
                | Error::BackendStatus { .. }
                | Error::Push { .. }
                | Error::Protocol { .. }
                | Error::RowRunning
                | Error::RowNotFound { .. }
                | Error::CellLocked { .. }
                | Error::CounterExhausted { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Terminal { .. }
                | Error::InvalidUrl { .. }
                | Error::InvalidLogDate { .. }
                | Error::Config { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
