use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "batch.chunk_size", "messages[3]")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "input_policy", "client_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the spam-scoring client.
#[derive(Debug, Error)]
pub enum Error {
    /// Empty or over-limit input, rejected before anything is sent.
    #[error("Input error: {message}{}", format_context(.context))]
    Input {
        message: String,
        context: ErrorContext,
    },

    /// Invalid client or batch configuration (e.g. a zero chunk size).
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Scoring the item at `index` failed; the whole batch run was abandoned.
    #[error("Scorer failed for item {index}: {source}")]
    Scorer {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new input error with structured context
    pub fn input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Input {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::input_with_context(msg, ErrorContext::new())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
        }
    }

    /// Wrap a per-item failure so the caller learns which item aborted the run.
    pub fn scorer(index: usize, source: Error) -> Self {
        Error::Scorer {
            index,
            source: Box::new(source),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Input { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The innermost cause of a scorer failure, or `self` for every other kind.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Scorer { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True when nothing reached the network: the input itself was rejected.
    pub fn is_input(&self) -> bool {
        matches!(self, Error::Input { .. })
    }

    /// True when the failure came from the scoring service or the path to it.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::Transport(_) | Error::Remote { .. } | Error::MalformedResponse { .. }
        )
    }
}
