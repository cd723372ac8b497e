//! Error types surfaced by the resolution engine

use thiserror::Error;

/// Errors returned to callers of the resolution engine.
///
/// Per-attempt failures inside the poll loop are reported as [`AttemptError`]
/// and only converted into an `AutomationError` once the deadline has passed.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The UI hierarchy dump could not be parsed
    #[error("Failed to parse UI hierarchy: {0}")]
    Parse(String),

    /// An anchor matched but no candidate satisfied the relative constraint
    #[error("Element not found: {selector} ({detail}) after {timeout_ms}ms")]
    ElementNotFound {
        selector: String,
        detail: String,
        timeout_ms: u64,
    },

    /// The anchor of a relative selector never appeared
    #[error("Anchor element not found: {anchor} (while resolving {selector}) after {timeout_ms}ms")]
    AnchorNotFound {
        anchor: String,
        selector: String,
        timeout_ms: u64,
    },

    /// The selector itself is unusable; never retried
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Nothing more specific than "no match" was ever observed
    #[error("Element not found: {selector} within {timeout_ms}ms")]
    Timeout { selector: String, timeout_ms: u64 },

    /// Transport or server-side failure talking to the automation server
    #[error("Automation server error: {0}")]
    Server(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The deadline passed while the hierarchy could not be fetched or parsed
    #[error("Element not found: {selector} within {timeout_ms}ms ({cause})")]
    Unresolved {
        selector: String,
        timeout_ms: u64,
        #[source]
        cause: AttemptError,
    },
}

impl AutomationError {
    /// Whether the poll loop may keep retrying after this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidSelector(_) | Self::Config(_))
    }
}

/// Outcome of a single failed resolution attempt.
///
/// Everything except [`AttemptError::NoMatch`] is "distinguishing": the
/// scheduler remembers the most recent one and reports it on timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("no element matched")]
    NoMatch,

    #[error("no element {relation} {anchor}")]
    NoCandidates { relation: String, anchor: String },

    #[error("anchor not found: {anchor}")]
    AnchorMissing { anchor: String },

    #[error("hierarchy parse failed: {0}")]
    Parse(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("{0}")]
    Invalid(String),
}

impl AttemptError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }

    pub fn is_distinguishing(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }

    /// Turn the last observed attempt failure into the caller-facing error.
    pub fn into_automation_error(self, selector: &str, timeout_ms: u64) -> AutomationError {
        match self {
            Self::NoMatch => AutomationError::Timeout {
                selector: selector.to_string(),
                timeout_ms,
            },
            Self::NoCandidates { relation, anchor } => AutomationError::ElementNotFound {
                selector: selector.to_string(),
                detail: format!("nothing {relation} {anchor}"),
                timeout_ms,
            },
            Self::AnchorMissing { anchor } => AutomationError::AnchorNotFound {
                anchor,
                selector: selector.to_string(),
                timeout_ms,
            },
            Self::Invalid(msg) => AutomationError::InvalidSelector(msg),
            cause @ (Self::Parse(_) | Self::Server(_)) => AutomationError::Unresolved {
                selector: selector.to_string(),
                timeout_ms,
                cause,
            },
        }
    }
}

impl From<AutomationError> for AttemptError {
    fn from(err: AutomationError) -> Self {
        match err {
            AutomationError::Parse(msg) => Self::Parse(msg),
            AutomationError::Server(msg) => Self::Server(msg),
            AutomationError::InvalidSelector(msg) | AutomationError::Config(msg) => {
                Self::Invalid(msg)
            }
            AutomationError::AnchorNotFound { anchor, .. } => Self::AnchorMissing { anchor },
            AutomationError::ElementNotFound { .. } | AutomationError::Timeout { .. } => {
                Self::NoMatch
            }
            AutomationError::Unresolved { cause, .. } => cause,
        }
    }
}
