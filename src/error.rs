//! Unified error types for the runner.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    /// A required value was not provided by file, environment, or flags.
    Missing {
        /// Environment variable that supplies the value.
        env: &'static str,
        /// Human-readable name of the setting.
        what: &'static str,
    },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Missing { env, what } => {
                write!(f, "missing {what}: set {env} in the environment or config file")
            }
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the model HTTP API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status(u16, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

/// Errors from the tool catalog / authorization service.
#[derive(Debug)]
pub enum CatalogError {
    Http(reqwest::Error),
    Status(u16, String),
    /// The authorization finished without being granted.
    AuthorizationFailed { id: String, status: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::AuthorizationFailed { id, status } => {
                write!(f, "authorization {id} ended with status `{status}`")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ExecutionError
// ---------------------------------------------------------------------------

/// Faults raised by the agent execution collaborator during a cycle.
///
/// These are real failures, never suspensions.
#[derive(Debug)]
pub enum ExecutionError {
    Api(ApiError),
    Catalog(CatalogError),
    /// Model returned no choices in the response.
    EmptyResponse,
    /// A resume command did not line up with the pending suspensions.
    ResumeMismatch { expected: usize, received: usize },
    /// A resume command arrived while nothing was pending for the session.
    NothingToResume,
    /// The producer went away before the cycle finished.
    StreamClosed,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "api: {e}"),
            Self::Catalog(e) => write!(f, "tool catalog: {e}"),
            Self::EmptyResponse => write!(f, "model returned empty response"),
            Self::ResumeMismatch { expected, received } => write!(
                f,
                "resume carried {received} decision(s) but {expected} suspension(s) are pending"
            ),
            Self::NothingToResume => write!(f, "resume received with no pending suspensions"),
            Self::StreamClosed => write!(f, "execution stream closed unexpectedly"),
        }
    }
}

impl std::error::Error for ExecutionError {}

impl From<ApiError> for ExecutionError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

impl From<CatalogError> for ExecutionError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// FrontendError
// ---------------------------------------------------------------------------

/// Failures of the interactive front end (terminal I/O).
#[derive(Debug)]
pub enum FrontendError {
    Io(std::io::Error),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "terminal io: {e}"),
        }
    }
}

impl std::error::Error for FrontendError {}

impl From<std::io::Error> for FrontendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// TurnError — top-level for one turn
// ---------------------------------------------------------------------------

/// Reasons a single turn was abandoned.
#[derive(Debug)]
pub enum TurnError {
    /// The execution collaborator faulted; the session stays usable.
    Execution(ExecutionError),
    /// The front end failed while collecting a decision.
    Frontend(FrontendError),
    /// The configured decision-round cap was hit.
    RoundLimitExceeded { rounds: u32 },
}

impl TurnError {
    /// True when the failure is confined to the turn and the session may go on.
    pub fn is_turn_local(&self) -> bool {
        !matches!(self, Self::Frontend(_))
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execution(e) => write!(f, "execution: {e}"),
            Self::Frontend(e) => write!(f, "frontend: {e}"),
            Self::RoundLimitExceeded { rounds } => {
                write!(f, "turn abandoned after {rounds} suspension round(s)")
            }
        }
    }
}

impl std::error::Error for TurnError {}

impl From<ExecutionError> for TurnError {
    fn from(e: ExecutionError) -> Self {
        Self::Execution(e)
    }
}

impl From<FrontendError> for TurnError {
    fn from(e: FrontendError) -> Self {
        Self::Frontend(e)
    }
}
