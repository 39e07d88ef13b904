use std::fmt;

use comms::{
    RequestKind,
    specs::{DatasetSelection, ModelKind},
};

/// Tag attached to a failed request, separating backend value errors from
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTag {
    Generic,
    ValueError,
}

/// Rejected store edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The column is not a target candidate of the selected dataset.
    UnknownTarget {
        dataset: DatasetSelection,
        column: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTarget { dataset, column } => {
                write!(f, "'{column}' is not a target column of {dataset}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Rejected field edits.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The layer index points past the last slot.
    LayerOutOfRange(usize),
    /// The text entered in a numeric field is not a number.
    InvalidNumber(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerOutOfRange(idx) => write!(f, "layer index {idx} is out of range"),
            Self::InvalidNumber(text) => write!(f, "'{text}' is not a number"),
        }
    }
}

impl std::error::Error for BindingError {}

/// Reasons a request could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Another request is still in flight.
    Busy { pending: RequestKind },
    /// The request needs a target column and none is selected.
    MissingTarget(RequestKind),
    /// `confirm` was called without an open confirmation prompt.
    NothingToConfirm,
    /// The ticket does not belong to the pending request.
    StaleTicket(RequestKind),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy { pending } => write!(f, "a {pending} request is already pending"),
            Self::MissingTarget(kind) => write!(f, "{kind} requires a target column"),
            Self::NothingToConfirm => write!(f, "no request is awaiting confirmation"),
            Self::StaleTicket(kind) => write!(f, "no {kind} request is pending"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Failures while talking to the backend.
#[derive(Debug)]
pub enum TransportError {
    /// The HTTP exchange itself failed.
    Http(reqwest::Error),
    /// The backend answered with a non-success status.
    Status(u16),
    /// The body is not a response envelope.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http error: {e}"),
            Self::Status(code) => write!(f, "backend answered with status {code}"),
            Self::Decode(e) => write!(f, "invalid response envelope: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

/// Why a dispatched request ended in the error state.
#[derive(Debug)]
pub enum RequestError {
    /// The request never produced a usable envelope.
    Transport(TransportError),
    /// The envelope carried an unexpected kind.
    KindMismatch { expected: RequestKind, got: String },
    /// The envelope kind matched but its payload could not be decoded.
    Payload {
        kind: RequestKind,
        source: serde_json::Error,
    },
    /// The backend rejected the training configuration.
    ValueError { model: ModelKind },
    /// Dataset or target changed while the request was pending.
    Superseded { kind: RequestKind },
}

impl RequestError {
    pub fn tag(&self) -> ErrorTag {
        match self {
            Self::ValueError { .. } => ErrorTag::ValueError,
            _ => ErrorTag::Generic,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure: {e}"),
            Self::KindMismatch { expected, got } => {
                write!(f, "expected a {expected} response, got '{got}'")
            }
            Self::Payload { kind, source } => write!(f, "malformed {kind} payload: {source}"),
            Self::ValueError { model } => {
                write!(f, "the backend could not train {model} with these settings")
            }
            Self::Superseded { kind } => {
                write!(f, "{kind} response dropped, its dataset or target changed")
            }
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Payload { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TransportError> for RequestError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// All errors that can occur in the orchestrator.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before anything is sent.
    InvalidConfig(String),
    Store(StoreError),
    Binding(BindingError),
    Dispatch(DispatchError),
    Request(RequestError),
    /// The HTTP client could not be built.
    Transport(TransportError),
    /// An underlying I/O error not covered by the above variants.
    Io(std::io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::Binding(e) => write!(f, "binding error: {e}"),
            Self::Dispatch(e) => write!(f, "dispatch error: {e}"),
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Binding(e) => Some(e),
            Self::Dispatch(e) => Some(e),
            Self::Request(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<StoreError> for OrchestratorError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<BindingError> for OrchestratorError {
    fn from(e: BindingError) -> Self {
        Self::Binding(e)
    }
}

impl From<DispatchError> for OrchestratorError {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

impl From<RequestError> for OrchestratorError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

impl From<TransportError> for OrchestratorError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<std::io::Error> for OrchestratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
