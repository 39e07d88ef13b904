use serde::{Deserialize, Serialize};

use crate::specs::DatasetSelection;

/// Suffix the backend appends to a response kind when the training run
/// produced values it could not encode.
pub const VALUE_ERROR_SUFFIX: &str = " ValueError";

wire_enum! {
    /// The four request kinds the backend understands.
    pub enum RequestKind {
        Import => "Import",
        Preprocess => "Preproc",
        Optimize => "Optimize",
        Train => "Learning",
    }
}

/// A single positional argument of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The outbound message. Field order is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub req: RequestKind,
    #[serde(rename = "selectData")]
    pub select_data: DatasetSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<Vec<Arg>>,
}

impl Request {
    /// Creates a request without positional arguments.
    pub fn new(req: RequestKind, select_data: DatasetSelection) -> Self {
        Self {
            req,
            select_data,
            arg: None,
        }
    }

    /// Creates a request carrying the given positional arguments.
    pub fn with_args(req: RequestKind, select_data: DatasetSelection, arg: Vec<Arg>) -> Self {
        Self {
            req,
            select_data,
            arg: Some(arg),
        }
    }
}

/// The inbound envelope. `arg` is left undecoded until the kind is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub res: String,
    #[serde(default)]
    pub arg: serde_json::Value,
}

/// How a response relates to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The response carries the payload of the expected kind.
    Accepted,
    /// The backend reported an invalid training configuration.
    ValueError,
    /// The response kind is neither the expected one nor a known error.
    Mismatch,
}

impl Response {
    /// Classifies this response against the kind that was requested.
    ///
    /// # Arguments
    /// * `expected` - The kind of the request that was sent.
    ///
    /// # Returns
    /// The verdict for this response.
    pub fn verdict(&self, expected: RequestKind) -> Verdict {
        if self.res == expected.as_str() {
            return Verdict::Accepted;
        }

        match self.res.strip_suffix(VALUE_ERROR_SUFFIX) {
            Some(kind) if kind == RequestKind::Train.as_str() => Verdict::ValueError,
            _ => Verdict::Mismatch,
        }
    }
}
