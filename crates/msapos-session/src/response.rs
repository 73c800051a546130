#![forbid(unsafe_code)]

//! Responses coming back across the POS API boundary.
//!
//! The payload shape of a successful call belongs to the POS application and
//! is kept as an opaque JSON value; the session only ever reads `tranId` out
//! of it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload key holding the transaction ID of a transaction response.
pub const TRAN_ID_KEY: &str = "tranId";

/// Typed failure reported by the POS application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosFailure {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl PosFailure {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PosFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PosFailure {}

/// Outcome of one POS call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum PosResponse {
    /// The call succeeded with an application-defined payload.
    Success { data: Value },
    /// The call failed.
    Failed { error: PosFailure },
}

impl PosResponse {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    #[must_use]
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            error: PosFailure::new(code, message),
        }
    }

    /// Variant name, logged ahead of the body.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Success",
            Self::Failed { .. } => "Failed",
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Success payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    /// Transaction ID of a successful transaction response.
    #[must_use]
    pub fn tran_id(&self) -> Option<&str> {
        self.data()?.get(TRAN_ID_KEY)?.as_str()
    }

    /// Indented JSON rendering for the message log.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert into a `Result`, keeping the payload or the failure.
    pub fn into_result(self) -> Result<Value, PosFailure> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failed { error } => Err(error),
        }
    }
}
