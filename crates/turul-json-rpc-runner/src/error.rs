use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::RequestId;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    Parse,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Internal,
    Server,
}

impl JsonRpcErrorCode {
    pub const fn code(&self) -> i32 {
        match self {
            JsonRpcErrorCode::Parse => -32700,
            JsonRpcErrorCode::InvalidRequest => -32600,
            JsonRpcErrorCode::MethodNotFound => -32601,
            JsonRpcErrorCode::InvalidParams => -32602,
            JsonRpcErrorCode::Internal => -32603,
            JsonRpcErrorCode::Server => -32010,
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::Parse => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::Internal => "Internal error",
            JsonRpcErrorCode::Server => "Server error",
        }
    }

    /// Classify a numeric code, `None` for codes outside the table
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(JsonRpcErrorCode::Parse),
            -32600 => Some(JsonRpcErrorCode::InvalidRequest),
            -32601 => Some(JsonRpcErrorCode::MethodNotFound),
            -32602 => Some(JsonRpcErrorCode::InvalidParams),
            -32603 => Some(JsonRpcErrorCode::Internal),
            -32010 => Some(JsonRpcErrorCode::Server),
            _ => None,
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC error object.
///
/// The associated constants are the protocol's error table. They are plain
/// values: attaching `data` or a different message produces a new error and
/// leaves the table untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct JsonRpcError {
    pub code: i32,
    pub message: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const PARSE: JsonRpcError = JsonRpcError::from_code(JsonRpcErrorCode::Parse);
    pub const INVALID_REQUEST: JsonRpcError =
        JsonRpcError::from_code(JsonRpcErrorCode::InvalidRequest);
    pub const NOT_FOUND: JsonRpcError = JsonRpcError::from_code(JsonRpcErrorCode::MethodNotFound);
    pub const INVALID_PARAMS: JsonRpcError =
        JsonRpcError::from_code(JsonRpcErrorCode::InvalidParams);
    pub const INTERNAL: JsonRpcError = JsonRpcError::from_code(JsonRpcErrorCode::Internal);
    pub const SERVER: JsonRpcError = JsonRpcError::from_code(JsonRpcErrorCode::Server);

    /// Code reserved for "no error"
    pub const SUCCESS_CODE: i32 = 0;

    pub const fn from_code(code: JsonRpcErrorCode) -> Self {
        Self {
            code: code.code(),
            message: Cow::Borrowed(code.message()),
            data: None,
        }
    }

    pub fn new(code: i32, message: impl Into<Cow<'static, str>>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Build an implementation-defined server error.
    ///
    /// Returns `None` when `code` falls outside -32099..=-32000.
    pub fn server(code: i32, message: impl Into<Cow<'static, str>>) -> Option<Self> {
        (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
            .contains(&code)
            .then(|| Self::new(code, message, None))
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// A code of 0 marks success, whatever the message or data say
    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }

    pub fn kind(&self) -> Option<JsonRpcErrorCode> {
        JsonRpcErrorCode::from_code(self.code)
    }
}

impl From<JsonRpcErrorCode> for JsonRpcError {
    fn from(code: JsonRpcErrorCode) -> Self {
        Self::from_code(code)
    }
}

/// Reasons wire bytes could not be turned into requests.
///
/// All of these surface to the peer as `Invalid request`; the variant only
/// matters for logging.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("not a valid request object: {source}")]
    Shape {
        id: RequestId,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch is not a JSON array: {0}")]
    Batch(#[source] serde_json::Error),

    #[error("batch of {size} requests exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },
}

impl DecodeError {
    /// Identifier recovered before decoding failed, empty when none was
    pub fn request_id(&self) -> RequestId {
        match self {
            DecodeError::Shape { id, .. } => id.clone(),
            _ => RequestId::default(),
        }
    }

    pub fn to_error(&self) -> JsonRpcError {
        match self {
            DecodeError::BatchTooLarge { limit, .. } => {
                JsonRpcError::INVALID_REQUEST.with_data(serde_json::json!({ "maxBatchSize": limit }))
            }
            _ => JsonRpcError::INVALID_REQUEST,
        }
    }
}
