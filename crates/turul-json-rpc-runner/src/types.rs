use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a JSON-RPC request.
///
/// Strings are the normal form. Integers are accepted and echoed back as
/// integers. The empty string stands for "no identifier": it is what an
/// absent or `null` id decodes to, and what error responses carry when the
/// id could not be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
}

impl Default for RequestId {
    fn default() -> Self {
        RequestId::String(String::new())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl RequestId {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestId::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestId::String(s) if s.is_empty())
    }

    /// Best-effort id extraction from a request that failed to decode
    pub(crate) fn recover(value: &serde_json::Value) -> Self {
        match value.get("id") {
            Some(serde_json::Value::String(s)) => RequestId::String(s.clone()),
            Some(serde_json::Value::Number(n)) => {
                n.as_i64().map(RequestId::Number).unwrap_or_default()
            }
            _ => RequestId::default(),
        }
    }
}

/// Treats `"id": null` like a missing id
pub(crate) fn deserialize_request_id<'de, D>(deserializer: D) -> Result<RequestId, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RequestId>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// JSON-RPC version tag.
///
/// Decoding never fails on a string: anything but `"2.0"` is kept as
/// `Unsupported` so the request's id survives and the dispatcher can reject
/// it with `Invalid request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonRpcVersion {
    V2_0,
    Unsupported(String),
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &str {
        match self {
            JsonRpcVersion::V2_0 => crate::JSONRPC_VERSION,
            JsonRpcVersion::Unsupported(s) => s,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, JsonRpcVersion::V2_0)
    }

    /// Value used when the `jsonrpc` member is absent
    pub(crate) fn missing() -> Self {
        JsonRpcVersion::Unsupported(String::new())
    }
}

impl Default for JsonRpcVersion {
    fn default() -> Self {
        JsonRpcVersion::V2_0
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            crate::JSONRPC_VERSION => JsonRpcVersion::V2_0,
            _ => JsonRpcVersion::Unsupported(s),
        })
    }
}
