use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// Outcome carried by a response: exactly one of `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseResult {
    #[serde(rename = "result")]
    Success(Value),
    #[serde(rename = "error")]
    Error(JsonRpcError),
}

impl ResponseResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseResult::Error(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResponseResult::Success(value) => Some(value),
            ResponseResult::Error(_) => None,
        }
    }
}

impl From<Result<Value, JsonRpcError>> for ResponseResult {
    fn from(result: Result<Value, JsonRpcError>) -> Self {
        match result {
            Ok(value) => ResponseResult::Success(value),
            Err(error) => ResponseResult::Error(error),
        }
    }
}

/// A JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    version: JsonRpcVersion,
    #[serde(default)]
    id: RequestId,
    #[serde(flatten)]
    result: ResponseResult,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: ResponseResult) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result,
        }
    }

    pub fn success(id: RequestId, result: Value) -> Self {
        Self::new(id, ResponseResult::Success(result))
    }

    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self::new(id, ResponseResult::Error(error))
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn result(&self) -> &ResponseResult {
        &self.result
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }

    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.result {
            ResponseResult::Error(error) => Some(error),
            ResponseResult::Success(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.result {
            ResponseResult::Success(value) => Ok(value),
            ResponseResult::Error(error) => Err(error),
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What goes back over the wire for one inbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
}

impl JsonRpcReply {
    pub fn responses(&self) -> &[JsonRpcResponse] {
        match self {
            JsonRpcReply::Single(response) => std::slice::from_ref(response),
            JsonRpcReply::Batch(responses) => responses,
        }
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string, to_value};

    #[test]
    fn test_success_wire_shape() {
        let response = JsonRpcResponse::success(RequestId::from("toto"), json!(15));
        assert_eq!(
            to_value(&response).unwrap(),
            json!({"jsonrpc": "2.0", "id": "toto", "result": 15})
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let response = JsonRpcResponse::error(RequestId::from("tutu"), JsonRpcError::NOT_FOUND);
        assert_eq!(
            to_value(&response).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": "tutu",
                "error": {"code": -32601, "message": "Method not found"}
            })
        );
    }

    #[test]
    fn test_empty_id_is_emitted() {
        let response = JsonRpcResponse::error(RequestId::default(), JsonRpcError::INVALID_REQUEST);
        let value = to_value(&response).unwrap();
        assert_eq!(value["id"], json!(""));
    }

    #[test]
    fn test_null_result_is_kept() {
        let response = JsonRpcResponse::success(RequestId::Number(1), Value::Null);
        let json_str = to_string(&response).unwrap();
        assert!(json_str.contains(r#""result":null"#));
    }

    #[test]
    fn test_response_deserialization() {
        let parsed: JsonRpcResponse =
            from_str(r#"{"jsonrpc":"2.0","id":"a","error":{"code":-32602,"message":"Invalid params"}}"#)
                .unwrap();
        assert_eq!(parsed.error_object(), Some(&JsonRpcError::INVALID_PARAMS));
        assert_eq!(parsed.into_result().unwrap_err().code, -32602);
    }

    #[test]
    fn test_reply_encoding() {
        let single = JsonRpcReply::Single(JsonRpcResponse::success(RequestId::from("a"), json!(1)));
        assert_eq!(single.responses().len(), 1);

        let batch = JsonRpcReply::Batch(vec![
            JsonRpcResponse::success(RequestId::from("a"), json!(1)),
            JsonRpcResponse::error(RequestId::from("b"), JsonRpcError::NOT_FOUND),
        ]);
        let bytes = batch.to_vec().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["error"]["code"], json!(-32601));
    }
}
