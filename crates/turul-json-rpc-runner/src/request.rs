use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId, deserialize_request_id};

/// Parameters of a JSON-RPC request, kept as the undecoded JSON text.
///
/// Decoding is left to the handler that owns the method, which knows the
/// expected shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(Box<RawValue>);

impl RequestParams {
    /// Serialize `value` into a params payload
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(RequestParams)
    }

    /// Raw JSON text as received
    pub fn get(&self) -> &str {
        self.0.get()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.get().as_bytes()
    }

    /// Decode into `T`, reporting failure as `Invalid params` with the
    /// decoder message as `data`
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, JsonRpcError> {
        serde_json::from_str(self.get())
            .map_err(|e| JsonRpcError::INVALID_PARAMS.with_data(e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(self.get())
    }
}

impl PartialEq for RequestParams {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

/// Decode optional params, treating absence as `Invalid params`
pub fn parse_params<T: DeserializeOwned>(params: Option<&RequestParams>) -> Result<T, JsonRpcError> {
    params
        .ok_or_else(|| JsonRpcError::INVALID_PARAMS.with_data("missing params"))?
        .parse()
}

/// A JSON-RPC request.
///
/// Fields are read-only: a request either comes off the wire whole or is
/// built by one of the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc", default = "JsonRpcVersion::missing")]
    version: JsonRpcVersion,
    #[serde(
        default,
        skip_serializing_if = "RequestId::is_empty",
        deserialize_with = "deserialize_request_id"
    )]
    id: RequestId,
    method: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_params"
    )]
    params: Option<RequestParams>,
}

/// A present `"params": null` stays a raw `null`; only an absent field is `None`
fn deserialize_params<'de, D>(deserializer: D) -> Result<Option<RequestParams>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RequestParams::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// Build a request whose params are `params` serialized to JSON
    pub fn new<T: Serialize + ?Sized>(
        id: impl Into<RequestId>,
        method: impl Into<String>,
        params: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::with_params(
            id,
            method,
            Some(RequestParams::from_serialize(params)?),
        ))
    }

    pub fn with_params(
        id: impl Into<RequestId>,
        method: impl Into<String>,
        params: Option<RequestParams>,
    ) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self::with_params(id, method, None)
    }

    pub fn version(&self) -> &JsonRpcVersion {
        &self.version
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&RequestParams> {
        self.params.as_ref()
    }

    /// No id means the peer does not expect an answer
    pub fn is_notification(&self) -> bool {
        self.id.is_empty()
    }

    /// Methods under `rpc.` belong to the protocol itself
    pub fn is_reserved(&self) -> bool {
        is_reserved_method(&self.method)
    }
}

pub fn is_reserved_method(method: &str) -> bool {
    method.starts_with(crate::RESERVED_METHOD_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string, to_value};

    #[test]
    fn test_request_round_trip() {
        let request = JsonRpcRequest::new("toto", "accumulate", &[1, 2, 3, 4, 5]).unwrap();

        let json = to_string(&request).unwrap();
        let parsed: JsonRpcRequest = from_str(&json).unwrap();

        assert_eq!(parsed.id(), &RequestId::from("toto"));
        assert_eq!(parsed.method(), "accumulate");
        assert_eq!(parsed.params().unwrap().get(), "[1,2,3,4,5]");
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = JsonRpcRequest::new("tutu", "fizzbuzz", "ola").unwrap();
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"jsonrpc": "2.0", "id": "tutu", "method": "fizzbuzz", "params": "ola"})
        );

        let bare = JsonRpcRequest::new_no_params("", "ping");
        assert_eq!(
            to_value(&bare).unwrap(),
            json!({"jsonrpc": "2.0", "method": "ping"})
        );
    }

    #[test]
    fn test_missing_and_null_id() {
        let missing: JsonRpcRequest = from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
        assert!(missing.is_notification());

        let null: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(null.is_notification());
        assert_eq!(null.id(), &RequestId::default());
    }

    #[test]
    fn test_missing_version_is_unsupported() {
        let request: JsonRpcRequest = from_str(r#"{"id":"titi","method":"ping"}"#).unwrap();
        assert!(!request.version().is_supported());
        assert_eq!(request.id(), &RequestId::from("titi"));
    }

    #[test]
    fn test_params_kept_raw() {
        let request: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","id":"a","method":"m","params":{"b": [1, 2]}}"#).unwrap();
        assert_eq!(request.params().unwrap().get(), r#"{"b": [1, 2]}"#);
        assert_eq!(request.params().unwrap().to_value().unwrap(), json!({"b": [1, 2]}));
    }

    #[test]
    fn test_params_parse() {
        let params = RequestParams::from_serialize(&[1, 2, 3]).unwrap();
        let values: Vec<i64> = params.parse().unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let wrong = RequestParams::from_serialize("invalid parameter").unwrap();
        let error = wrong.parse::<Vec<i64>>().unwrap_err();
        assert_eq!(error.code, -32602);
        assert!(error.data.is_some());

        let absent = parse_params::<Vec<i64>>(None).unwrap_err();
        assert_eq!(absent.code, -32602);
    }

    #[test]
    fn test_null_params_are_present() {
        let request: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","id":"n","method":"m","params":null}"#).unwrap();
        let params = request.params().expect("explicit null is kept");
        assert_eq!(params.get(), "null");

        let optional: Option<Vec<i64>> = parse_params(request.params()).unwrap();
        assert_eq!(optional, None);
        let required = parse_params::<Vec<i64>>(request.params()).unwrap_err();
        assert_ne!(required.data, Some(json!("missing params")));

        let absent: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","id":"n","method":"m"}"#).unwrap();
        assert!(absent.params().is_none());
    }

    #[test]
    fn test_reserved_method() {
        assert!(JsonRpcRequest::new_no_params("1", "rpc.discover").is_reserved());
        assert!(!JsonRpcRequest::new_no_params("1", "rpcdiscover").is_reserved());
    }
}
