//! # JSON-RPC 2.0 Runner
//!
//! A transport-agnostic JSON-RPC 2.0 dispatcher. Bytes go in, structured
//! responses come out; moving the bytes is left to the caller.
//!
//! ## Features
//! - Single and batch entry points, plus one that detects which it got
//! - Fixed protocol error table, with handler errors passed through verbatim
//! - Handlers receive params as raw JSON and decode them themselves
//! - A per-call [`CallContext`] reaches every handler a message touches
//! - Optional notification semantics and concurrent batch execution
//!
//! ```rust
//! use serde_json::json;
//! use turul_json_rpc_runner::prelude::*;
//!
//! # async fn demo() {
//! let methods = MethodMap::new().with_fn("accumulate", |_context, params| {
//!     let values: Vec<i64> = parse_params(params)?;
//!     Ok(json!(values.iter().sum::<i64>()))
//! });
//! let dispatcher = Dispatcher::new(methods);
//!
//! let response = dispatcher
//!     .run(br#"{"jsonrpc":"2.0","id":"toto","method":"accumulate","params":[1,2,3,4,5]}"#)
//!     .await;
//! assert_eq!(response.into_result().unwrap(), json!(15));
//!
//! // Transports pass their per-call state along with the body
//! let context = CallContext::new().with_metadata("peer", "127.0.0.1");
//! let response = dispatcher
//!     .run_with_context(&context, br#"{"jsonrpc":"2.0","id":1,"method":"accumulate","params":[]}"#)
//!     .await;
//! assert_eq!(response.into_result().unwrap(), json!(0));
//! # }
//! ```

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod prelude;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use config::DispatcherConfig;
pub use context::CallContext;
pub use dispatch::Dispatcher;
pub use error::{DecodeError, JsonRpcError, JsonRpcErrorCode};
pub use handler::{AsyncFunctionHandler, FunctionHandler, HandlerResult, JsonRpcHandler, MethodMap};
pub use request::{JsonRpcRequest, RequestParams, parse_params};
pub use response::{JsonRpcReply, JsonRpcResponse, ResponseResult};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name prefix reserved for protocol extensions
pub const RESERVED_METHOD_PREFIX: &str = "rpc.";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const SERVER_ERROR: i32 = -32010;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i32 = -32099;
    pub const SERVER_ERROR_END: i32 = -32000;
}
