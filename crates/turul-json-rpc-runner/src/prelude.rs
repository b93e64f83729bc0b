//! # JSON-RPC Runner Prelude
//!
//! Convenient re-exports of the types most handlers and transports need.
//!
//! ```rust
//! use turul_json_rpc_runner::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::error::{JsonRpcError, JsonRpcErrorCode};
pub use crate::request::{JsonRpcRequest, RequestParams, parse_params};
pub use crate::response::{JsonRpcReply, JsonRpcResponse, ResponseResult};
pub use crate::types::{JsonRpcVersion, RequestId};

// Dispatch
pub use crate::config::DispatcherConfig;
pub use crate::context::CallContext;
pub use crate::dispatch::Dispatcher;
pub use crate::handler::{HandlerResult, JsonRpcHandler, MethodMap};

// Standard error codes
pub use crate::error_codes::*;
