//! Test Helpers Module for JSON-RPC Runner Integration Tests
//!
//! Shared handlers and fixtures so every test file talks to the same method
//! table.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use turul_json_rpc_runner::{
    CallContext, HandlerResult, JsonRpcError, JsonRpcHandler, MethodMap, RequestParams,
    parse_params,
};

/// Sums an array of integers, `Invalid params` for anything else
pub fn accumulate(_: &CallContext, params: Option<&RequestParams>) -> HandlerResult {
    let values: Vec<i64> = parse_params(params).map_err(|_| JsonRpcError::INVALID_PARAMS)?;
    Ok(json!(values.iter().sum::<i64>()))
}

/// Handler that records the raw params of every call it receives
#[derive(Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl JsonRpcHandler for RecordingHandler {
    async fn handle(&self, _: &CallContext, params: Option<&RequestParams>) -> HandlerResult {
        self.calls
            .lock()
            .unwrap()
            .push(params.map(|p| p.get().to_string()));
        Ok(Value::Null)
    }
}

/// Sleeps for the requested number of milliseconds, then echoes it back
pub struct SleepHandler;

#[async_trait]
impl JsonRpcHandler for SleepHandler {
    async fn handle(&self, _: &CallContext, params: Option<&RequestParams>) -> HandlerResult {
        let millis: u64 = parse_params(params)?;
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(json!(millis))
    }
}

/// Authenticated caller, attached to a `CallContext` by the transport
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub name: String,
}

/// Answers with the caller's name, `Server error` when nobody signed in
pub fn whoami(context: &CallContext, _: Option<&RequestParams>) -> HandlerResult {
    context
        .extension::<Caller>()
        .map(|caller| json!(caller.name))
        .ok_or_else(|| JsonRpcError::SERVER.with_message("Unauthenticated"))
}

/// Method table used across the integration tests
pub fn methods() -> MethodMap {
    MethodMap::new()
        .with_fn("accumulate", accumulate)
        .with_fn("whoami", whoami)
        .with_fn("fail", |_, _| {
            Err(JsonRpcError::SERVER.with_data(json!({"reason": "backend offline"})))
        })
        .with_method("sleep", SleepHandler)
}
