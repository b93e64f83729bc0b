use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{context::CallContext, error::JsonRpcError, request::RequestParams};

/// What a handler hands back: a result value, or the error to report.
///
/// An `Err` whose code is 0 still counts as success.
pub type HandlerResult = Result<Value, JsonRpcError>;

/// Trait for handling JSON-RPC method calls
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// Run the method with the caller's context and its raw params.
    ///
    /// Failures are classified by the handler itself, typically
    /// `JsonRpcError::INVALID_PARAMS` when the params do not decode.
    async fn handle(&self, context: &CallContext, params: Option<&RequestParams>)
    -> HandlerResult;
}

/// A handler backed by a plain closure
pub struct FunctionHandler<F> {
    handler_fn: F,
}

impl<F> FunctionHandler<F>
where
    F: Fn(&CallContext, Option<&RequestParams>) -> HandlerResult + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> JsonRpcHandler for FunctionHandler<F>
where
    F: Fn(&CallContext, Option<&RequestParams>) -> HandlerResult + Send + Sync,
{
    async fn handle(
        &self,
        context: &CallContext,
        params: Option<&RequestParams>,
    ) -> HandlerResult {
        (self.handler_fn)(context, params)
    }
}

/// A handler backed by a closure returning a future.
///
/// The closure receives its own copy of the context and params so the
/// future can be `'static`.
pub struct AsyncFunctionHandler<F, Fut> {
    handler_fn: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFunctionHandler<F, Fut>
where
    F: Fn(CallContext, Option<RequestParams>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    pub fn new(handler_fn: F) -> Self {
        Self {
            handler_fn,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> JsonRpcHandler for AsyncFunctionHandler<F, Fut>
where
    F: Fn(CallContext, Option<RequestParams>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(
        &self,
        context: &CallContext,
        params: Option<&RequestParams>,
    ) -> HandlerResult {
        (self.handler_fn)(context.clone(), params.cloned()).await
    }
}

/// Method name to handler table.
///
/// Filled in before the dispatcher is built; the dispatcher only reads it.
#[derive(Clone, Default)]
pub struct MethodMap {
    methods: HashMap<String, Arc<dyn JsonRpcHandler>>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaced
    pub fn insert<H>(
        &mut self,
        method: impl Into<String>,
        handler: H,
    ) -> Option<Arc<dyn JsonRpcHandler>>
    where
        H: JsonRpcHandler + 'static,
    {
        self.methods.insert(method.into(), Arc::new(handler))
    }

    pub fn with_method<H>(mut self, method: impl Into<String>, handler: H) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        self.insert(method, handler);
        self
    }

    pub fn with_fn<F>(self, method: impl Into<String>, handler_fn: F) -> Self
    where
        F: Fn(&CallContext, Option<&RequestParams>) -> HandlerResult + Send + Sync + 'static,
    {
        self.with_method(method, FunctionHandler::new(handler_fn))
    }

    pub fn with_async_fn<F, Fut>(self, method: impl Into<String>, handler_fn: F) -> Self
    where
        F: Fn(CallContext, Option<RequestParams>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_method(method, AsyncFunctionHandler::new(handler_fn))
    }

    pub fn get(&self, method: &str) -> Option<&Arc<dyn JsonRpcHandler>> {
        self.methods.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered method names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for MethodMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
