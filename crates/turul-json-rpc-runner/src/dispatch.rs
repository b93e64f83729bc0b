//! Request decoding and dispatch

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::{
    config::DispatcherConfig,
    context::CallContext,
    error::{DecodeError, JsonRpcError},
    handler::MethodMap,
    request::{JsonRpcRequest, is_reserved_method},
    response::{JsonRpcReply, JsonRpcResponse},
    types::RequestId,
};

/// Decode a single request.
///
/// On failure the error keeps whatever id could still be read from the
/// payload.
pub fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, DecodeError> {
    serde_json::from_slice(body).map_err(|source| {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => DecodeError::Shape {
                id: RequestId::recover(&value),
                source,
            },
            Err(_) => DecodeError::Syntax(source),
        }
    })
}

/// Split a batch into its items without decoding them
pub fn parse_batch(
    body: &[u8],
    max_batch_size: Option<usize>,
) -> Result<Vec<Box<RawValue>>, DecodeError> {
    let items: Vec<Box<RawValue>> = serde_json::from_slice(body).map_err(DecodeError::Batch)?;
    match max_batch_size {
        Some(limit) if items.len() > limit => Err(DecodeError::BatchTooLarge {
            size: items.len(),
            limit,
        }),
        _ => Ok(items),
    }
}

/// True when the first significant byte opens a JSON array
pub fn is_batch(body: &[u8]) -> bool {
    body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[')
}

/// Response plus whether its request was a notification
struct Outcome {
    notification: bool,
    response: JsonRpcResponse,
}

/// JSON-RPC method dispatcher.
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent callers. Per-call state travels in a [`CallContext`]; the
/// entry points without one hand handlers an empty context.
#[derive(Debug)]
pub struct Dispatcher {
    methods: MethodMap,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(methods: MethodMap) -> Self {
        Self::with_config(methods, DispatcherConfig::default())
    }

    pub fn with_config(methods: MethodMap, config: DispatcherConfig) -> Self {
        for method in methods.names().filter(|name| is_reserved_method(name)) {
            warn!(
                "Method '{}' uses the reserved 'rpc.' prefix and will never be dispatched",
                method
            );
        }
        Self { methods, config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn methods(&self) -> &MethodMap {
        &self.methods
    }

    /// Handle one encoded request; always yields exactly one response
    pub async fn run(&self, body: &[u8]) -> JsonRpcResponse {
        self.run_with_context(&CallContext::default(), body).await
    }

    pub async fn run_with_context(&self, context: &CallContext, body: &[u8]) -> JsonRpcResponse {
        self.process(context, body).await.response
    }

    /// Handle an encoded batch.
    ///
    /// A body that is not an array yields a single `Invalid request`
    /// response with an empty id. Otherwise there is one response per item,
    /// at the item's position.
    pub async fn batch(&self, body: &[u8]) -> Vec<JsonRpcResponse> {
        self.batch_with_context(&CallContext::default(), body).await
    }

    /// Every item of the batch sees the same context
    pub async fn batch_with_context(
        &self,
        context: &CallContext,
        body: &[u8],
    ) -> Vec<JsonRpcResponse> {
        self.process_batch(context, body)
            .await
            .into_iter()
            .map(|outcome| outcome.response)
            .collect()
    }

    /// Handle whatever arrived on the wire, single or batch.
    ///
    /// `None` means nothing should be sent back, which only happens with
    /// notifications enabled and every request in the message being one.
    pub async fn handle_message(&self, body: &[u8]) -> Option<JsonRpcReply> {
        self.handle_message_with_context(&CallContext::default(), body)
            .await
    }

    pub async fn handle_message_with_context(
        &self,
        context: &CallContext,
        body: &[u8],
    ) -> Option<JsonRpcReply> {
        let suppress = self.config.notifications;

        if !is_batch(body) {
            let outcome = self.process(context, body).await;
            if suppress && outcome.notification {
                debug!("Notification handled, no response sent");
                return None;
            }
            return Some(JsonRpcReply::Single(outcome.response));
        }

        let outcomes = self.process_batch(context, body).await;
        let received = outcomes.len();
        let responses: Vec<JsonRpcResponse> = outcomes
            .into_iter()
            .filter(|outcome| !(suppress && outcome.notification))
            .map(|outcome| outcome.response)
            .collect();

        if received > 0 && responses.is_empty() {
            debug!("Batch of {} notifications handled, no response sent", received);
            return None;
        }
        Some(JsonRpcReply::Batch(responses))
    }

    /// Dispatch an already decoded request
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.dispatch_with_context(&CallContext::default(), request)
            .await
    }

    pub async fn dispatch_with_context(
        &self,
        context: &CallContext,
        request: JsonRpcRequest,
    ) -> JsonRpcResponse {
        let id = request.id().clone();

        if !request.version().is_supported() {
            debug!(
                "Rejecting request {} with protocol version '{}'",
                id,
                request.version()
            );
            return JsonRpcResponse::error(id, JsonRpcError::INVALID_REQUEST);
        }

        let handler = match self.methods.get(request.method()) {
            Some(handler) if !request.is_reserved() => handler,
            _ => {
                debug!("Method not found: {}", request.method());
                return JsonRpcResponse::error(id, JsonRpcError::NOT_FOUND);
            }
        };

        debug!("Dispatching {} (id: {})", request.method(), id);
        let invocation =
            AssertUnwindSafe(handler.handle(context, request.params())).catch_unwind();
        match invocation.await {
            Ok(Ok(result)) => JsonRpcResponse::success(id, result),
            Ok(Err(error)) if error.is_success() => JsonRpcResponse::success(id, Value::Null),
            Ok(Err(error)) => {
                debug!("Handler for {} failed: {}", request.method(), error);
                JsonRpcResponse::error(id, error)
            }
            Err(_) => {
                warn!("Handler for {} panicked", request.method());
                JsonRpcResponse::error(id, JsonRpcError::INTERNAL)
            }
        }
    }

    async fn process(&self, context: &CallContext, body: &[u8]) -> Outcome {
        match parse_request(body) {
            Ok(request) => {
                let notification = request.is_notification() && request.version().is_supported();
                Outcome {
                    notification,
                    response: self.dispatch_with_context(context, request).await,
                }
            }
            Err(err) => {
                debug!("Failed to decode request: {}", err);
                Outcome {
                    notification: false,
                    response: JsonRpcResponse::error(err.request_id(), err.to_error()),
                }
            }
        }
    }

    async fn process_batch(&self, context: &CallContext, body: &[u8]) -> Vec<Outcome> {
        let items = match parse_batch(body, self.config.max_batch_size) {
            Ok(items) => items,
            Err(err) => {
                debug!("Failed to decode batch: {}", err);
                return vec![Outcome {
                    notification: false,
                    response: JsonRpcResponse::error(RequestId::default(), err.to_error()),
                }];
            }
        };

        if self.config.concurrent_batches {
            let calls = items
                .iter()
                .map(|item| self.process(context, item.get().as_bytes()));
            return join_all(calls).await;
        }

        let mut outcomes = Vec::with_capacity(items.len());
        for item in &items {
            outcomes.push(self.process(context, item.get().as_bytes()).await);
        }
        outcomes
    }
}
