//! Accumulator JSON-RPC Example
//!
//! Feeds a handful of raw payloads through a dispatcher with one method,
//! `accumulate`, and prints what would go back over the wire.
//!
//! Run with `RUST_LOG=debug` to see dispatch decisions.

use serde_json::json;
use tracing_subscriber::EnvFilter;
use turul_json_rpc_runner::prelude::*;

fn accumulate(_: &CallContext, params: Option<&RequestParams>) -> HandlerResult {
    let values: Vec<i64> = parse_params(params).map_err(|_| JsonRpcError::INVALID_PARAMS)?;
    Ok(json!(values.iter().sum::<i64>()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let methods = MethodMap::new()
        .with_fn("accumulate", accumulate)
        .with_fn("peer", |context, _| {
            Ok(context.get_metadata("peer").cloned().unwrap_or_default())
        })
        .with_async_fn("echo", |_, params: Option<RequestParams>| async move {
            match params {
                Some(params) => params.to_value().map_err(|_| JsonRpcError::INVALID_PARAMS),
                None => Ok(serde_json::Value::Null),
            }
        });
    let dispatcher = Dispatcher::with_config(methods, DispatcherConfig::new().notifications(true));

    // What a socket transport would record for the connection
    let context = CallContext::new().with_metadata("peer", "127.0.0.1:4000");

    let payloads: [&[u8]; 7] = [
        br#"{"jsonrpc":"2.0","id":"toto","method":"accumulate","params":[1,2,3,4,5]}"#,
        br#"{"jsonrpc":"2.0","id":"tutu","method":"fizzbuzz","params":"ola"}"#,
        br#"{"jsonrpc":"2.0","id":"tata","method":"accumulate","params":"invalid parameter"}"#,
        br#"{"jsonrpc":"1.0","id":"titi","method":"accumulate"}"#,
        br#"{"jsonrpc":"2.0","method":"echo","params":{"fire":"and forget"}}"#,
        br#"{"jsonrpc":"2.0","id":"who","method":"peer"}"#,
        br#"[{"jsonrpc":"2.0","id":"1","method":"echo","params":"a"},
            {"jsonrpc":"2.0","id":"2","method":"accumulate","params":[40,2]}]"#,
    ];

    for (i, payload) in payloads.iter().enumerate() {
        println!("\n--- Message {} ---", i + 1);
        println!("Request:  {}", String::from_utf8_lossy(payload));
        match dispatcher.handle_message_with_context(&context, payload).await {
            Some(reply) => println!("Response: {}", String::from_utf8(reply.to_vec()?)?),
            None => println!("Response: (none, notification)"),
        }
    }

    Ok(())
}
