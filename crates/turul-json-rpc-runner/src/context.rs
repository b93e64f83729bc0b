//! Caller-supplied state handed to every handler

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Per-call context.
///
/// Built by the transport for each inbound message (the authenticated
/// principal, the HTTP request, a database handle) and passed unchanged to
/// every handler the message reaches, batch items included. Cloning is
/// cheap for extensions, which are reference counted.
#[derive(Clone, Default)]
pub struct CallContext {
    /// Free-form metadata, e.g. a peer address or a trace id
    pub metadata: HashMap<String, Value>,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Attach a typed value; one value per type, later ones replace earlier
    pub fn with_extension<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.extensions.insert(TypeId::of::<T>(), Arc::new(value));
        self
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("metadata", &self.metadata)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
