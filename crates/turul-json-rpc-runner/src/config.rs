//! Dispatcher configuration

/// Configuration for a [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Drop responses to id-less requests in `handle_message`.
    /// Off by default: every request gets an answer.
    pub notifications: bool,
    /// Run the items of a batch concurrently instead of one after another.
    /// Responses keep the input order either way.
    pub concurrent_batches: bool,
    /// Largest batch accepted; larger ones are rejected as a whole
    pub max_batch_size: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            notifications: false,
            concurrent_batches: false,
            max_batch_size: None,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable notification semantics
    pub fn notifications(mut self, enable: bool) -> Self {
        self.notifications = enable;
        self
    }

    /// Enable or disable concurrent batch execution
    pub fn concurrent_batches(mut self, enable: bool) -> Self {
        self.concurrent_batches = enable;
        self
    }

    /// Set the maximum number of requests per batch
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_always_respond() {
        let config = DispatcherConfig::default();
        assert!(!config.notifications);
        assert!(!config.concurrent_batches);
        assert_eq!(config.max_batch_size, None);
    }

    #[test]
    fn test_builder_methods() {
        let config = DispatcherConfig::new()
            .notifications(true)
            .concurrent_batches(true)
            .max_batch_size(16);
        assert!(config.notifications);
        assert!(config.concurrent_batches);
        assert_eq!(config.max_batch_size, Some(16));
    }
}
