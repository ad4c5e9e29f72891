//! Domain-specific task/response encoders.
//!
//! Encoders canonicalize tasks and responses into compact labels for the
//! diagnostic columns of the result table. They are never used for
//! scoring.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::codec::encode;
use crate::domain::value::Value;

/// Canonicalizes a task into a compact domain-specific label.
pub trait TaskEncoder: Send + Sync {
    /// Stable display name.
    fn name(&self) -> &str;

    /// Encode a task in nested value representation.
    fn encode_task(&self, task: &Value) -> anyhow::Result<String>;
}

/// Canonicalizes a response into a compact domain-specific label. The
/// task is provided for encoders whose labels depend on term order.
pub trait ResponseEncoder: Send + Sync {
    /// Stable display name.
    fn name(&self) -> &str;

    /// Encode a response in nested value representation.
    fn encode_response(&self, response: &Value, task: &Value) -> anyhow::Result<String>;
}

/// Returns the response's tuple-string form unchanged. Useful when raw
/// values such as reaction times should appear in the results.
pub struct IdentityResponseEncoder;

impl ResponseEncoder for IdentityResponseEncoder {
    fn name(&self) -> &str {
        "Identity"
    }

    fn encode_response(&self, response: &Value, _task: &Value) -> anyhow::Result<String> {
        Ok(encode(response))
    }
}

/// Registry of task and response encoders keyed by their benchmark-spec
/// key. Caller-owned, like the model registry.
#[derive(Default, Clone)]
pub struct EncoderRegistry {
    task_encoders: BTreeMap<String, Arc<dyn TaskEncoder>>,
    response_encoders: BTreeMap<String, Arc<dyn ResponseEncoder>>,
}

impl EncoderRegistry {
    pub fn new() -> EncoderRegistry {
        EncoderRegistry::default()
    }

    /// Registry pre-populated with the `identity` response encoder.
    pub fn with_builtins() -> EncoderRegistry {
        let mut registry = EncoderRegistry::new();
        registry.register_response("identity", Arc::new(IdentityResponseEncoder));
        registry
    }

    pub fn register_task(&mut self, key: &str, encoder: Arc<dyn TaskEncoder>) {
        self.task_encoders.insert(key.to_string(), encoder);
    }

    pub fn register_response(&mut self, key: &str, encoder: Arc<dyn ResponseEncoder>) {
        self.response_encoders.insert(key.to_string(), encoder);
    }

    pub fn task(&self, key: &str) -> Option<Arc<dyn TaskEncoder>> {
        self.task_encoders.get(key).cloned()
    }

    pub fn response(&self, key: &str) -> Option<Arc<dyn ResponseEncoder>> {
        self.response_encoders.get(key).cloned()
    }

    pub fn contains_task(&self, key: &str) -> bool {
        self.task_encoders.contains_key(key)
    }

    pub fn contains_response(&self, key: &str) -> bool {
        self.response_encoders.contains_key(key)
    }
}
