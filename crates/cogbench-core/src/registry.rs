//! Explicit model factory registry.
//!
//! The registry is caller-owned and passed to the loader and engine; no
//! ambient global table is consulted or patched. Registering the same
//! kind twice replaces the earlier factory.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::ModelFactory;

/// Registry of model factories keyed by kind.
#[derive(Default, Clone)]
pub struct ModelRegistry {
    factories: BTreeMap<String, Arc<dyn ModelFactory>>,
}

impl ModelRegistry {
    pub fn new() -> ModelRegistry {
        ModelRegistry::default()
    }

    /// Register a factory under its kind.
    pub fn register(&mut self, factory: Arc<dyn ModelFactory>) {
        self.factories.insert(factory.kind().to_string(), factory);
    }

    /// Look up a factory by kind.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn ModelFactory>> {
        self.factories.get(kind).cloned()
    }

    /// Whether a factory is registered for the kind.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{Item, ResponseType};
    use crate::domain::value::Value;
    use crate::model::{Aux, CognitiveModel};

    #[derive(Clone)]
    struct StaticModel {
        name: String,
        domains: Vec<String>,
        response_types: Vec<ResponseType>,
    }

    impl CognitiveModel for StaticModel {
        fn name(&self) -> &str {
            &self.name
        }
        fn supported_domains(&self) -> &[String] {
            &self.domains
        }
        fn supported_response_types(&self) -> &[ResponseType] {
            &self.response_types
        }
        fn clone_model(&self) -> Box<dyn CognitiveModel> {
            Box::new(self.clone())
        }
        fn predict(&mut self, _item: &Item, _aux: &Aux) -> anyhow::Result<Value> {
            Ok(Value::terms(&["NVC"]))
        }
    }

    struct StaticFactory;

    impl ModelFactory for StaticFactory {
        fn kind(&self) -> &str {
            "static"
        }
        fn create(
            &self,
            _params: &serde_json::Map<String, serde_json::Value>,
        ) -> anyhow::Result<Box<dyn CognitiveModel>> {
            Ok(Box::new(StaticModel {
                name: "Static".to_string(),
                domains: vec!["syllogistic".to_string()],
                response_types: vec![ResponseType::SingleChoice],
            }))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ModelRegistry::new();
        assert!(!registry.contains("static"));

        registry.register(Arc::new(StaticFactory));
        assert!(registry.contains("static"));
        assert_eq!(registry.kinds(), ["static"]);

        let factory = registry.get("static").expect("factory");
        let model = factory.create(&serde_json::Map::new()).expect("create");
        assert_eq!(model.name(), "Static");
    }
}
