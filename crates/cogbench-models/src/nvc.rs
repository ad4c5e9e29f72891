//! Always-NVC baseline.

use serde::Deserialize;
use serde_json::Map;

use cogbench_core::{Aux, CognitiveModel, Item, ModelFactory, ResponseType, Value};

fn default_name() -> String {
    "NVC-Model".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct NvcConfig {
    #[serde(default = "default_name")]
    name: String,
}

/// Predicts "No Valid Conclusion" for every task.
#[derive(Clone)]
pub struct NvcModel {
    name: String,
    domains: Vec<String>,
    response_types: Vec<ResponseType>,
}

impl NvcModel {
    pub fn new(name: String) -> NvcModel {
        NvcModel {
            name,
            domains: vec!["syllogistic".to_string()],
            response_types: vec![ResponseType::SingleChoice],
        }
    }
}

impl CognitiveModel for NvcModel {
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
        Ok(Value::List(vec![Value::terms(&["NVC"])]))
    }
}

/// Factory for the `nvc` plugin kind.
pub struct NvcFactory;

impl ModelFactory for NvcFactory {
    fn kind(&self) -> &str {
        "nvc"
    }

    fn create(
        &self,
        params: &Map<String, serde_json::Value>,
    ) -> anyhow::Result<Box<dyn CognitiveModel>> {
        let config: NvcConfig =
            serde_json::from_value(serde_json::Value::Object(params.clone()))?;
        Ok(Box::new(NvcModel::new(config.name)))
    }
}
