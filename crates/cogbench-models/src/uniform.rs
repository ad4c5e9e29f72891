//! Uniform-random baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::Map;

use cogbench_core::{Aux, CognitiveModel, Item, ModelFactory, ResponseType, Value};

fn default_name() -> String {
    "UniformModel".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct UniformConfig {
    #[serde(default = "default_name")]
    name: String,

    /// RNG seed for reproducible runs.
    #[serde(default)]
    seed: u64,
}

/// Predicts a uniformly random option from the item's choices.
#[derive(Clone)]
pub struct UniformModel {
    name: String,
    domains: Vec<String>,
    response_types: Vec<ResponseType>,
    rng: StdRng,
}

impl UniformModel {
    pub fn new(name: String, seed: u64) -> UniformModel {
        UniformModel {
            name,
            domains: vec!["syllogistic".to_string()],
            response_types: vec![ResponseType::SingleChoice],
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CognitiveModel for UniformModel {
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

    fn predict(&mut self, item: &Item, _aux: &Aux) -> anyhow::Result<Value> {
        if item.choices.is_empty() {
            anyhow::bail!("item without choices: {}", item.task_str);
        }
        let pick = self.rng.gen_range(0..item.choices.len());
        Ok(item.choices[pick].clone())
    }
}

/// Factory for the `uniform` plugin kind.
pub struct UniformFactory;

impl ModelFactory for UniformFactory {
    fn kind(&self) -> &str {
        "uniform"
    }

    fn create(
        &self,
        params: &Map<String, serde_json::Value>,
    ) -> anyhow::Result<Box<dyn CognitiveModel>> {
        let config: UniformConfig =
            serde_json::from_value(serde_json::Value::Object(params.clone()))?;
        Ok(Box::new(UniformModel::new(config.name, config.seed)))
    }
}
