//! Most-frequent-answer baseline.
//!
//! Keeps a 64×9 count table over syllogism/response identifiers, fed by
//! every training phase and by adaptation, and predicts the most
//! frequent response for the queried syllogism (random tie-break).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::Map;

use cogbench_core::{Aux, CognitiveModel, Item, ModelFactory, ResponseType, Trial, Value};

use crate::syllogistic;

fn default_name() -> String {
    "MFA-Model".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct MfaConfig {
    #[serde(default = "default_name")]
    name: String,

    /// RNG seed for the tie-break.
    #[serde(default)]
    seed: u64,
}

/// Most-frequent-answer model over the syllogistic domain.
#[derive(Clone)]
pub struct MfaModel {
    name: String,
    domains: Vec<String>,
    response_types: Vec<ResponseType>,
    counts: [[u32; 9]; 64],
    rng: StdRng,
}

impl MfaModel {
    pub fn new(name: String, seed: u64) -> MfaModel {
        MfaModel {
            name,
            domains: vec!["syllogistic".to_string()],
            response_types: vec![ResponseType::SingleChoice],
            counts: [[0; 9]; 64],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observe(&mut self, item: &Item, response: &Value) -> anyhow::Result<()> {
        let task_id = syllogistic::encode_task(&item.task)?;
        let response_id = syllogistic::encode_response(response, &item.task)?;
        let task_idx = syllogistic::syllogism_index(&task_id)
            .ok_or_else(|| anyhow::anyhow!("unknown syllogism: {task_id}"))?;
        let response_idx = syllogistic::response_index(&response_id)
            .ok_or_else(|| anyhow::anyhow!("unknown response: {response_id}"))?;
        self.counts[task_idx][response_idx] += 1;
        Ok(())
    }

    fn observe_trials(&mut self, trials: &[Trial]) {
        for trial in trials {
            if let Some(response) = trial.target("response") {
                // Non-syllogistic rows are simply ignored during training.
                let _ = self.observe(&trial.item, response);
            }
        }
    }
}

impl CognitiveModel for MfaModel {
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

    fn pre_train(&mut self, dataset: &[&[Trial]]) {
        for trials in dataset {
            self.observe_trials(trials);
        }
    }

    fn pre_train_person(&mut self, trials: &[Trial]) {
        self.observe_trials(trials);
    }

    fn predict(&mut self, item: &Item, _aux: &Aux) -> anyhow::Result<Value> {
        let task_id = syllogistic::encode_task(&item.task)?;
        let task_idx = syllogistic::syllogism_index(&task_id)
            .ok_or_else(|| anyhow::anyhow!("unknown syllogism: {task_id}"))?;

        let weights = &self.counts[task_idx];
        let best = *weights.iter().max().expect("nine response counts");
        let candidates: Vec<usize> = (0..weights.len())
            .filter(|idx| weights[*idx] == best)
            .collect();
        let pick = candidates[self.rng.gen_range(0..candidates.len())];

        syllogistic::decode_response(syllogistic::RESPONSES[pick], &item.task)
    }

    fn adapt(&mut self, item: &Item, target: &Value, _aux: &Aux) -> anyhow::Result<()> {
        self.observe(item, target)
    }
}

/// Factory for the `mfa` plugin kind.
pub struct MfaFactory;

impl ModelFactory for MfaFactory {
    fn kind(&self) -> &str {
        "mfa"
    }

    fn create(
        &self,
        params: &Map<String, serde_json::Value>,
    ) -> anyhow::Result<Box<dyn CognitiveModel>> {
        let config: MfaConfig =
            serde_json::from_value(serde_json::Value::Object(params.clone()))?;
        Ok(Box::new(MfaModel::new(config.name, config.seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbench_core::{encode, parse_response};

    fn item(task: &str) -> Item {
        Item::new(
            "s1",
            "syllogistic",
            task,
            ResponseType::SingleChoice,
            "All;a;c|Some;a;c|NVC",
            1,
        )
    }

    #[test]
    fn test_adapt_then_predict_most_frequent() {
        let mut model = MfaModel::new("MFA".to_string(), 0);
        let item = item("All;a;b/All;b;c");
        let aac = parse_response("All;a;c", ResponseType::SingleChoice);

        for _ in 0..3 {
            model.adapt(&item, &aac, &Aux::new()).unwrap();
        }
        let nvc = parse_response("NVC", ResponseType::SingleChoice);
        model.adapt(&item, &nvc, &Aux::new()).unwrap();

        let prediction = model.predict(&item, &Aux::new()).unwrap();
        assert_eq!(encode(&prediction), "All;a;c");
    }

    #[test]
    fn test_counts_are_per_syllogism() {
        let mut model = MfaModel::new("MFA".to_string(), 0);
        let first = item("All;a;b/All;b;c");
        let aac = parse_response("All;a;c", ResponseType::SingleChoice);
        model.adapt(&first, &aac, &Aux::new()).unwrap();

        // A different figure keeps its own counts; with none recorded,
        // every response ties and the tie-break stays within the table.
        let other = item("All;b;a/All;b;c");
        let prediction = model.predict(&other, &Aux::new()).unwrap();
        let encoded = syllogistic::encode_response(&prediction, &other.task).unwrap();
        assert!(syllogistic::response_index(&encoded).is_some());
    }

    #[test]
    fn test_clone_carries_learned_counts() {
        let mut model = MfaModel::new("MFA".to_string(), 0);
        let item = item("All;a;b/All;b;c");
        let eca = parse_response("No;c;a", ResponseType::SingleChoice);
        for _ in 0..5 {
            model.adapt(&item, &eca, &Aux::new()).unwrap();
        }

        let mut copy = model.clone_model();
        let prediction = copy.predict(&item, &Aux::new()).unwrap();
        assert_eq!(encode(&prediction), "No;c;a");
    }
}
