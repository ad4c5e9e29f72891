//! Evaluation engine.
//!
//! Drives every configured model through the fixed protocol: resolve →
//! instantiate → applicability check → global pretrain → per-subject
//! (participant-start, leave-one-out pretrain, person background, person
//! training, item loop, participant-end) → teardown. Execution is
//! strictly sequential; per-subject isolation comes from evaluating each
//! subject on a fresh `clone_model()` copy.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::benchmark::{Benchmark, EvalType};
use crate::data::Trial;
use crate::domain::error::{BenchError, Result};
use crate::domain::item::ResponseType;
use crate::handler::EvaluationHandler;
use crate::loader::ModelLoader;
use crate::model::{CognitiveModel, ParticipantLog};
use crate::registry::ModelRegistry;
use crate::result::ResultTable;

/// Per-model, per-subject diagnostic logs collected from the
/// participant-end hook.
pub type ModelLog = BTreeMap<String, BTreeMap<String, ParticipantLog>>;

/// Outcome of one evaluation run.
#[derive(Debug)]
pub struct EvaluationRun {
    /// Joined result rows for all models and handlers.
    pub table: ResultTable,

    /// Diagnostic logs the models populated.
    pub model_log: ModelLog,
}

/// Main evaluation orchestrator.
pub struct Evaluator<'a> {
    benchmark: &'a Benchmark,
    registry: &'a ModelRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(benchmark: &'a Benchmark, registry: &'a ModelRegistry) -> Evaluator<'a> {
        Evaluator {
            benchmark,
            registry,
        }
    }

    /// Run the full evaluation loop over every configured model.
    pub fn evaluate(&self) -> Result<EvaluationRun> {
        let benchmark = self.benchmark;
        let loader = ModelLoader::new(self.registry);

        let mut handlers: Vec<EvaluationHandler> = benchmark
            .handlers
            .iter()
            .map(|spec| {
                EvaluationHandler::new(spec, &benchmark.task_encoders, &benchmark.response_encoders)
            })
            .collect();

        let mut model_log: ModelLog = BTreeMap::new();
        let mut used_names: BTreeSet<String> = BTreeSet::new();
        let total = benchmark.models.len();

        for (idx, model_info) in benchmark.models.iter().enumerate() {
            // Scoped plugin lifetime: the handle lives until this model's
            // last subject finished, and never overlaps the next model's.
            let handle = loader.resolve(&model_info.path, model_info.classname.as_deref())?;
            let mut pre_model = handle.instantiate(&model_info.args)?;

            let display_name = self.display_name(model_info, &handle, &*pre_model, &mut used_names);
            info!(
                model = %display_name,
                "evaluating model ({}/{})",
                idx + 1,
                total
            );

            self.check_applicability(&display_name, &*pre_model)?;

            // Global pretraining happens once per model. With
            // corresponding data the training pool contains the test
            // subjects themselves, so training moves into the
            // leave-one-out pass below.
            if let Some(train) = &benchmark.data_pre_train {
                if !benchmark.corresponding_data {
                    let population: Vec<&[Trial]> =
                        train.subjects().values().map(|t| t.as_slice()).collect();
                    pre_model.pre_train(&population);
                }
            }

            for (subject, trials) in benchmark.data_test.subjects() {
                let mut model = pre_model.clone_model();

                let demographics = benchmark.data_test.demographics(subject);
                model.start_participant(subject, &demographics);

                if benchmark.corresponding_data {
                    if let Some(train) = &benchmark.data_pre_train {
                        let others: Vec<&[Trial]> = train
                            .subjects()
                            .iter()
                            .filter(|(id, _)| id.as_str() != subject.as_str())
                            .map(|(_, t)| t.as_slice())
                            .collect();
                        if !others.is_empty() {
                            model.pre_train(&others);
                        }
                    }
                }

                if let Some(background) = &benchmark.data_pre_person_background {
                    if let Some(background_trials) = background.trials(subject) {
                        model.pre_person_background(background_trials);
                    }
                }

                // Coverage mode calibrates on the subject's own test data
                // before scoring it.
                match benchmark.eval_type {
                    EvalType::Coverage => model.pre_train_person(trials),
                    _ => {
                        if let Some(person) = &benchmark.data_pre_train_person {
                            if let Some(person_trials) = person.trials(subject) {
                                model.pre_train_person(person_trials);
                            }
                        }
                    }
                }

                for trial in trials {
                    let prediction = model
                        .predict(&trial.item, &trial.aux)
                        .map_err(BenchError::Model)?;

                    for handler in &mut handlers {
                        handler.record(&display_name, trial, &prediction)?;
                    }

                    if benchmark.eval_type.adapts() {
                        for handler in &handlers {
                            handler.adapt(&mut *model, trial)?;
                        }
                    }
                }

                let mut log = ParticipantLog::new();
                model.end_participant(subject, &mut log);
                if !log.is_empty() {
                    model_log
                        .entry(display_name.clone())
                        .or_default()
                        .insert(subject.clone(), log);
                }
            }

            drop(handle);
        }

        let mut table = ResultTable::new();
        for handler in handlers {
            let (column, rows) = handler.into_rows();
            table.insert(column, rows);
        }

        Ok(EvaluationRun { table, model_log })
    }

    /// Display name for the result table: override > manifest default >
    /// model self-report, made unique across the run by suffixing.
    fn display_name(
        &self,
        model_info: &crate::benchmark::ModelInfo,
        handle: &crate::loader::ModelHandle,
        model: &dyn CognitiveModel,
        used_names: &mut BTreeSet<String>,
    ) -> String {
        let base = model_info
            .override_name
            .clone()
            .or_else(|| handle.manifest().name.clone())
            .unwrap_or_else(|| model.name().to_string());

        let mut name = base.clone();
        let mut suffix = 2;
        while used_names.contains(&name) {
            name = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        if name != base {
            warn!(
                original = %base,
                renamed = %name,
                "duplicate model display name, suffixing"
            );
        }
        used_names.insert(name.clone());
        name
    }

    /// The model must declare support for every domain and response type
    /// present in the test data, before any per-subject work begins.
    fn check_applicability(&self, display_name: &str, model: &dyn CognitiveModel) -> Result<()> {
        let supported_domains: BTreeSet<&str> = model
            .supported_domains()
            .iter()
            .map(|d| d.as_str())
            .collect();
        let missing_domains: Vec<String> = self
            .benchmark
            .data_test
            .domains()
            .iter()
            .filter(|d| !supported_domains.contains(d.as_str()))
            .cloned()
            .collect();

        let supported_types: BTreeSet<ResponseType> =
            model.supported_response_types().iter().copied().collect();
        let missing_response_types: Vec<ResponseType> = self
            .benchmark
            .data_test
            .response_types()
            .iter()
            .filter(|rt| !supported_types.contains(rt))
            .copied()
            .collect();

        if missing_domains.is_empty() && missing_response_types.is_empty() {
            return Ok(());
        }
        Err(BenchError::Applicability {
            model: display_name.to_string(),
            missing_domains,
            missing_response_types,
        })
    }
}
