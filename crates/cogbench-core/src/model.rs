//! Cognitive model capability contract.
//!
//! External model code implements [`CognitiveModel`] and registers a
//! [`ModelFactory`] for it. The factory deserializes its own typed
//! configuration from the plugin parameters, so every model carries named
//! options with explicit defaults instead of an untyped argument bag.

use serde_json::Map;

use crate::data::{Demographics, Trial};
use crate::domain::item::{Item, ResponseType};
use crate::domain::value::Value;

/// Auxiliary per-trial information (non-required dataset columns).
pub type Aux = Map<String, serde_json::Value>;

/// Mutable per-participant log a model may populate for diagnostics.
pub type ParticipantLog = Map<String, serde_json::Value>;

/// A cognitive model under evaluation.
///
/// `predict` is the only required operation. The training hooks default to
/// no-ops, mirroring models that ignore the optional training phases.
/// `clone_model` defines the model's value semantics for per-subject
/// isolation: the engine evaluates every subject on a fresh clone, so one
/// subject's adaptation can never leak into another's predictions.
pub trait CognitiveModel {
    /// Model display name used in result tables.
    fn name(&self) -> &str;

    /// Domains the model can produce predictions for.
    fn supported_domains(&self) -> &[String];

    /// Response types the model can produce predictions for.
    fn supported_response_types(&self) -> &[ResponseType];

    /// Produce an independent copy carrying the current trained state.
    fn clone_model(&self) -> Box<dyn CognitiveModel>;

    /// Generate a response prediction for the given task.
    fn predict(&mut self, item: &Item, aux: &Aux) -> anyhow::Result<Value>;

    /// Observe the participant's true response for a task.
    fn adapt(&mut self, _item: &Item, _target: &Value, _aux: &Aux) -> anyhow::Result<()> {
        Ok(())
    }

    /// Train on the general population before any subject runs.
    fn pre_train(&mut self, _dataset: &[&[Trial]]) {}

    /// Train on same-domain prior responses of the upcoming subject.
    fn pre_train_person(&mut self, _trials: &[Trial]) {}

    /// Train on domain-unrelated background data about the upcoming subject.
    fn pre_person_background(&mut self, _trials: &[Trial]) {}

    /// Called when a new participant's session begins.
    fn start_participant(&mut self, _id: &str, _demographics: &Demographics) {}

    /// Called after a participant's last item; `log` entries end up in the
    /// run artifact.
    fn end_participant(&mut self, _id: &str, _log: &mut ParticipantLog) {}
}

impl std::fmt::Debug for dyn CognitiveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitiveModel")
            .field("name", &self.name())
            .field("supported_domains", &self.supported_domains())
            .field("supported_response_types", &self.supported_response_types())
            .finish_non_exhaustive()
    }
}

/// Factory producing model instances from plugin parameters.
///
/// Implementations deserialize `params` into their own typed
/// configuration; construction failures propagate unchanged to the
/// caller, which surfaces them as instantiation errors.
pub trait ModelFactory: Send + Sync {
    /// Registry key this factory is addressed by.
    fn kind(&self) -> &str;

    /// Build a model instance from the merged plugin parameters.
    fn create(&self, params: &Map<String, serde_json::Value>)
        -> anyhow::Result<Box<dyn CognitiveModel>>;
}
