//! Pluggable scoring strategies.
//!
//! A [`Comparator`] scores a prediction against a ground truth. Scoring
//! always happens on the encoded string form (or the un-nested numeric
//! form for the difference comparators); comparators never decode back to
//! structure.

pub mod absdiff;
pub mod equality;
pub mod nvc;
pub mod squareddiff;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::error::ComparisonError;
use crate::domain::item::ResponseType;
use crate::domain::value::Value;

pub use absdiff::AbsDiffComparator;
pub use equality::EqualityComparator;
pub use nvc::NvcComparator;
pub use squareddiff::SquaredDiffComparator;

/// Scoring strategy between a prediction and a ground truth.
pub trait Comparator: Send + Sync {
    /// Stable display name used in output headers.
    fn name(&self) -> &str;

    /// Score a prediction against the target. Pure; must reject response
    /// types the strategy cannot score.
    fn compare(
        &self,
        prediction: &Value,
        target: &Value,
        response_type: ResponseType,
        choices: &[Value],
    ) -> Result<f64, ComparisonError>;
}

/// Registry of comparators keyed by their benchmark-spec key.
#[derive(Default, Clone)]
pub struct ComparatorRegistry {
    comparators: BTreeMap<String, Arc<dyn Comparator>>,
}

impl ComparatorRegistry {
    pub fn new() -> ComparatorRegistry {
        ComparatorRegistry::default()
    }

    /// Registry pre-populated with the built-in comparators
    /// (`equality`, `nvc`, `absdiff`, `squareddiff`).
    pub fn with_builtins() -> ComparatorRegistry {
        let mut registry = ComparatorRegistry::new();
        registry.register("equality", Arc::new(EqualityComparator));
        registry.register("nvc", Arc::new(NvcComparator));
        registry.register("absdiff", Arc::new(AbsDiffComparator));
        registry.register("squareddiff", Arc::new(SquaredDiffComparator));
        registry
    }

    pub fn register(&mut self, key: &str, comparator: Arc<dyn Comparator>) {
        self.comparators.insert(key.to_string(), comparator);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Comparator>> {
        self.comparators.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.comparators.contains_key(key)
    }
}
