//! Cogbench Core Library
//!
//! Re-exports the building blocks of the cogbench evaluation harness:
//! the nested-value codec, dataset views, comparators and encoders, the
//! plugin registry/loader, the benchmark specification, and the
//! evaluation engine.

pub mod benchmark;
pub mod compare;
pub mod data;
pub mod domain;
pub mod encode;
pub mod engine;
pub mod handler;
pub mod loader;
pub mod model;
pub mod registry;
pub mod report;
pub mod result;
pub mod telemetry;

pub use domain::codec::{encode, parse_choices, parse_response, parse_task, unnest};
pub use domain::{
    Atom, BenchError, ComparisonError, DataError, Item, ResolutionError, ResponseType, Result,
    SpecError, Value,
};

pub use compare::{
    AbsDiffComparator, Comparator, ComparatorRegistry, EqualityComparator, NvcComparator,
    SquaredDiffComparator,
};
pub use encode::{EncoderRegistry, IdentityResponseEncoder, ResponseEncoder, TaskEncoder};

pub use data::{Dataset, Demographics, Trial};

pub use model::{Aux, CognitiveModel, ModelFactory, ParticipantLog};
pub use registry::ModelRegistry;

pub use loader::{ModelHandle, ModelLoader, ModelManifest};

pub use benchmark::{Benchmark, EvalType, HandlerSpec, ModelInfo, PathContext};

pub use engine::{EvaluationRun, Evaluator, ModelLog};
pub use handler::EvaluationHandler;
pub use report::{write_result_csv, write_run_artifact, ModelSummary, RunArtifact};
pub use result::{ResultRow, ResultTable};

pub use telemetry::init_tracing;

/// Cogbench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
