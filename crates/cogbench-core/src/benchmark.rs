//! Declarative benchmark specification.
//!
//! Parses the JSON benchmark file into a fully-resolved, path-normalized,
//! loaded in-memory structure: dataset views, model descriptions,
//! comparator and encoder choices, and the evaluation-handler layout.
//! All spec validation happens here, before any model loads.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::debug;

use crate::compare::{Comparator, ComparatorRegistry};
use crate::data::{Dataset, Trial};
use crate::domain::error::{BenchError, SpecError};
use crate::encode::{EncoderRegistry, ResponseEncoder, TaskEncoder};

/// Reserved placeholder resolving to the bundled-plugin directory.
pub const BUNDLE_PLACEHOLDER: &str = "%cogbench%";

/// Evaluation protocol variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalType {
    /// Predict only; models never see the ground truth.
    Prediction,

    /// Predict, then adapt to the ground truth after every item.
    Adaption,

    /// Person-train on the subject's own test data before predicting.
    Coverage,
}

impl EvalType {
    fn parse(raw: &str) -> Result<EvalType, SpecError> {
        match raw {
            "prediction" => Ok(EvalType::Prediction),
            "adaption" => Ok(EvalType::Adaption),
            "coverage" => Ok(EvalType::Coverage),
            _ => Err(SpecError::InvalidType {
                value: raw.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvalType::Prediction => "prediction",
            EvalType::Adaption => "adaption",
            EvalType::Coverage => "coverage",
        }
    }

    /// Whether models adapt to the ground truth after each item.
    pub fn adapts(&self) -> bool {
        matches!(self, EvalType::Adaption)
    }
}

/// Resolved description of one model under evaluation.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Plugin manifest file or directory, absolute after resolution.
    pub path: PathBuf,

    /// Explicit entry name for disambiguation.
    pub classname: Option<String>,

    /// Display-name override for the result table.
    pub override_name: Option<String>,

    /// Constructor parameters merged over the manifest defaults.
    pub args: Map<String, serde_json::Value>,
}

/// One evaluation handler's configuration: the target column it scores
/// and the comparator it scores with. Only the primary handler adapts.
pub struct HandlerSpec {
    pub column: String,
    pub comparator: Arc<dyn Comparator>,
    pub adapts: bool,
}

impl std::fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("column", &self.column)
            .field("adapts", &self.adapts)
            .finish_non_exhaustive()
    }
}

/// Path resolution context for a benchmark file.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// Directory of the benchmark file; anchors relative paths.
    pub base: PathBuf,

    /// Bundled-plugin directory the `%cogbench%` placeholder resolves to.
    pub bundle: Option<PathBuf>,
}

impl PathContext {
    pub fn resolve(&self, raw: &str) -> PathBuf {
        if let Some(rest) = raw.strip_prefix(BUNDLE_PLACEHOLDER) {
            if let Some(bundle) = &self.bundle {
                return bundle.join(rest.trim_start_matches('/'));
            }
        }
        let path = PathBuf::from(raw);
        if path.is_relative() {
            self.base.join(path)
        } else {
            path
        }
    }
}

// ---------------------------------------------------------------------------
// Raw file schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(path) => vec![path],
            OneOrMany::Many(paths) => paths,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelEntry {
    Path(String),
    Detailed {
        filename: String,
        #[serde(default)]
        override_name: Option<String>,
        #[serde(default)]
        classname: Option<String>,
        #[serde(default)]
        args: Map<String, serde_json::Value>,
    },
}

#[derive(Deserialize, Clone)]
struct AuxEvaluation {
    column: String,
    comparator: String,
}

#[derive(Deserialize)]
struct BenchmarkFile {
    #[serde(rename = "data.test")]
    data_test: Option<OneOrMany>,
    #[serde(rename = "data.pre_train")]
    data_pre_train: Option<OneOrMany>,
    #[serde(rename = "data.pre_train_person")]
    data_pre_train_person: Option<OneOrMany>,
    #[serde(rename = "data.pre_person_background")]
    data_pre_person_background: Option<OneOrMany>,
    #[serde(default)]
    models: Vec<ModelEntry>,
    #[serde(rename = "type")]
    eval_type: Option<String>,
    comparator: Option<String>,
    #[serde(default)]
    corresponding_data: bool,
    target_columns: Option<Vec<String>>,
    #[serde(default)]
    aux_evaluations: Vec<AuxEvaluation>,
    #[serde(default)]
    task_encoders: BTreeMap<String, String>,
    #[serde(default)]
    response_encoders: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Resolved benchmark
// ---------------------------------------------------------------------------

/// Fully-resolved benchmark: datasets loaded, models and scoring
/// strategies bound, evaluation type validated.
pub struct Benchmark {
    /// Benchmark name (file stem).
    pub name: String,

    /// Evaluation protocol.
    pub eval_type: EvalType,

    /// Whether training and test subject pools share identifiers.
    pub corresponding_data: bool,

    /// Target columns; the first is the primary evaluation column.
    pub target_columns: Vec<String>,

    /// Models under evaluation, in declaration order.
    pub models: Vec<ModelInfo>,

    /// Test data view (always present).
    pub data_test: Dataset,

    /// Global pretraining view.
    pub data_pre_train: Option<Dataset>,

    /// Person pretraining view (same-domain data about test subjects).
    pub data_pre_train_person: Option<Dataset>,

    /// Person background view (domain-unrelated data about test subjects).
    pub data_pre_person_background: Option<Dataset>,

    /// Evaluation handlers: primary first, auxiliary after.
    pub handlers: Vec<HandlerSpec>,

    /// Diagnostic task encoders per domain.
    pub task_encoders: BTreeMap<String, Arc<dyn TaskEncoder>>,

    /// Diagnostic response encoders per domain.
    pub response_encoders: BTreeMap<String, Arc<dyn ResponseEncoder>>,

    /// Source paths, for the run artifact.
    pub test_paths: Vec<PathBuf>,
    pub pre_train_paths: Vec<PathBuf>,
    pub pre_train_person_paths: Vec<PathBuf>,
    pub pre_person_background_paths: Vec<PathBuf>,
}

impl std::fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("eval_type", &self.eval_type)
            .field("corresponding_data", &self.corresponding_data)
            .field("target_columns", &self.target_columns)
            .field("models", &self.models)
            .field("data_test", &self.data_test)
            .field("data_pre_train", &self.data_pre_train)
            .field("data_pre_train_person", &self.data_pre_train_person)
            .field("data_pre_person_background", &self.data_pre_person_background)
            .field("handlers", &self.handlers)
            .field(
                "task_encoders",
                &self.task_encoders.keys().collect::<Vec<_>>(),
            )
            .field(
                "response_encoders",
                &self.response_encoders.keys().collect::<Vec<_>>(),
            )
            .field("test_paths", &self.test_paths)
            .field("pre_train_paths", &self.pre_train_paths)
            .field("pre_train_person_paths", &self.pre_train_person_paths)
            .field("pre_person_background_paths", &self.pre_person_background_paths)
            .finish()
    }
}

impl Benchmark {
    /// Load and validate a benchmark file.
    ///
    /// `bundle` is the directory the `%cogbench%` placeholder resolves
    /// to; the registries supply the comparator/encoder implementations
    /// the spec may reference.
    pub fn load(
        path: &Path,
        bundle: Option<PathBuf>,
        comparators: &ComparatorRegistry,
        encoders: &EncoderRegistry,
    ) -> Result<Benchmark, BenchError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SpecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: BenchmarkFile =
            serde_json::from_str(&raw).map_err(|source| SpecError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let context = PathContext { base, bundle };

        let eval_type = match &file.eval_type {
            Some(raw) => EvalType::parse(raw)?,
            None => EvalType::Adaption,
        };

        // Coverage substitutes the subject's own test data for person
        // training; declaring both is contradictory.
        if eval_type == EvalType::Coverage && file.data_pre_train_person.is_some() {
            return Err(SpecError::CoveragePersonTrain.into());
        }

        let test_spec = file
            .data_test
            .ok_or_else(|| SpecError::MissingField {
                field: "data.test".to_string(),
            })?;

        // Target columns: explicit list, or the primary `response` column
        // plus whatever the auxiliary evaluations need.
        let target_columns = match file.target_columns {
            Some(columns) => {
                for aux in &file.aux_evaluations {
                    if !columns.contains(&aux.column) {
                        return Err(SpecError::UnknownAuxColumn {
                            column: aux.column.clone(),
                        }
                        .into());
                    }
                }
                columns
            }
            None => {
                let mut columns = vec!["response".to_string()];
                for aux in &file.aux_evaluations {
                    if !columns.contains(&aux.column) {
                        columns.push(aux.column.clone());
                    }
                }
                columns
            }
        };

        // Scoring strategies.
        let primary_key = file.comparator.unwrap_or_else(|| "equality".to_string());
        let primary = resolve_comparator(&primary_key, &context, comparators)?;
        let mut handlers = vec![HandlerSpec {
            column: target_columns[0].clone(),
            comparator: primary,
            adapts: true,
        }];
        for aux in &file.aux_evaluations {
            handlers.push(HandlerSpec {
                column: aux.column.clone(),
                comparator: resolve_comparator(&aux.comparator, &context, comparators)?,
                adapts: false,
            });
        }

        // Diagnostic encoders.
        let mut task_encoders = BTreeMap::new();
        for (domain, value) in &file.task_encoders {
            task_encoders.insert(
                domain.clone(),
                resolve_task_encoder(value, &context, encoders)?,
            );
        }
        let mut response_encoders = BTreeMap::new();
        for (domain, value) in &file.response_encoders {
            response_encoders.insert(
                domain.clone(),
                resolve_response_encoder(value, &context, encoders)?,
            );
        }

        // Dataset views.
        let test_paths = resolve_paths(test_spec, &context);
        let data_test = Dataset::from_csv_paths(&test_paths, &target_columns)?;
        let test_ids: BTreeSet<String> = data_test.subjects().keys().cloned().collect();

        let pre_train_paths = file
            .data_pre_train
            .map(|spec| resolve_paths(spec, &context))
            .unwrap_or_default();
        let mut data_pre_train = if pre_train_paths.is_empty() {
            None
        } else {
            Some(Dataset::from_csv_paths(&pre_train_paths, &target_columns)?)
        };

        let pre_train_person_paths = file
            .data_pre_train_person
            .map(|spec| resolve_paths(spec, &context))
            .unwrap_or_default();
        let mut data_pre_train_person = if pre_train_person_paths.is_empty() {
            None
        } else {
            Some(Dataset::from_csv_paths(
                &pre_train_person_paths,
                &target_columns,
            )?)
        };

        let pre_person_background_paths = file
            .data_pre_person_background
            .map(|spec| resolve_paths(spec, &context))
            .unwrap_or_default();
        let mut data_pre_person_background = if pre_person_background_paths.is_empty() {
            None
        } else {
            Some(Dataset::from_csv_paths(
                &pre_person_background_paths,
                &target_columns,
            )?)
        };

        // Person-scoped views only make sense for subjects we will test.
        if let Some(view) = data_pre_train_person.as_mut() {
            view.retain_subjects(&test_ids);
        }
        if let Some(view) = data_pre_person_background.as_mut() {
            view.retain_subjects(&test_ids);
        }

        if let Some(train) = data_pre_train.as_mut() {
            if file.corresponding_data {
                // Training rows of test subjects that the test view does
                // not contain feed the person-scoped views: same-domain
                // rows become person training, the rest background.
                let mut person_extra =
                    data_pre_train_person.take().unwrap_or_else(|| Dataset::empty(&target_columns));
                let mut background_extra = data_pre_person_background
                    .take()
                    .unwrap_or_else(|| Dataset::empty(&target_columns));

                for (subject, trials) in train.subjects() {
                    if !data_test.contains_subject(subject) {
                        continue;
                    }
                    for trial in trials {
                        if test_contains(&data_test, subject, trial) {
                            continue;
                        }
                        if data_test.domains().contains(&trial.item.domain) {
                            person_extra.push_trial(subject, trial.clone());
                        } else {
                            background_extra.push_trial(subject, trial.clone());
                        }
                    }
                }

                data_pre_train_person = (!person_extra.is_empty()).then_some(person_extra);
                data_pre_person_background =
                    (!background_extra.is_empty()).then_some(background_extra);
            } else {
                // Disjoint subject pools: renumber training identifiers
                // past the test identifiers so they cannot collide.
                train.offset_identifiers(test_ids.iter().map(|s| s.as_str()));
            }
        }

        // Models.
        let models = file
            .models
            .into_iter()
            .map(|entry| match entry {
                ModelEntry::Path(path) => ModelInfo {
                    path: context.resolve(&path),
                    classname: None,
                    override_name: None,
                    args: Map::new(),
                },
                ModelEntry::Detailed {
                    filename,
                    override_name,
                    classname,
                    args,
                } => ModelInfo {
                    path: context.resolve(&filename),
                    classname,
                    override_name,
                    args,
                },
            })
            .collect();

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "benchmark".to_string());

        debug!(
            benchmark = %name,
            eval_type = eval_type.as_str(),
            corresponding = file.corresponding_data,
            "loaded benchmark"
        );

        Ok(Benchmark {
            name,
            eval_type,
            corresponding_data: file.corresponding_data,
            target_columns,
            models,
            data_test,
            data_pre_train,
            data_pre_train_person,
            data_pre_person_background,
            handlers,
            task_encoders,
            response_encoders,
            test_paths,
            pre_train_paths,
            pre_train_person_paths,
            pre_person_background_paths,
        })
    }
}

fn resolve_paths(spec: OneOrMany, context: &PathContext) -> Vec<PathBuf> {
    spec.into_vec()
        .into_iter()
        .map(|raw| context.resolve(&raw))
        .collect()
}

/// Whether the test view already contains this training row (matched on
/// task, response type, and domain).
fn test_contains(test: &Dataset, subject: &str, trial: &Trial) -> bool {
    test.trials(subject)
        .map(|trials| {
            trials.iter().any(|t| {
                t.item.task_str == trial.item.task_str
                    && t.item.response_type == trial.item.response_type
                    && t.item.domain == trial.item.domain
            })
        })
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct ComparatorManifest {
    comparator: String,
}

fn resolve_comparator(
    value: &str,
    context: &PathContext,
    registry: &ComparatorRegistry,
) -> Result<Arc<dyn Comparator>, BenchError> {
    if let Some(comparator) = registry.get(value) {
        return Ok(comparator);
    }

    // Not a registered key: treat as a path to a comparator manifest.
    let path = context.resolve(value);
    let manifest: Option<ComparatorManifest> = std::fs::read_to_string(&path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok());
    manifest
        .and_then(|manifest| registry.get(&manifest.comparator))
        .ok_or_else(|| {
            SpecError::UnknownComparator {
                name: value.to_string(),
            }
            .into()
        })
}

#[derive(Deserialize)]
struct EncoderManifest {
    encoder: String,
}

fn encoder_key(value: &str, context: &PathContext) -> Option<String> {
    let path = context.resolve(value);
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|raw| serde_json::from_str::<EncoderManifest>(&raw).ok())
        .map(|manifest| manifest.encoder)
}

fn resolve_task_encoder(
    value: &str,
    context: &PathContext,
    registry: &EncoderRegistry,
) -> Result<Arc<dyn TaskEncoder>, BenchError> {
    if let Some(encoder) = registry.task(value) {
        return Ok(encoder);
    }
    encoder_key(value, context)
        .and_then(|key| registry.task(&key))
        .ok_or_else(|| {
            SpecError::UnknownEncoder {
                name: value.to_string(),
            }
            .into()
        })
}

fn resolve_response_encoder(
    value: &str,
    context: &PathContext,
    registry: &EncoderRegistry,
) -> Result<Arc<dyn ResponseEncoder>, BenchError> {
    if let Some(encoder) = registry.response(value) {
        return Ok(encoder);
    }
    encoder_key(value, context)
        .and_then(|key| registry.response(&key))
        .ok_or_else(|| {
            SpecError::UnknownEncoder {
                name: value.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEST_CSV: &str = "\
id,sequence,task,choices,response_type,domain,response
s1,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,NVC
s1,2,Some;a;b/All;b;c,Some;a;c|NVC,single-choice,syllogistic,Some;a;c
s2,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,All;a;c
";

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).expect("create");
        file.write_all(content.as_bytes()).expect("write");
    }

    fn load(dir: &Path, benchmark: &str) -> Result<Benchmark, BenchError> {
        write_file(dir, "bench.json", benchmark);
        Benchmark::load(
            &dir.join("bench.json"),
            None,
            &ComparatorRegistry::with_builtins(),
            &EncoderRegistry::with_builtins(),
        )
    }

    #[test]
    fn test_minimal_benchmark() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);

        let benchmark = load(dir.path(), r#"{"data.test": "test.csv", "models": []}"#)
            .expect("load");
        assert_eq!(benchmark.eval_type, EvalType::Adaption);
        assert_eq!(benchmark.target_columns, ["response"]);
        assert_eq!(benchmark.data_test.subjects().len(), 2);
        assert_eq!(benchmark.handlers.len(), 1);
        assert!(benchmark.handlers[0].adapts);
        assert_eq!(benchmark.handlers[0].comparator.name(), "Accuracy");
    }

    #[test]
    fn test_missing_test_data_is_spec_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(dir.path(), r#"{"models": []}"#).unwrap_err();
        assert!(matches!(
            err,
            BenchError::Spec(SpecError::MissingField { .. })
        ));
    }

    #[test]
    fn test_invalid_type_is_spec_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        let err = load(
            dir.path(),
            r#"{"data.test": "test.csv", "type": "simulation"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BenchError::Spec(SpecError::InvalidType { .. })));
    }

    #[test]
    fn test_coverage_forbids_person_pretrain() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        let err = load(
            dir.path(),
            r#"{"data.test": "test.csv", "type": "coverage", "data.pre_train_person": "test.csv"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BenchError::Spec(SpecError::CoveragePersonTrain)
        ));
    }

    #[test]
    fn test_unknown_comparator_is_spec_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        let err = load(
            dir.path(),
            r#"{"data.test": "test.csv", "comparator": "levenshtein"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BenchError::Spec(SpecError::UnknownComparator { .. })
        ));
    }

    #[test]
    fn test_model_entries_both_forms() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        let benchmark = load(
            dir.path(),
            r#"{
                "data.test": "test.csv",
                "models": [
                    "models/uniform.json",
                    {"filename": "models/mfa", "override_name": "MFA*", "classname": "mfa",
                     "args": {"k": 2}}
                ]
            }"#,
        )
        .expect("load");

        assert_eq!(benchmark.models.len(), 2);
        assert!(benchmark.models[0].path.ends_with("models/uniform.json"));
        assert!(benchmark.models[0].path.is_absolute() || benchmark.models[0].path.starts_with(dir.path()));
        assert_eq!(benchmark.models[1].override_name.as_deref(), Some("MFA*"));
        assert_eq!(benchmark.models[1].classname.as_deref(), Some("mfa"));
        assert_eq!(benchmark.models[1].args["k"], serde_json::json!(2));
    }

    #[test]
    fn test_non_corresponding_train_ids_are_offset() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        write_file(
            dir.path(),
            "train.csv",
            "id,sequence,task,choices,response_type,domain,response\n\
             7,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,NVC\n",
        );

        let benchmark = load(
            dir.path(),
            r#"{"data.test": "test.csv", "data.pre_train": "train.csv"}"#,
        )
        .expect("load");

        let train = benchmark.data_pre_train.expect("train view");
        // Test ids are non-numeric, so the offset starts at 1.
        assert!(train.contains_subject("1"));
        assert!(!train.contains_subject("7"));
    }

    #[test]
    fn test_corresponding_extra_rows_split_by_domain() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        write_file(
            dir.path(),
            "train.csv",
            "id,sequence,task,choices,response_type,domain,response\n\
             s1,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,NVC\n\
             s1,3,No;c;d/All;d;e,No;c;e|NVC,single-choice,syllogistic,NVC\n\
             s1,4,A;and;B,True|False,verify,propositional,True\n\
             s9,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,NVC\n",
        );

        let benchmark = load(
            dir.path(),
            r#"{"data.test": "test.csv", "data.pre_train": "train.csv",
                "corresponding_data": true}"#,
        )
        .expect("load");

        // Row with sequence 1 matches the test view and is not re-split;
        // the unseen syllogistic row lands in the person view, the
        // propositional row in the background view.
        let person = benchmark.data_pre_train_person.expect("person view");
        assert_eq!(person.trials("s1").map(|t| t.len()), Some(1));
        assert_eq!(
            person.trials("s1").unwrap()[0].item.sequence_number,
            3
        );

        let background = benchmark.data_pre_person_background.expect("background view");
        assert_eq!(background.trials("s1").map(|t| t.len()), Some(1));
        assert_eq!(
            background.trials("s1").unwrap()[0].item.domain,
            "propositional"
        );

        // Non-test subjects contribute nothing to the person views.
        assert!(!person.contains_subject("s9"));
    }

    #[test]
    fn test_aux_evaluation_adds_handler_and_target_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "test.csv",
            "id,sequence,task,choices,response_type,domain,response,confidence\n\
             s1,1,All;a;b/All;b;c,All;a;c|NVC,single-choice,syllogistic,NVC,5\n",
        );

        let benchmark = load(
            dir.path(),
            r#"{"data.test": "test.csv",
                "aux_evaluations": [{"column": "confidence", "comparator": "absdiff"}]}"#,
        )
        .expect("load");

        assert_eq!(benchmark.target_columns, ["response", "confidence"]);
        assert_eq!(benchmark.handlers.len(), 2);
        assert!(!benchmark.handlers[1].adapts);
        assert_eq!(benchmark.handlers[1].comparator.name(), "Absolute Difference");
    }

    #[test]
    fn test_explicit_target_columns_must_cover_aux() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "test.csv", TEST_CSV);
        let err = load(
            dir.path(),
            r#"{"data.test": "test.csv", "target_columns": ["response"],
                "aux_evaluations": [{"column": "confidence", "comparator": "absdiff"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BenchError::Spec(SpecError::UnknownAuxColumn { .. })
        ));
    }

    #[test]
    fn test_bundle_placeholder_resolution() {
        let context = PathContext {
            base: PathBuf::from("/bench"),
            bundle: Some(PathBuf::from("/opt/cogbench/assets")),
        };
        assert_eq!(
            context.resolve("%cogbench%/encoders/syllogistic.json"),
            PathBuf::from("/opt/cogbench/assets/encoders/syllogistic.json")
        );
        assert_eq!(
            context.resolve("data/test.csv"),
            PathBuf::from("/bench/data/test.csv")
        );
        assert_eq!(
            context.resolve("/abs/test.csv"),
            PathBuf::from("/abs/test.csv")
        );
    }
}
