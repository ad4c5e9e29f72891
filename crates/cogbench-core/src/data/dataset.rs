//! CSV-backed dataset container.
//!
//! A [`Dataset`] maps subject identifiers to their ordered sequence of
//! [`Trial`]s, validated against the required-column contract. Four views
//! may exist concurrently per evaluation run: test, global pretrain,
//! person pretrain, and person background.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::domain::codec::parse_response;
use crate::domain::error::DataError;
use crate::domain::item::{Item, ResponseType};
use crate::domain::value::{Atom, Value};

/// Columns every dataset must provide, in addition to its target columns.
pub const REQUIRED_COLUMNS: [&str; 6] =
    ["id", "sequence", "task", "choices", "response_type", "domain"];

/// Reserved auxiliary columns describing the participant rather than the
/// trial. Forwarded to the participant-start hook when present.
pub const DEMOGRAPHIC_COLUMNS: [&str; 5] =
    ["age", "gender", "education", "affinity", "experience"];

/// Demographic information for one subject.
pub type Demographics = serde_json::Map<String, serde_json::Value>;

/// One row of a subject's session: the item plus its recorded targets and
/// any auxiliary columns.
#[derive(Debug, Clone)]
pub struct Trial {
    /// The task instance.
    pub item: Item,

    /// Parsed target values, keyed by target column name.
    pub targets: BTreeMap<String, Value>,

    /// Original target cell contents, for result output.
    pub raw_targets: BTreeMap<String, String>,

    /// Non-required columns, coerced to JSON scalars.
    pub aux: serde_json::Map<String, serde_json::Value>,
}

impl Trial {
    /// The parsed value of the given target column.
    pub fn target(&self, column: &str) -> Option<&Value> {
        self.targets.get(column)
    }
}

fn coerce_json(raw: &str) -> serde_json::Value {
    match Atom::coerce(raw) {
        Atom::Bool(b) => serde_json::Value::Bool(b),
        Atom::Int(i) => serde_json::Value::Number(i.into()),
        Atom::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(raw.to_string())),
        Atom::Text(s) => serde_json::Value::String(s),
    }
}

/// Mapping from subject identifier to that subject's ordered trials.
#[derive(Debug, Clone)]
pub struct Dataset {
    target_columns: Vec<String>,
    subjects: BTreeMap<String, Vec<Trial>>,
    domains: BTreeSet<String>,
    response_types: BTreeSet<ResponseType>,
}

impl Dataset {
    /// Load a dataset from a CSV file, validating the required-column
    /// contract (`id, sequence, task, choices, response_type, domain`
    /// plus every target column).
    pub fn from_csv_path(path: &Path, target_columns: &[String]) -> Result<Dataset, DataError> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut required: Vec<String> =
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for column in target_columns {
            if !required.contains(column) {
                required.push(column.clone());
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|c| !headers.contains(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        let column_index: BTreeMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut dataset = Dataset {
            target_columns: target_columns.to_vec(),
            subjects: BTreeMap::new(),
            domains: BTreeSet::new(),
            response_types: BTreeSet::new(),
        };

        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let cell = |name: &str| -> &str { record.get(column_index[name]).unwrap_or("") };

            let sequence: i64 =
                cell("sequence")
                    .parse()
                    .map_err(|_| DataError::InvalidSequence {
                        path: path.to_path_buf(),
                        row: row_idx + 1,
                        value: cell("sequence").to_string(),
                    })?;
            let response_type = ResponseType::parse(cell("response_type"))?;

            let item = Item::new(
                cell("id"),
                cell("domain"),
                cell("task"),
                response_type,
                cell("choices"),
                sequence,
            );

            let mut targets = BTreeMap::new();
            let mut raw_targets = BTreeMap::new();
            for column in target_columns {
                let raw = cell(column);
                targets.insert(column.clone(), parse_response(raw, response_type));
                raw_targets.insert(column.clone(), raw.to_string());
            }

            let mut aux = serde_json::Map::new();
            for (name, idx) in &column_index {
                if required.iter().any(|r| r == name) {
                    continue;
                }
                aux.insert(name.to_string(), coerce_json(record.get(*idx).unwrap_or("")));
            }

            dataset.domains.insert(item.domain.clone());
            dataset.response_types.insert(response_type);
            dataset
                .subjects
                .entry(item.identifier.clone())
                .or_default()
                .push(Trial {
                    item,
                    targets,
                    raw_targets,
                    aux,
                });
        }

        dataset.sort_trials();
        debug!(
            path = %path.display(),
            subjects = dataset.subjects.len(),
            domains = dataset.domains.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Load and concatenate several CSV files into one view.
    pub fn from_csv_paths(paths: &[std::path::PathBuf], target_columns: &[String]) -> Result<Dataset, DataError> {
        let mut merged: Option<Dataset> = None;
        for path in paths {
            let part = Dataset::from_csv_path(path, target_columns)?;
            merged = Some(match merged {
                None => part,
                Some(mut acc) => {
                    acc.absorb(part);
                    acc
                }
            });
        }
        let mut dataset = merged.unwrap_or_else(|| Dataset::empty(target_columns));
        dataset.sort_trials();
        Ok(dataset)
    }

    /// An empty view with the given target columns.
    pub fn empty(target_columns: &[String]) -> Dataset {
        Dataset {
            target_columns: target_columns.to_vec(),
            subjects: BTreeMap::new(),
            domains: BTreeSet::new(),
            response_types: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, other: Dataset) {
        for (subject, trials) in other.subjects {
            self.subjects.entry(subject).or_default().extend(trials);
        }
        self.domains.extend(other.domains);
        self.response_types.extend(other.response_types);
    }

    fn sort_trials(&mut self) {
        for trials in self.subjects.values_mut() {
            trials.sort_by_key(|t| t.item.sequence_number);
        }
    }

    /// Append a trial to a subject's session, keeping sequence order.
    pub fn push_trial(&mut self, subject: &str, trial: Trial) {
        self.domains.insert(trial.item.domain.clone());
        self.response_types.insert(trial.item.response_type);
        let trials = self.subjects.entry(subject.to_string()).or_default();
        trials.push(trial);
        trials.sort_by_key(|t| t.item.sequence_number);
    }

    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }

    pub fn subjects(&self) -> &BTreeMap<String, Vec<Trial>> {
        &self.subjects
    }

    pub fn trials(&self, subject: &str) -> Option<&[Trial]> {
        self.subjects.get(subject).map(|t| t.as_slice())
    }

    pub fn contains_subject(&self, subject: &str) -> bool {
        self.subjects.contains_key(subject)
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn domains(&self) -> &BTreeSet<String> {
        &self.domains
    }

    pub fn response_types(&self) -> &BTreeSet<ResponseType> {
        &self.response_types
    }

    /// Drop every subject not contained in `keep`.
    pub fn retain_subjects(&mut self, keep: &BTreeSet<String>) {
        self.subjects.retain(|subject, _| keep.contains(subject));
    }

    /// Remap subject identifiers so they cannot collide with the test
    /// set's identifiers. The offset is the ceiling of the largest
    /// numeric test identifier plus one; non-numeric identifiers are
    /// ignored when computing it. View keys change, item identifiers
    /// keep their recorded values.
    pub fn offset_identifiers<'a>(&mut self, test_ids: impl Iterator<Item = &'a str>) {
        let mut offset: i64 = 0;
        for id in test_ids {
            if let Ok(numeric) = id.parse::<f64>() {
                let ceiled = numeric.ceil() as i64;
                if offset < ceiled {
                    offset = ceiled;
                }
            }
        }
        offset += 1;

        let old = std::mem::take(&mut self.subjects);
        for (next, (_, trials)) in old.into_iter().enumerate() {
            self.subjects.insert((offset + next as i64).to_string(), trials);
        }
    }

    /// Demographic information for one subject: the reserved columns'
    /// unique values, singleton lists collapsed to a scalar.
    pub fn demographics(&self, subject: &str) -> Demographics {
        let mut demographics = Demographics::new();
        let Some(trials) = self.subjects.get(subject) else {
            return demographics;
        };

        for column in DEMOGRAPHIC_COLUMNS {
            let mut uniques: Vec<serde_json::Value> = Vec::new();
            for trial in trials {
                if let Some(value) = trial.aux.get(column) {
                    if !uniques.contains(value) {
                        uniques.push(value.clone());
                    }
                }
            }
            match uniques.len() {
                0 => {}
                1 => {
                    demographics.insert(column.to_string(), uniques.pop().unwrap());
                }
                _ => {
                    demographics.insert(column.to_string(), serde_json::Value::Array(uniques));
                }
            }
        }
        demographics
    }
}
