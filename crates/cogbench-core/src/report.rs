//! Run artifact and result-table writers.
//!
//! The CSV table plus the JSON run artifact are the only outputs of an
//! evaluation run; downstream visualization consumes them as-is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::benchmark::Benchmark;
use crate::engine::{EvaluationRun, ModelLog};
use crate::result::ResultTable;

/// Per-model aggregate over the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSummary {
    /// Model display name.
    pub model: String,

    /// Scored rows contributed by the primary handler.
    pub rows: usize,

    /// Mean score per handler column.
    pub mean_scores: BTreeMap<String, f64>,
}

/// Canonical JSON artifact written next to the result table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunArtifact {
    pub schema_version: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub benchmark: String,
    pub eval_type: String,
    pub corresponding_data: bool,
    pub domains: Vec<String>,
    pub response_types: Vec<String>,
    pub data_test: Vec<String>,
    pub data_pre_train: Vec<String>,
    pub data_pre_train_person: Vec<String>,
    pub data_pre_person_background: Vec<String>,
    pub summaries: Vec<ModelSummary>,
    pub model_log: ModelLog,
}

fn basenames(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect()
}

impl RunArtifact {
    /// Assemble the artifact for a finished run.
    pub fn from_run(
        benchmark: &Benchmark,
        run: &EvaluationRun,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> RunArtifact {
        let primary = benchmark.target_columns[0].as_str();

        let mut per_model_rows: BTreeMap<String, usize> = BTreeMap::new();
        for row in run.table.rows(primary) {
            *per_model_rows.entry(row.model.clone()).or_insert(0) += 1;
        }

        let mut summaries = Vec::with_capacity(per_model_rows.len());
        for (model, rows) in per_model_rows {
            let mut mean_scores = BTreeMap::new();
            for column in run.table.handler_columns() {
                if let Some(mean) = run.table.mean_scores(column).get(&model) {
                    mean_scores.insert(column.clone(), *mean);
                }
            }
            summaries.push(ModelSummary {
                model,
                rows,
                mean_scores,
            });
        }

        RunArtifact {
            schema_version: "1.0".to_string(),
            run_id: Uuid::new_v4(),
            started_at,
            finished_at,
            benchmark: benchmark.name.clone(),
            eval_type: benchmark.eval_type.as_str().to_string(),
            corresponding_data: benchmark.corresponding_data,
            domains: benchmark.data_test.domains().iter().cloned().collect(),
            response_types: benchmark
                .data_test
                .response_types()
                .iter()
                .map(|rt| rt.as_str().to_string())
                .collect(),
            data_test: basenames(&benchmark.test_paths),
            data_pre_train: basenames(&benchmark.pre_train_paths),
            data_pre_train_person: basenames(&benchmark.pre_train_person_paths),
            data_pre_person_background: basenames(&benchmark.pre_person_background_paths),
            summaries,
            model_log: run.model_log.clone(),
        }
    }
}

/// Write the joined result table as CSV.
pub fn write_result_csv(path: &Path, table: &ResultTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("open result table {:?}", path))?;
    let (header, records) = table.joined();
    writer.write_record(&header).context("write header")?;
    for record in records {
        writer.write_record(&record).context("write record")?;
    }
    writer.flush().context("flush result table")?;
    Ok(())
}

/// Write the run artifact in pretty JSON format.
pub fn write_run_artifact(path: &Path, artifact: &RunArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize run artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
