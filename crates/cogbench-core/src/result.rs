//! Evaluation result table.
//!
//! One [`ResultRow`] per (model, subject, item, handler). Handler tables
//! are outer-joined on the shared identifying columns; the primary
//! handler contributes the plain `truth`/`prediction`/`score` columns,
//! auxiliary handlers contribute `truth_<col>`/`prediction_<col>`/
//! `score_<col>`.

use std::collections::BTreeMap;

use crate::domain::item::ResponseType;

/// One scored prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub model: String,
    pub id: String,
    pub domain: String,
    pub response_type: ResponseType,
    pub sequence: i64,
    pub task: String,
    pub choices: String,
    pub truth: String,
    pub prediction: String,
    pub score: f64,
    pub task_enc: Option<String>,
    pub truth_enc: Option<String>,
    pub prediction_enc: Option<String>,
}

/// Identity key shared by all handlers for the same prediction.
type RowKey = (String, String, String, ResponseType, i64, String, String);

fn key_of(row: &ResultRow) -> RowKey {
    (
        row.model.clone(),
        row.id.clone(),
        row.domain.clone(),
        row.response_type,
        row.sequence,
        row.task.clone(),
        row.choices.clone(),
    )
}

fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

/// Accumulated per-handler result rows for a whole evaluation run.
#[derive(Debug, Default)]
pub struct ResultTable {
    /// Handler columns in declaration order; the first is primary.
    columns: Vec<String>,

    /// Rows per handler column, in insertion order.
    rows: BTreeMap<String, Vec<ResultRow>>,
}

impl ResultTable {
    pub fn new() -> ResultTable {
        ResultTable::default()
    }

    /// Attach a handler's rows under its target column name.
    pub fn insert(&mut self, column: String, rows: Vec<ResultRow>) {
        if !self.columns.contains(&column) {
            self.columns.push(column.clone());
        }
        self.rows.entry(column).or_default().extend(rows);
    }

    pub fn handler_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self, column: &str) -> &[ResultRow] {
        self.rows.get(column).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(|rows| rows.is_empty())
    }

    /// Mean score per model for one handler column.
    pub fn mean_scores(&self, column: &str) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for row in self.rows(column) {
            let entry = sums.entry(row.model.clone()).or_insert((0.0, 0));
            entry.0 += row.score;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(model, (sum, count))| (model, sum / count as f64))
            .collect()
    }

    /// Outer-join the handler tables into one tabular view: the header
    /// row plus one record per identity key, in primary-handler order.
    pub fn joined(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut header = vec![
            "model".to_string(),
            "id".to_string(),
            "domain".to_string(),
            "response_type".to_string(),
            "sequence".to_string(),
            "task".to_string(),
            "choices".to_string(),
        ];

        let has_task_enc = self
            .rows
            .values()
            .flatten()
            .any(|row| row.task_enc.is_some());
        if has_task_enc {
            header.push("task_enc".to_string());
        }

        let mut enc_columns: Vec<bool> = Vec::new();
        for (idx, column) in self.columns.iter().enumerate() {
            let has_enc = self
                .rows(column)
                .iter()
                .any(|row| row.truth_enc.is_some() || row.prediction_enc.is_some());
            enc_columns.push(has_enc);

            if idx == 0 {
                header.push("truth".to_string());
                header.push("prediction".to_string());
                header.push("score".to_string());
            } else {
                header.push(format!("truth_{}", column));
                header.push(format!("prediction_{}", column));
                header.push(format!("score_{}", column));
            }
            if has_enc {
                header.push(format!("truth_enc_{}", column));
                header.push(format!("prediction_enc_{}", column));
            }
        }

        // Key order: first appearance across handlers in declaration order.
        let mut order: Vec<RowKey> = Vec::new();
        let mut cells: BTreeMap<(RowKey, String), &ResultRow> = BTreeMap::new();
        for column in &self.columns {
            for row in self.rows(column) {
                let key = key_of(row);
                if !cells.contains_key(&(key.clone(), column.clone())) {
                    if !order.contains(&key) {
                        order.push(key.clone());
                    }
                    cells.insert((key, column.clone()), row);
                }
            }
        }

        let mut records = Vec::with_capacity(order.len());
        for key in order {
            let (model, id, domain, response_type, sequence, task, choices) = key.clone();
            let mut record = vec![
                model,
                id,
                domain,
                response_type.as_str().to_string(),
                sequence.to_string(),
                task,
                choices,
            ];

            if has_task_enc {
                let task_enc = self
                    .columns
                    .iter()
                    .filter_map(|column| cells.get(&(key.clone(), column.clone())))
                    .find_map(|row| row.task_enc.clone())
                    .unwrap_or_default();
                record.push(task_enc);
            }

            for (idx, column) in self.columns.iter().enumerate() {
                match cells.get(&(key.clone(), column.clone())) {
                    Some(row) => {
                        record.push(row.truth.clone());
                        record.push(row.prediction.clone());
                        record.push(format_score(row.score));
                        if enc_columns[idx] {
                            record.push(row.truth_enc.clone().unwrap_or_default());
                            record.push(row.prediction_enc.clone().unwrap_or_default());
                        }
                    }
                    None => {
                        record.push(String::new());
                        record.push(String::new());
                        record.push(String::new());
                        if enc_columns[idx] {
                            record.push(String::new());
                            record.push(String::new());
                        }
                    }
                }
            }
            records.push(record);
        }

        (header, records)
    }
}
