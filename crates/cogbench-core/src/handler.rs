//! Evaluation handler.
//!
//! One handler per target column: it scores every prediction against its
//! column's ground truth with its comparator, decorates the row with the
//! diagnostic encoder columns, and forwards adaptation to the model when
//! it is the adapting (primary) handler.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::benchmark::HandlerSpec;
use crate::compare::Comparator;
use crate::data::Trial;
use crate::domain::codec::encode;
use crate::domain::error::{BenchError, Result};
use crate::domain::item::ResponseType;
use crate::domain::value::Value;
use crate::encode::{ResponseEncoder, TaskEncoder};
use crate::model::CognitiveModel;
use crate::result::ResultRow;

pub struct EvaluationHandler {
    column: String,
    comparator: Arc<dyn Comparator>,
    adapts: bool,
    task_encoders: BTreeMap<String, Arc<dyn TaskEncoder>>,
    response_encoders: BTreeMap<String, Arc<dyn ResponseEncoder>>,
    rows: Vec<ResultRow>,
}

impl EvaluationHandler {
    pub fn new(
        spec: &HandlerSpec,
        task_encoders: &BTreeMap<String, Arc<dyn TaskEncoder>>,
        response_encoders: &BTreeMap<String, Arc<dyn ResponseEncoder>>,
    ) -> EvaluationHandler {
        EvaluationHandler {
            column: spec.column.clone(),
            comparator: spec.comparator.clone(),
            adapts: spec.adapts,
            task_encoders: task_encoders.clone(),
            response_encoders: response_encoders.clone(),
            rows: Vec::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Score a prediction against this handler's target column and
    /// append the result row.
    pub fn record(&mut self, model_name: &str, trial: &Trial, prediction: &Value) -> Result<()> {
        let item = &trial.item;
        let target = trial
            .target(&self.column)
            .expect("target columns validated at load time");

        let score =
            self.comparator
                .compare(prediction, target, item.response_type, &item.choices)?;

        let task_enc = match self.task_encoders.get(&item.domain) {
            Some(encoder) => Some(
                encoder
                    .encode_task(&item.task)
                    .map_err(|e| BenchError::Encoding(e.to_string()))?,
            ),
            None => None,
        };

        let (truth_enc, prediction_enc) = self.encode_responses(trial, prediction)?;

        self.rows.push(ResultRow {
            model: model_name.to_string(),
            id: item.identifier.clone(),
            domain: item.domain.clone(),
            response_type: item.response_type,
            sequence: item.sequence_number,
            task: item.task_str.clone(),
            choices: item.choices_str.clone(),
            truth: encode(target),
            prediction: encode(prediction),
            score,
            task_enc,
            truth_enc,
            prediction_enc,
        });
        Ok(())
    }

    /// Diagnostic response encodings, following the response-type rules:
    /// verification items pair the encoded choice with the value,
    /// multiple-choice items join the sorted per-option encodings.
    fn encode_responses(
        &self,
        trial: &Trial,
        prediction: &Value,
    ) -> Result<(Option<String>, Option<String>)> {
        let item = &trial.item;
        let Some(encoder) = self.response_encoders.get(&item.domain) else {
            return Ok((None, None));
        };
        let target = trial
            .target(&self.column)
            .expect("target columns validated at load time");

        match item.response_type {
            ResponseType::Verify | ResponseType::Accept => {
                if item.choices.len() != 1 {
                    return Err(BenchError::Encoding(format!(
                        "response type '{}' allows exactly one choice, got {}",
                        item.response_type,
                        item.choices.len()
                    )));
                }
                let verification = encoder
                    .encode_response(&item.choices[0], &item.task)
                    .map_err(|e| BenchError::Encoding(e.to_string()))?;
                Ok((
                    Some(format!("{};{}", verification, encode(target))),
                    Some(format!("{};{}", verification, encode(prediction))),
                ))
            }
            ResponseType::MultipleChoice => {
                let Value::List(predicted) = prediction else {
                    return Err(BenchError::Encoding(format!(
                        "multiple-choice predictions must be a list of responses, got '{}'",
                        encode(prediction)
                    )));
                };
                let mut pred_encs = Vec::with_capacity(predicted.len());
                for option in predicted {
                    pred_encs.push(
                        encoder
                            .encode_response(option, &item.task)
                            .map_err(|e| BenchError::Encoding(e.to_string()))?,
                    );
                }
                pred_encs.sort();

                let mut truth_encs = Vec::new();
                for option in target.elements() {
                    truth_encs.push(
                        encoder
                            .encode_response(option, &item.task)
                            .map_err(|e| BenchError::Encoding(e.to_string()))?,
                    );
                }
                truth_encs.sort();

                Ok((Some(truth_encs.join("|")), Some(pred_encs.join("|"))))
            }
            _ => {
                let truth_enc = encoder
                    .encode_response(target, &item.task)
                    .map_err(|e| BenchError::Encoding(e.to_string()))?;
                let prediction_enc = encoder
                    .encode_response(prediction, &item.task)
                    .map_err(|e| BenchError::Encoding(e.to_string()))?;
                Ok((Some(truth_enc), Some(prediction_enc)))
            }
        }
    }

    /// Let the model observe the ground truth, if this handler adapts.
    pub fn adapt(&self, model: &mut dyn CognitiveModel, trial: &Trial) -> Result<()> {
        if !self.adapts {
            return Ok(());
        }
        let target = trial
            .target(&self.column)
            .expect("target columns validated at load time");
        model
            .adapt(&trial.item, target, &trial.aux)
            .map_err(BenchError::Model)
    }

    /// Consume the handler, yielding its column name and rows.
    pub fn into_rows(self) -> (String, Vec<ResultRow>) {
        (self.column, self.rows)
    }
}
