//! Equality comparator.

use std::collections::BTreeSet;

use crate::compare::Comparator;
use crate::domain::codec::encode;
use crate::domain::error::ComparisonError;
use crate::domain::item::ResponseType;
use crate::domain::value::Value;

/// Scores 1.0 when the encoded strings match, 0.0 otherwise. For
/// `multiple-choice` items the score is the fraction of choices whose
/// membership (selected or not) agrees between prediction and target.
pub struct EqualityComparator;

fn option_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::List(options) => options.iter().map(encode).collect(),
        Value::Atom(_) => std::iter::once(encode(value)).collect(),
    }
}

impl Comparator for EqualityComparator {
    fn name(&self) -> &str {
        "Accuracy"
    }

    fn compare(
        &self,
        prediction: &Value,
        target: &Value,
        response_type: ResponseType,
        choices: &[Value],
    ) -> Result<f64, ComparisonError> {
        if response_type == ResponseType::MultipleChoice {
            if choices.is_empty() {
                return Ok(1.0);
            }
            let predicted = option_set(prediction);
            let truth = option_set(target);
            let agreements = choices
                .iter()
                .map(encode)
                .filter(|choice| predicted.contains(choice) == truth.contains(choice))
                .count();
            return Ok(agreements as f64 / choices.len() as f64);
        }

        Ok(if encode(prediction) == encode(target) {
            1.0
        } else {
            0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::{parse_choices, parse_response};

    #[test]
    fn test_identical_single_choice_scores_one() {
        let value = parse_response("All;a;c", ResponseType::SingleChoice);
        let choices = parse_choices("All;a;c|NVC");
        let score = EqualityComparator
            .compare(&value, &value.clone(), ResponseType::SingleChoice, &choices)
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_mismatch_scores_zero() {
        let prediction = parse_response("NVC", ResponseType::SingleChoice);
        let target = parse_response("All;a;c", ResponseType::SingleChoice);
        let choices = parse_choices("All;a;c|NVC");
        let score = EqualityComparator
            .compare(&prediction, &target, ResponseType::SingleChoice, &choices)
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_singleton_nesting_is_equal() {
        let flat = Value::terms(&["NVC"]);
        let nested = Value::List(vec![Value::terms(&["NVC"])]);
        let score = EqualityComparator
            .compare(&nested, &flat, ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_multiple_choice_membership_fraction() {
        let choices = parse_choices("All;a;c|Some;a;c|No;a;c|NVC");
        // Prediction selects {All, Some}; truth selects {All, NVC}.
        // Agreement on All (both in) and No (both out): 2 of 4.
        let prediction = parse_response("All;a;c|Some;a;c", ResponseType::MultipleChoice);
        let target = parse_response("All;a;c|NVC", ResponseType::MultipleChoice);
        let score = EqualityComparator
            .compare(&prediction, &target, ResponseType::MultipleChoice, &choices)
            .unwrap();
        assert_eq!(score, 0.5);
    }

    #[test]
    fn test_multiple_choice_full_agreement() {
        let choices = parse_choices("All;a;c|NVC");
        let value = parse_response("NVC", ResponseType::MultipleChoice);
        let score = EqualityComparator
            .compare(&value, &value.clone(), ResponseType::MultipleChoice, &choices)
            .unwrap();
        assert_eq!(score, 1.0);
    }
}
