//! No Valid Conclusion (NVC) comparator.

use crate::compare::Comparator;
use crate::domain::codec::encode;
use crate::domain::error::ComparisonError;
use crate::domain::item::ResponseType;
use crate::domain::value::Value;

/// Scores 1.0 only when prediction and target agree on whether the
/// response is the literal `NVC`. Supports point responses only.
pub struct NvcComparator;

impl Comparator for NvcComparator {
    fn name(&self) -> &str {
        "NVC Accuracy"
    }

    fn compare(
        &self,
        prediction: &Value,
        target: &Value,
        response_type: ResponseType,
        _choices: &[Value],
    ) -> Result<f64, ComparisonError> {
        if response_type == ResponseType::MultipleChoice {
            return Err(ComparisonError::UnsupportedResponseType {
                comparator: self.name().to_string(),
                response_type,
            });
        }

        let prediction_nvc = encode(prediction) == "NVC";
        let target_nvc = encode(target) == "NVC";
        Ok(if prediction_nvc == target_nvc { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::parse_response;

    #[test]
    fn test_both_nvc_agree() {
        let nvc = parse_response("NVC", ResponseType::SingleChoice);
        let score = NvcComparator
            .compare(&nvc, &nvc.clone(), ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_both_non_nvc_agree() {
        let a = parse_response("All;a;c", ResponseType::SingleChoice);
        let b = parse_response("Some;a;c", ResponseType::SingleChoice);
        let score = NvcComparator
            .compare(&a, &b, ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 1.0, "both non-NVC counts as agreement");
    }

    #[test]
    fn test_disagreement_scores_zero() {
        let nvc = parse_response("NVC", ResponseType::SingleChoice);
        let aac = parse_response("All;a;c", ResponseType::SingleChoice);
        let score = NvcComparator
            .compare(&nvc, &aac, ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_rejects_multiple_choice() {
        let nvc = parse_response("NVC", ResponseType::MultipleChoice);
        let err = NvcComparator
            .compare(&nvc, &nvc.clone(), ResponseType::MultipleChoice, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::UnsupportedResponseType { .. }
        ));
    }
}
