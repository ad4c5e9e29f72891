//! Absolute difference comparator.

use crate::compare::Comparator;
use crate::domain::codec::{encode, unnest};
use crate::domain::error::ComparisonError;
use crate::domain::item::ResponseType;
use crate::domain::value::Value;

/// Absolute numeric distance between un-nested operands. Text operands
/// are coerced to floats; anything non-numeric is a comparison error.
pub struct AbsDiffComparator;

pub(crate) fn numeric_operand(value: &Value, comparator: &str) -> Result<f64, ComparisonError> {
    let inner = unnest(value);
    match inner {
        Value::Atom(atom) => atom.as_f64().ok_or_else(|| ComparisonError::NotNumeric {
            comparator: comparator.to_string(),
            value: encode(inner),
        }),
        Value::List(_) => Err(ComparisonError::NotNumeric {
            comparator: comparator.to_string(),
            value: encode(inner),
        }),
    }
}

impl Comparator for AbsDiffComparator {
    fn name(&self) -> &str {
        "Absolute Difference"
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

        let a = numeric_operand(prediction, self.name())?;
        let b = numeric_operand(target, self.name())?;
        Ok((a - b).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::parse_response;
    use crate::domain::value::Atom;

    #[test]
    fn test_numeric_distance() {
        let a = Value::Atom(Atom::Int(3));
        let b = Value::Atom(Atom::Int(5));
        let score = AbsDiffComparator
            .compare(&a, &b, ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 2.0);
    }

    #[test]
    fn test_unnests_and_coerces_text() {
        // "7" arrives nested from the response parser.
        let a = parse_response("7", ResponseType::SingleChoice);
        let b = Value::Atom(Atom::Float(4.5));
        let score = AbsDiffComparator
            .compare(&a, &b, ResponseType::SingleChoice, &[])
            .unwrap();
        assert_eq!(score, 2.5);
    }

    #[test]
    fn test_non_numeric_operand_is_error() {
        let a = parse_response("NVC", ResponseType::SingleChoice);
        let b = Value::Atom(Atom::Int(1));
        let err = AbsDiffComparator
            .compare(&a, &b, ResponseType::SingleChoice, &[])
            .unwrap_err();
        assert!(matches!(err, ComparisonError::NotNumeric { .. }));
    }

    #[test]
    fn test_rejects_multiple_choice() {
        let a = Value::Atom(Atom::Int(1));
        let err = AbsDiffComparator
            .compare(&a, &a.clone(), ResponseType::MultipleChoice, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::UnsupportedResponseType { .. }
        ));
    }
}
