//! Squared difference comparator.

use crate::compare::absdiff::numeric_operand;
use crate::compare::Comparator;
use crate::domain::error::ComparisonError;
use crate::domain::item::ResponseType;
use crate::domain::value::Value;

/// Squared numeric distance between un-nested operands.
pub struct SquaredDiffComparator;

impl Comparator for SquaredDiffComparator {
    fn name(&self) -> &str {
        "Squared Difference"
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
        Ok((a - b) * (a - b))
    }
}
