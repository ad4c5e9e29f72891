//! Task item container.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::codec::{parse_choices, parse_task};
use crate::domain::error::DataError;
use crate::domain::value::Value;

/// The kind of answer a task expects from the reasoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseType {
    SingleChoice,
    Verify,
    Accept,
    MultipleChoice,
}

impl ResponseType {
    /// Parse the dataset string form (`single-choice`, `verify`, `accept`,
    /// `multiple-choice`).
    pub fn parse(raw: &str) -> Result<ResponseType, DataError> {
        match raw {
            "single-choice" => Ok(ResponseType::SingleChoice),
            "verify" => Ok(ResponseType::Verify),
            "accept" => Ok(ResponseType::Accept),
            "multiple-choice" => Ok(ResponseType::MultipleChoice),
            _ => Err(DataError::UnknownResponseType {
                value: raw.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::SingleChoice => "single-choice",
            ResponseType::Verify => "verify",
            ResponseType::Accept => "accept",
            ResponseType::MultipleChoice => "multiple-choice",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reasoning task instance presented to a model.
///
/// Immutable once constructed. Models receive `&Item`, so a model cannot
/// mutate engine state through the item it is handed.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Participant identifier.
    pub identifier: String,

    /// Task domain (e.g., `syllogistic`).
    pub domain: String,

    /// Task in nested value representation.
    pub task: Value,

    /// Task in tuple-string representation.
    pub task_str: String,

    /// Expected response kind.
    pub response_type: ResponseType,

    /// Response options in nested value representation.
    pub choices: Vec<Value>,

    /// Response options in tuple-string representation.
    pub choices_str: String,

    /// Position of the task within the participant's session.
    pub sequence_number: i64,
}

impl Item {
    /// Construct an item from the dataset's string encodings.
    pub fn new(
        identifier: &str,
        domain: &str,
        task: &str,
        response_type: ResponseType,
        choices: &str,
        sequence_number: i64,
    ) -> Item {
        Item {
            identifier: identifier.to_string(),
            domain: domain.to_string(),
            task: parse_task(task),
            task_str: task.to_string(),
            response_type,
            choices: parse_choices(choices),
            choices_str: choices.to_string(),
            sequence_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::encode;

    #[test]
    fn test_response_type_parse() {
        assert_eq!(
            ResponseType::parse("single-choice").unwrap(),
            ResponseType::SingleChoice
        );
        assert_eq!(
            ResponseType::parse("multiple-choice").unwrap(),
            ResponseType::MultipleChoice
        );
        assert!(ResponseType::parse("free-text").is_err());
    }

    #[test]
    fn test_response_type_round_trip() {
        for rt in [
            ResponseType::SingleChoice,
            ResponseType::Verify,
            ResponseType::Accept,
            ResponseType::MultipleChoice,
        ] {
            assert_eq!(ResponseType::parse(rt.as_str()).unwrap(), rt);
        }
    }

    #[test]
    fn test_item_parses_task_and_choices() {
        let item = Item::new(
            "s1",
            "syllogistic",
            "All;a;b/Some;b;c",
            ResponseType::SingleChoice,
            "All;a;c|Some;a;c|NVC",
            3,
        );

        assert_eq!(item.task.elements().len(), 2);
        assert_eq!(item.choices.len(), 3);
        assert_eq!(encode(&item.task), item.task_str);
        assert_eq!(item.sequence_number, 3);
    }
}
