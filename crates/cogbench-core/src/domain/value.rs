//! Nested task/response value representation.
//!
//! Tasks and responses are variable-depth nested lists of scalar atoms.
//! Atom coercion follows the preference order bool > int > float > text,
//! so the CSV cell `"3"` becomes an integer and `"True"` a boolean.

use std::fmt;

/// A scalar leaf of a task or response value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Atom {
    /// Coerce a raw string into the most specific atom type.
    ///
    /// Preference order: bool > int > float > text.
    pub fn coerce(raw: &str) -> Atom {
        match raw {
            "True" => return Atom::Bool(true),
            "False" => return Atom::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Atom::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Atom::Float(f);
        }
        Atom::Text(raw.to_string())
    }

    /// Numeric view of the atom, when one exists. Text is re-parsed so
    /// that values like `"3.5"` compare numerically.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Atom::Int(i) => Some(*i as f64),
            Atom::Float(f) => Some(*f),
            Atom::Text(s) => s.parse::<f64>().ok(),
            Atom::Bool(_) => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Bool(true) => write!(f, "True"),
            Atom::Bool(false) => write!(f, "False"),
            Atom::Int(i) => write!(f, "{}", i),
            // Keep a trailing ".0" on whole floats so coercion round-trips.
            Atom::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Atom::Float(x) => write!(f, "{}", x),
            Atom::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A recursively nested ordered list of atoms.
///
/// Depth carries grouping semantics: clause terms at the deepest level,
/// alternative clauses above them, and alternative options of a
/// multiple-choice set at the outermost level.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Atom(Atom),
    List(Vec<Value>),
}

impl Value {
    /// Convenience constructor for a leaf value.
    pub fn text(s: &str) -> Value {
        Value::Atom(Atom::coerce(s))
    }

    /// Convenience constructor for a list of leaf values.
    pub fn terms(terms: &[&str]) -> Value {
        Value::List(terms.iter().map(|t| Value::text(t)).collect())
    }

    /// Whether this value is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// The list elements, or an empty slice for atoms.
    pub fn elements(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            Value::Atom(_) => &[],
        }
    }
}

impl From<Atom> for Value {
    fn from(atom: Atom) -> Self {
        Value::Atom(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_preference_order() {
        assert_eq!(Atom::coerce("True"), Atom::Bool(true));
        assert_eq!(Atom::coerce("False"), Atom::Bool(false));
        assert_eq!(Atom::coerce("42"), Atom::Int(42));
        assert_eq!(Atom::coerce("-7"), Atom::Int(-7));
        assert_eq!(Atom::coerce("3.5"), Atom::Float(3.5));
        assert_eq!(Atom::coerce("NVC"), Atom::Text("NVC".to_string()));
    }

    #[test]
    fn test_display_round_trips_coercion() {
        for raw in ["True", "False", "42", "3.5", "3.0", "NVC"] {
            let atom = Atom::coerce(raw);
            assert_eq!(Atom::coerce(&atom.to_string()), atom, "raw input {raw}");
        }
    }

    #[test]
    fn test_whole_float_keeps_decimal_point() {
        assert_eq!(Atom::Float(3.0).to_string(), "3.0");
        assert_eq!(Atom::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Atom::Int(3).as_f64(), Some(3.0));
        assert_eq!(Atom::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Atom::Text("4.5".to_string()).as_f64(), Some(4.5));
        assert_eq!(Atom::Text("NVC".to_string()).as_f64(), None);
        assert_eq!(Atom::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_terms_constructor() {
        let v = Value::terms(&["All", "A", "B"]);
        assert_eq!(
            v,
            Value::List(vec![
                Value::Atom(Atom::Text("All".to_string())),
                Value::Atom(Atom::Text("A".to_string())),
                Value::Atom(Atom::Text("B".to_string())),
            ])
        );
    }
}
