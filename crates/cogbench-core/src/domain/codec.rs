//! Tuple-string codec.
//!
//! Serializes nested [`Value`] trees with three separators: `;` joins the
//! deepest list level (clause terms), `/` the next level (alternative
//! clauses), and `|` the outermost level (alternatives of a
//! multiple-choice set). Alternatives at the `|` level are sorted on
//! encode, so decoding reconstructs a value up to outer-level ordering.
//!
//! Comparators operate on the encoded strings and never decode back to
//! structure, which sidesteps the ambiguity introduced by the sort.

use crate::domain::value::Value;

enum Enc {
    Str(String),
    List(Vec<Enc>),
}

fn to_enc(value: &Value) -> Enc {
    match value {
        Value::Atom(atom) => Enc::Str(atom.to_string()),
        Value::List(items) => Enc::List(items.iter().map(to_enc).collect()),
    }
}

/// One bottom-up pass: lists whose first element is already a string are
/// collapsed into a single `sep`-joined string; deeper lists recurse.
fn join_deepest(enc: Enc, sep: char) -> Enc {
    match enc {
        Enc::Str(s) => Enc::Str(s),
        Enc::List(items) => {
            let deepest = matches!(items.first(), None | Some(Enc::Str(_)));
            if deepest {
                let joined = items
                    .into_iter()
                    .map(|item| flatten(item, sep))
                    .collect::<Vec<_>>()
                    .join(&sep.to_string());
                Enc::Str(joined)
            } else {
                Enc::List(items.into_iter().map(|item| join_deepest(item, sep)).collect())
            }
        }
    }
}

fn flatten(enc: Enc, sep: char) -> String {
    match enc {
        Enc::Str(s) => s,
        Enc::List(items) => items
            .into_iter()
            .map(|item| flatten(item, sep))
            .collect::<Vec<_>>()
            .join(&sep.to_string()),
    }
}

/// Encode a nested value into its tuple-string form.
///
/// Singleton-nested values collapse: `[[x]]` encodes identically to `[x]`.
pub fn encode(value: &Value) -> String {
    let enc = to_enc(value);
    let enc = join_deepest(enc, ';');
    let enc = join_deepest(enc, '/');
    match enc {
        Enc::Str(s) => s,
        Enc::List(items) => {
            let mut options: Vec<String> =
                items.into_iter().map(|item| flatten(item, '|')).collect();
            options.sort();
            options.join("|")
        }
    }
}

/// Parse a task string (`;` terms, `/` clauses) into its nested value.
/// Empty clause segments are dropped.
pub fn parse_task(raw: &str) -> Value {
    Value::List(
        raw.split('/')
            .filter(|clause| !clause.is_empty())
            .map(parse_clause)
            .collect(),
    )
}

/// Parse a choices string into the list of selectable options.
pub fn parse_choices(raw: &str) -> Vec<Value> {
    raw.split('|').map(parse_option).collect()
}

/// Parse a response string according to the response type. Types other
/// than `multiple-choice` keep only the first `|`-level option.
pub fn parse_response(raw: &str, response_type: crate::domain::ResponseType) -> Value {
    let mut options: Vec<Value> = raw.split('|').map(parse_option).collect();
    if response_type == crate::domain::ResponseType::MultipleChoice {
        Value::List(options)
    } else {
        options.remove(0)
    }
}

fn parse_option(raw: &str) -> Value {
    Value::List(raw.split('/').map(parse_clause).collect())
}

fn parse_clause(raw: &str) -> Value {
    Value::List(raw.split(';').map(Value::text).collect())
}

/// Strip single-element wrapper lists until a non-singleton or non-list
/// value remains.
pub fn unnest(value: &Value) -> &Value {
    let mut current = value;
    loop {
        match current {
            Value::List(items) if items.len() == 1 => current = &items[0],
            _ => return current,
        }
    }
}
