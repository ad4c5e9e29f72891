//! Syllogistic domain helpers.
//!
//! Encodes tasks to mood/figure identifiers (`AA1`…`OO4`, figures per
//! Khemlani et al., 2012) and responses to quantifier/direction
//! identifiers (`Aac`…`Oca`, plus the reserved `NVC`).

use std::collections::BTreeSet;

use anyhow::{anyhow, bail};

use cogbench_core::{encode, ResponseEncoder, TaskEncoder, Value};

/// The 64 syllogistic task identifiers, premise moods × figure.
pub const SYLLOGISMS: [&str; 64] = [
    "AA1", "AA2", "AA3", "AA4", "AI1", "AI2", "AI3", "AI4", "AE1", "AE2", "AE3", "AE4", "AO1",
    "AO2", "AO3", "AO4", "IA1", "IA2", "IA3", "IA4", "II1", "II2", "II3", "II4", "IE1", "IE2",
    "IE3", "IE4", "IO1", "IO2", "IO3", "IO4", "EA1", "EA2", "EA3", "EA4", "EI1", "EI2", "EI3",
    "EI4", "EE1", "EE2", "EE3", "EE4", "EO1", "EO2", "EO3", "EO4", "OA1", "OA2", "OA3", "OA4",
    "OI1", "OI2", "OI3", "OI4", "OE1", "OE2", "OE3", "OE4", "OO1", "OO2", "OO3", "OO4",
];

/// The 9 syllogistic response identifiers.
pub const RESPONSES: [&str; 9] = [
    "Aac", "Aca", "Iac", "Ica", "Eac", "Eca", "Oac", "Oca", "NVC",
];

fn quantifier_letter(raw: &str) -> anyhow::Result<char> {
    match raw {
        "All" => Ok('A'),
        "Some" => Ok('I'),
        "No" => Ok('E'),
        "Some not" => Ok('O'),
        _ => Err(anyhow!("unknown quantifier: {raw}")),
    }
}

fn quantifier_word(letter: char) -> anyhow::Result<&'static str> {
    match letter {
        'A' => Ok("All"),
        'I' => Ok("Some"),
        'E' => Ok("No"),
        'O' => Ok("Some not"),
        _ => Err(anyhow!("unknown quantifier letter: {letter}")),
    }
}

fn clause_terms(clause: &Value) -> anyhow::Result<Vec<String>> {
    let terms: Vec<String> = clause
        .elements()
        .iter()
        .map(|term| encode(term))
        .collect();
    if terms.len() < 3 {
        bail!("premise needs a quantifier and two terms, got '{}'", encode(clause));
    }
    Ok(terms)
}

/// Encode a syllogistic task to its mood/figure identifier (e.g. `AA1`).
pub fn encode_task(task: &Value) -> anyhow::Result<String> {
    let premises = task.elements();
    if premises.len() != 2 {
        bail!("syllogistic tasks have two premises, got '{}'", encode(task));
    }
    let first = clause_terms(&premises[0])?;
    let second = clause_terms(&premises[1])?;

    let quant1 = quantifier_letter(&first[0])?;
    let quant2 = quantifier_letter(&second[0])?;

    let figure = if first[1] == second[1] {
        4
    } else if first[2] == second[1] {
        1
    } else if first[2] == second[2] {
        3
    } else if first[1] == second[2] {
        2
    } else {
        bail!("could not determine figure of '{}'", encode(task));
    };

    Ok(format!("{}{}{}", quant1, quant2, figure))
}

/// First clause of a response, tolerating the singly- and doubly-nested
/// forms models produce.
fn response_clause(response: &Value) -> anyhow::Result<Vec<String>> {
    let inner = match response {
        Value::Atom(_) => return Ok(vec![encode(response)]),
        Value::List(items) => match items.first() {
            None => bail!("empty response"),
            Some(Value::List(_)) => &items[0],
            Some(Value::Atom(_)) => response,
        },
    };
    Ok(inner.elements().iter().map(encode).collect())
}

/// Encode a syllogistic response to its identifier (e.g. `Aac`), with
/// `NVC` passing through.
pub fn encode_response(response: &Value, task: &Value) -> anyhow::Result<String> {
    let clause = response_clause(response)?;
    if clause.first().map(|s| s.as_str()) == Some("NVC") {
        return Ok("NVC".to_string());
    }
    if clause.len() < 3 {
        bail!("conclusion needs a quantifier and two terms");
    }

    let premises = task.elements();
    if premises.len() != 2 {
        bail!("syllogistic tasks have two premises, got '{}'", encode(task));
    }
    let first: BTreeSet<String> = clause_terms(&premises[0])?[1..].iter().cloned().collect();
    let second: BTreeSet<String> = clause_terms(&premises[1])?[1..].iter().cloned().collect();
    let object_a: Vec<&String> = first.difference(&second).collect();
    let Some(object_a) = object_a.first() else {
        bail!("could not isolate the end terms of '{}'", encode(task));
    };

    let quant = quantifier_letter(&clause[0])?;
    let direction = if clause[1] == **object_a { "ac" } else { "ca" };
    Ok(format!("{}{}", quant, direction))
}

/// Decode a response identifier back to its nested value, inserting the
/// task's end terms.
pub fn decode_response(identifier: &str, task: &Value) -> anyhow::Result<Value> {
    if identifier == "NVC" {
        return Ok(Value::List(vec![Value::terms(&["NVC"])]));
    }
    let mut chars = identifier.chars();
    let letter = chars
        .next()
        .ok_or_else(|| anyhow!("empty response identifier"))?;
    let quant = quantifier_word(letter)?;
    let direction: String = chars.collect();

    let premises = task.elements();
    if premises.len() != 2 {
        bail!("syllogistic tasks have two premises, got '{}'", encode(task));
    }
    let first: BTreeSet<String> = clause_terms(&premises[0])?[1..].iter().cloned().collect();
    let second: BTreeSet<String> = clause_terms(&premises[1])?[1..].iter().cloned().collect();
    let object_a = first
        .difference(&second)
        .next()
        .ok_or_else(|| anyhow!("could not isolate end term a"))?
        .clone();
    let object_c = second
        .difference(&first)
        .next()
        .ok_or_else(|| anyhow!("could not isolate end term c"))?
        .clone();

    let (subject, object) = if direction == "ac" {
        (object_a, object_c)
    } else {
        (object_c, object_a)
    };
    Ok(Value::List(vec![Value::terms(&[
        quant,
        subject.as_str(),
        object.as_str(),
    ])]))
}

/// Position of a task identifier within [`SYLLOGISMS`].
pub fn syllogism_index(identifier: &str) -> Option<usize> {
    SYLLOGISMS.iter().position(|s| *s == identifier)
}

/// Position of a response identifier within [`RESPONSES`].
pub fn response_index(identifier: &str) -> Option<usize> {
    RESPONSES.iter().position(|r| *r == identifier)
}

/// Diagnostic task encoder for the syllogistic domain.
pub struct SyllogisticTaskEncoder;

impl TaskEncoder for SyllogisticTaskEncoder {
    fn name(&self) -> &str {
        "Syllogistic"
    }

    fn encode_task(&self, task: &Value) -> anyhow::Result<String> {
        encode_task(task)
    }
}

/// Diagnostic response encoder for the syllogistic domain.
pub struct SyllogisticResponseEncoder;

impl ResponseEncoder for SyllogisticResponseEncoder {
    fn name(&self) -> &str {
        "Syllogistic"
    }

    fn encode_response(&self, response: &Value, task: &Value) -> anyhow::Result<String> {
        encode_response(response, task)
    }
}
