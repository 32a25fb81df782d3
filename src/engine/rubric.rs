//! Typed read access over untyped rubric records
//!
//! Rubrics stay as raw JSON so they can be reported verbatim. `RubricView`
//! reads the conventional fields without validating them: anything missing
//! or of the wrong type simply reads as `None`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

lazy_static! {
    static ref JUDGEMENT_KEY: Regex = Regex::new(r"^model(\d+)_judgement$").unwrap();
}

/// Borrowed view of one element of a document's `rubrics` array
#[derive(Debug, Clone, Copy)]
pub struct RubricView<'a> {
    fields: Option<&'a Map<String, Value>>,
}

/// One model's verdict on a rubric
#[derive(Debug, Clone, PartialEq)]
pub struct Judgement<'a> {
    /// Model name derived from the field, e.g. `model1`
    pub model: String,
    /// Numeric suffix of the field, used for ordering
    pub index: u64,
    pub score: Option<&'a Value>,
    pub reason: Option<&'a str>,
}

impl Judgement<'_> {
    /// A score passes when it equals 1 (numerically or as `true`)
    pub fn passed(&self) -> bool {
        self.score.is_some_and(score_is_pass)
    }
}

impl<'a> RubricView<'a> {
    pub fn new(rubric: &'a Value) -> Self {
        Self {
            fields: rubric.as_object(),
        }
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    /// Grouping key used for label distributions.
    ///
    /// Strings are used as-is, numbers and booleans by their JSON text.
    /// Null and container labels cannot act as a bucket key.
    pub fn label(&self) -> Option<String> {
        match self.get("label")? {
            Value::String(label) => Some(label.clone()),
            scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
            _ => None,
        }
    }

    pub fn sub_label(&self) -> Option<&'a str> {
        self.get("sub_label").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.get("description").and_then(Value::as_str)
    }

    /// Numeric weight; non-numeric values read as absent
    pub fn weight(&self) -> Option<Decimal> {
        match self.get("weight")? {
            Value::Number(number) => decimal_from_number(number),
            _ => None,
        }
    }

    /// Every `modelN_judgement` object on the rubric, ordered by N
    pub fn judgements(&self) -> Vec<Judgement<'a>> {
        let Some(fields) = self.fields else {
            return Vec::new();
        };

        let mut judgements: Vec<Judgement<'a>> = fields
            .iter()
            .filter_map(|(key, value)| {
                let captures = JUDGEMENT_KEY.captures(key)?;
                let index = captures[1].parse::<u64>().ok()?;
                let body = value.as_object()?;
                Some(Judgement {
                    model: key.trim_end_matches("_judgement").to_string(),
                    index,
                    score: body.get("score"),
                    reason: body.get("reason").and_then(Value::as_str),
                })
            })
            .collect();

        judgements.sort_by_key(|judgement| judgement.index);
        judgements
    }
}

fn score_is_pass(score: &Value) -> bool {
    match score {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Exact decimal value of a JSON number, read from its literal text.
///
/// Numbers outside the decimal range read as absent.
fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
