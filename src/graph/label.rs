//! Node and edge labels
//!
//! A label set maps keys to [`LabelValue`]s. Edge label sets always carry a
//! numeric [`WEIGHT_KEY`] entry; [`with_weight`] is the single place where
//! that entry is checked and filled in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reserved edge label holding the edge weight
pub const WEIGHT_KEY: &str = "weight";

pub type LabelMap = HashMap<String, LabelValue>;

/// A single label value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<LabelValue>),
}

impl LabelValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LabelValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as an edge weight. Only integers and floats qualify.
    pub fn as_weight(&self) -> Option<f64> {
        match *self {
            LabelValue::Integer(n) => Some(n as f64),
            LabelValue::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Text(text) => write!(f, "{:?}", text),
            LabelValue::Integer(n) => write!(f, "{}", n),
            LabelValue::Float(x) => write!(f, "{}", x),
            LabelValue::Boolean(b) => write!(f, "{}", b),
            LabelValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for LabelValue {
    fn from(text: &str) -> Self {
        LabelValue::Text(text.to_owned())
    }
}

macro_rules! label_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for LabelValue {
            fn from(value: $source) -> Self {
                LabelValue::$variant(value.into())
            }
        })*
    };
}

label_from! {
    String => Text,
    i64 => Integer,
    i32 => Integer,
    f64 => Float,
    bool => Boolean,
    Vec<LabelValue> => List,
}

/// Build a fresh [`LabelMap`] from key/value pairs
pub fn labels<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> LabelMap
where
    K: Into<String>,
    V: Into<LabelValue>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Label map holding only a weight
pub fn weighted(weight: f64) -> LabelMap {
    labels([(WEIGHT_KEY, weight)])
}

/// Weight stored in an edge label set, if it is numeric
pub fn weight_of(labels: &LabelMap) -> Option<f64> {
    labels.get(WEIGHT_KEY)?.as_weight()
}

/// Copy `labels` for use on an edge, filling a missing weight with `default`.
///
/// Fails with the offending value when the weight entry is not numeric.
pub fn with_weight(labels: &LabelMap, default: f64) -> Result<LabelMap, LabelValue> {
    let mut resolved = labels.clone();
    match resolved.get(WEIGHT_KEY) {
        Some(value) if value.as_weight().is_none() => return Err(value.clone()),
        Some(_) => {}
        None => {
            resolved.insert(WEIGHT_KEY.to_owned(), LabelValue::Float(default));
        }
    }
    Ok(resolved)
}
