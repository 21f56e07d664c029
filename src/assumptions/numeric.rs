//! Lenient numeric fields for assumption records
//!
//! Underwriting inputs arrive from spreadsheets and forms, so a number may be a
//! JSON number, a numeric string, or `null`. Anything else is malformed.

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// A JSON value that should hold a number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Parse into a finite `f64`
    pub fn to_f64(&self) -> Result<f64, String> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("malformed numeric string {:?}", s))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("non-finite numeric value {}", value))
        }
    }

    /// Parse into an integer, truncating any fractional part toward zero
    pub fn to_i64(&self) -> Result<i64, String> {
        self.to_f64().map(|v| v.trunc() as i64)
    }
}

/// `Option<f64>`: absent or `null` is `None`
pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Numeric>::deserialize(deserializer)?
        .map(|v| v.to_f64().map_err(de::Error::custom))
        .transpose()
}

/// `Option<i64>`: absent or `null` is `None`
pub fn i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Numeric>::deserialize(deserializer)?
        .map(|v| v.to_i64().map_err(de::Error::custom))
        .transpose()
}

/// Numeric sequence, `null` entries are rejected
pub fn f64_seq_opt<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Numeric>>::deserialize(deserializer)?
        .map(|values| {
            values
                .iter()
                .map(|v| v.to_f64().map_err(de::Error::custom))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
}
