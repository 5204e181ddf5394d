//! Values produced during formula evaluation

use cellcalc_core::{CellError, CellValue};
use std::fmt;

/// Result of evaluating a formula or sub-expression
///
/// `List` only appears as the direct result of a range reference and is never
/// nested. `Empty` is the "no value" marker: it coerces to `0` and renders as
/// empty text, but is distinct from `Text("")`.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(CellError),
    List(Vec<CalcValue>),
    Empty,
}

impl CalcValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CalcValue::Text(s.into())
    }

    /// Numeric coercion
    ///
    /// Booleans become `1`/`0`, text is parsed as a decimal number, `Empty` is `0`.
    /// Errors, lists and non-numeric text fail.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CalcValue::Number(n) => Some(*n),
            CalcValue::Boolean(true) => Some(1.0),
            CalcValue::Boolean(false) => Some(0.0),
            CalcValue::Text(s) => parse_number(s),
            CalcValue::Empty => Some(0.0),
            CalcValue::Error(_) | CalcValue::List(_) => None,
        }
    }

    /// Boolean coercion: booleans as-is, anything numeric is true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CalcValue::Boolean(b) => Some(*b),
            other => other.as_number().map(|n| n != 0.0),
        }
    }

    /// Textual form used by concatenation, comparison fallback and text functions
    pub fn as_text(&self) -> String {
        match self {
            CalcValue::Number(n) => n.to_string(),
            CalcValue::Text(s) => s.clone(),
            CalcValue::Boolean(true) => "TRUE".to_string(),
            CalcValue::Boolean(false) => "FALSE".to_string(),
            CalcValue::Error(e) => e.to_string(),
            CalcValue::Empty => String::new(),
            CalcValue::List(items) => {
                let parts: Vec<String> = items.iter().map(CalcValue::as_text).collect();
                format!("{{{}}}", parts.join(","))
            }
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, CalcValue::Error(_))
    }

    /// Get the error if this is one
    pub fn error(&self) -> Option<CellError> {
        match self {
            CalcValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Check for the "no value" marker
    pub fn is_empty(&self) -> bool {
        matches!(self, CalcValue::Empty)
    }

    /// Iterate over the elements of a list, or over the value itself for scalars
    pub fn elements(&self) -> std::slice::Iter<'_, CalcValue> {
        match self {
            CalcValue::List(items) => items.iter(),
            scalar => std::slice::from_ref(scalar).iter(),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for CalcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<CellValue> for CalcValue {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => CalcValue::Empty,
            CellValue::Number(n) => CalcValue::Number(n),
            CellValue::String(s) => CalcValue::Text(s),
            CellValue::Boolean(b) => CalcValue::Boolean(b),
            CellValue::Error(e) => CalcValue::Error(e),
        }
    }
}

impl From<f64> for CalcValue {
    fn from(n: f64) -> Self {
        CalcValue::Number(n)
    }
}

impl From<bool> for CalcValue {
    fn from(b: bool) -> Self {
        CalcValue::Boolean(b)
    }
}

impl From<&str> for CalcValue {
    fn from(s: &str) -> Self {
        CalcValue::Text(s.to_string())
    }
}

impl From<String> for CalcValue {
    fn from(s: String) -> Self {
        CalcValue::Text(s)
    }
}

impl From<CellError> for CalcValue {
    fn from(e: CellError) -> Self {
        CalcValue::Error(e)
    }
}
