//! Criteria matching for SUMIF and COUNTIF
//!
//! A criteria value is taken in its text form and can be:
//! - A comparison expression: ">5", ">=10", "<100", "<=50", "<>0", "=5"
//! - Anything else: exact, case-sensitive match against the item's text form
//!
//! A comparison only applies when the remainder parses as a number and the item
//! coerces to one; otherwise matching falls back to exact text equality.

use crate::value::CalcValue;

/// Tolerance used for numeric equality
const EPSILON: f64 = 1e-9;

/// Criteria matcher for SUMIF/COUNTIF
#[derive(Debug, Clone)]
pub struct CriteriaMatcher {
    text: String,
    comparison: Option<(ComparisonOp, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl ComparisonOp {
    fn apply(self, item: f64, criteria: f64) -> bool {
        match self {
            ComparisonOp::Equal => (item - criteria).abs() < EPSILON,
            ComparisonOp::NotEqual => (item - criteria).abs() > EPSILON,
            ComparisonOp::LessThan => item < criteria,
            ComparisonOp::LessEqual => item <= criteria,
            ComparisonOp::GreaterThan => item > criteria,
            ComparisonOp::GreaterEqual => item >= criteria,
        }
    }
}

impl CriteriaMatcher {
    /// Create a new criteria matcher from an evaluated criteria argument
    pub fn new(criteria: &CalcValue) -> Self {
        let text = criteria.as_text();
        let comparison = Self::parse_comparison(&text);
        Self { text, comparison }
    }

    fn parse_comparison(s: &str) -> Option<(ComparisonOp, f64)> {
        // Longer operators first
        let (op, rest) = if let Some(rest) = s.strip_prefix(">=") {
            (ComparisonOp::GreaterEqual, rest)
        } else if let Some(rest) = s.strip_prefix("<=") {
            (ComparisonOp::LessEqual, rest)
        } else if let Some(rest) = s.strip_prefix("<>") {
            (ComparisonOp::NotEqual, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (ComparisonOp::GreaterThan, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (ComparisonOp::LessThan, rest)
        } else if let Some(rest) = s.strip_prefix('=') {
            (ComparisonOp::Equal, rest)
        } else {
            return None;
        };

        let n: f64 = rest.trim().parse().ok()?;
        n.is_finite().then_some((op, n))
    }

    /// Check if a value matches the criteria
    pub fn matches(&self, item: &CalcValue) -> bool {
        if let Some((op, criteria)) = self.comparison {
            if let Some(n) = item.as_number() {
                return op.apply(n, criteria);
            }
        }

        item.as_text() == self.text
    }
}
