//! Statistical functions

use super::criteria::CriteriaMatcher;
use crate::error::FormulaResult;
use crate::value::CalcValue;
use cellcalc_core::CellError;

/// Collect every numerically-coercible element across scalar and list arguments
///
/// Elements that fail coercion (errors, non-numeric text) are skipped rather than
/// propagated, so a missing cell inside a range contributes nothing.
pub fn flatten_numbers(args: &[CalcValue]) -> Vec<f64> {
    args.iter()
        .flat_map(CalcValue::elements)
        .filter_map(CalcValue::as_number)
        .collect()
}

/// AVERAGE(value1, ...)
pub fn fn_average(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let nums = flatten_numbers(args);
    if nums.is_empty() {
        return Ok(CalcValue::Error(CellError::Div0));
    }

    let sum: f64 = nums.iter().sum();
    Ok(CalcValue::Number(sum / nums.len() as f64))
}

/// MIN(value1, ...)
pub fn fn_min(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let min = flatten_numbers(args).into_iter().reduce(f64::min);
    Ok(CalcValue::Number(min.unwrap_or(0.0)))
}

/// MAX(value1, ...)
pub fn fn_max(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let max = flatten_numbers(args).into_iter().reduce(f64::max);
    Ok(CalcValue::Number(max.unwrap_or(0.0)))
}

/// COUNT(value1, ...)
pub fn fn_count(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    Ok(CalcValue::Number(flatten_numbers(args).len() as f64))
}

/// COUNTIF(range, criteria)
///
/// A scalar first argument is treated as a one-element range. Error elements never
/// match.
pub fn fn_countif(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let (range, criteria) = match args {
        [range, criteria] => (range, criteria),
        _ => return Ok(CalcValue::Error(CellError::Value)),
    };

    let matcher = CriteriaMatcher::new(criteria);
    let count = range
        .elements()
        .filter(|item| !item.is_error())
        .filter(|item| matcher.matches(item))
        .count();

    Ok(CalcValue::Number(count as f64))
}
