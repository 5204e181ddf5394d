//! Information functions
//!
//! These inspect their argument directly, so an error argument is a value to
//! test rather than something to propagate.

use crate::error::FormulaResult;
use crate::value::CalcValue;
use cellcalc_core::CellError;

fn predicate(args: &[CalcValue], pred: impl Fn(&CalcValue) -> bool) -> FormulaResult<CalcValue> {
    match args {
        [value] => Ok(CalcValue::Boolean(pred(value))),
        _ => Ok(CalcValue::Error(CellError::Value)),
    }
}

/// ISERROR(value)
pub fn fn_iserror(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    predicate(args, CalcValue::is_error)
}

/// ISNA(value)
pub fn fn_isna(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    predicate(args, |v| matches!(v, CalcValue::Error(CellError::Na)))
}

/// ISNUMBER(value)
pub fn fn_isnumber(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    predicate(args, |v| matches!(v, CalcValue::Number(_)))
}

/// ISTEXT(value)
pub fn fn_istext(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    predicate(args, |v| matches!(v, CalcValue::Text(_)))
}

/// ISLOGICAL(value)
pub fn fn_islogical(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    predicate(args, |v| matches!(v, CalcValue::Boolean(_)))
}

/// NA()
pub fn fn_na(_args: &[CalcValue]) -> FormulaResult<CalcValue> {
    Ok(CalcValue::Error(CellError::Na))
}
