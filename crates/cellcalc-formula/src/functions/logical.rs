//! Logical functions

use super::{first_error, try_arg};
use crate::error::FormulaResult;
use crate::value::CalcValue;
use cellcalc_core::CellError;

fn truth(value: &CalcValue) -> Result<bool, CellError> {
    match value {
        CalcValue::Error(e) => Err(*e),
        other => other.as_bool().ok_or(CellError::Value),
    }
}

/// IF(condition, value_if_true, value_if_false)
///
/// The chosen branch is returned as-is.
pub fn fn_if(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let (condition, if_true, if_false) = match args {
        [condition, if_true, if_false] => (condition, if_true, if_false),
        _ => return Ok(CalcValue::Error(CellError::Value)),
    };

    if try_arg!(truth(condition)) {
        Ok(if_true.clone())
    } else {
        Ok(if_false.clone())
    }
}

/// AND(logical1, ...)
pub fn fn_and(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    for value in args.iter().flat_map(CalcValue::elements) {
        if !try_arg!(truth(value)) {
            return Ok(CalcValue::Boolean(false));
        }
    }
    Ok(CalcValue::Boolean(true))
}

/// OR(logical1, ...)
pub fn fn_or(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    for value in args.iter().flat_map(CalcValue::elements) {
        if try_arg!(truth(value)) {
            return Ok(CalcValue::Boolean(true));
        }
    }
    Ok(CalcValue::Boolean(false))
}

/// NOT(logical)
pub fn fn_not(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let value = match args {
        [value] => value,
        _ => return Ok(CalcValue::Error(CellError::Value)),
    };

    Ok(CalcValue::Boolean(!try_arg!(truth(value))))
}

/// IFERROR(value, value_if_error)
pub fn fn_iferror(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    match args {
        [value, fallback] if value.is_error() => Ok(fallback.clone()),
        [value, _] => Ok(value.clone()),
        _ => Ok(CalcValue::Error(CellError::Value)),
    }
}
