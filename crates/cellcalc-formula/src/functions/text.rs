//! Text functions
//!
//! Lengths and positions count characters, not bytes.

use super::{first_error, number_arg, text_arg, try_arg};
use crate::error::FormulaResult;
use crate::value::CalcValue;
use cellcalc_core::CellError;

/// Truncated character count argument; negative counts are `#VALUE!`
fn count_arg(args: &[CalcValue], index: usize) -> Result<usize, CellError> {
    let n = number_arg(args, index)?.trunc();
    if n < 0.0 {
        return Err(CellError::Value);
    }
    Ok(n as usize)
}

/// CONCATENATE(text1, ...)
///
/// List arguments contribute every element in order. The first error found is
/// returned.
pub fn fn_concatenate(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let mut result = String::new();

    for value in args.iter().flat_map(CalcValue::elements) {
        if let CalcValue::Error(e) = value {
            return Ok(CalcValue::Error(*e));
        }
        result.push_str(&value.as_text());
    }

    Ok(CalcValue::Text(result))
}

/// LEFT(text, num_chars)
pub fn fn_left(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let text = try_arg!(text_arg(args, 0));
    let count = try_arg!(count_arg(args, 1));

    Ok(CalcValue::Text(text.chars().take(count).collect()))
}

/// RIGHT(text, num_chars)
pub fn fn_right(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let text = try_arg!(text_arg(args, 0));
    let count = try_arg!(count_arg(args, 1));

    let len = text.chars().count();
    Ok(CalcValue::Text(
        text.chars().skip(len.saturating_sub(count)).collect(),
    ))
}

/// MID(text, start_num, num_chars)
///
/// `start_num` is 1-based; a start before the first character is clamped to it and
/// a start past the end yields empty text.
pub fn fn_mid(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let text = try_arg!(text_arg(args, 0));
    let start = try_arg!(number_arg(args, 1)).trunc() - 1.0;
    let count = try_arg!(count_arg(args, 2));

    let start = start.max(0.0) as usize;
    Ok(CalcValue::Text(text.chars().skip(start).take(count).collect()))
}

/// LEN(text)
pub fn fn_len(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let text = try_arg!(text_arg(args, 0));
    Ok(CalcValue::Number(text.chars().count() as f64))
}

/// UPPER(text)
pub fn fn_upper(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let text = try_arg!(text_arg(args, 0));
    Ok(CalcValue::Text(text.to_uppercase()))
}

/// LOWER(text)
pub fn fn_lower(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let text = try_arg!(text_arg(args, 0));
    Ok(CalcValue::Text(text.to_lowercase()))
}

/// TRIM(text) - strips both ends and collapses interior whitespace runs
pub fn fn_trim(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let text = try_arg!(text_arg(args, 0));
    Ok(CalcValue::Text(
        text.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}
