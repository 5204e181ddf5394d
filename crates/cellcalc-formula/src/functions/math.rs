//! Math functions

use super::criteria::CriteriaMatcher;
use super::statistical::flatten_numbers;
use super::{first_error, number_arg, try_arg};
use crate::error::FormulaResult;
use crate::value::CalcValue;
use cellcalc_core::CellError;

/// Largest digit count ROUND applies; beyond this the number is returned unchanged
const MAX_ROUND_DIGITS: i32 = 15;

/// SUM(value1, ...)
pub fn fn_sum(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    Ok(CalcValue::Number(flatten_numbers(args).iter().sum()))
}

/// SUMIF(range, criteria, [sum_range])
///
/// Positions beyond the shorter of `range` and `sum_range` are ignored.
pub fn fn_sumif(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let (range, criteria, sum_range) = match args {
        [range, criteria] => (range, criteria, range),
        [range, criteria, sum_range] => (range, criteria, sum_range),
        _ => return Ok(CalcValue::Error(CellError::Value)),
    };

    let matcher = CriteriaMatcher::new(criteria);
    let sum = range
        .elements()
        .zip(sum_range.elements())
        .filter(|(item, _)| !item.is_error() && matcher.matches(item))
        .filter_map(|(_, value)| value.as_number())
        .sum();

    Ok(CalcValue::Number(sum))
}

/// ROUND(number, num_digits)
///
/// Ties round away from zero. Negative digit counts round to the left of the
/// decimal point.
pub fn fn_round(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let number = try_arg!(number_arg(args, 0));
    let digits = try_arg!(number_arg(args, 1)).trunc();

    if digits > MAX_ROUND_DIGITS as f64 {
        return Ok(CalcValue::Number(number));
    }
    let digits = digits.max(-(MAX_ROUND_DIGITS as f64)) as i32;

    // Beyond 1e16 an f64 carries no fractional digits to round
    let multiplier = 10_f64.powi(digits);
    let scaled = number * multiplier;
    if number.abs() >= 1e16 || !scaled.is_finite() {
        return Ok(CalcValue::Number(number));
    }
    Ok(CalcValue::Number(scaled.round() / multiplier))
}

/// ABS(number)
pub fn fn_abs(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let number = try_arg!(number_arg(args, 0));
    Ok(CalcValue::Number(number.abs()))
}

/// SQRT(number)
pub fn fn_sqrt(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    let number = try_arg!(number_arg(args, 0));
    if number < 0.0 {
        return Ok(CalcValue::Error(CellError::Num));
    }
    Ok(CalcValue::Number(number.sqrt()))
}

/// MOD(number, divisor)
///
/// The result takes the sign of the divisor.
pub fn fn_mod(args: &[CalcValue]) -> FormulaResult<CalcValue> {
    if let Some(e) = first_error(args) {
        return Ok(CalcValue::Error(e));
    }

    let number = try_arg!(number_arg(args, 0));
    let divisor = try_arg!(number_arg(args, 1));

    if divisor == 0.0 {
        return Ok(CalcValue::Error(CellError::Div0));
    }

    Ok(CalcValue::Number(number - divisor * (number / divisor).floor()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> CalcValue {
        CalcValue::Number(n)
    }

    #[test]
    fn test_sum_ignores_errors_in_ranges() {
        let args = vec![
            CalcValue::List(vec![num(10.0), CalcValue::Error(CellError::Ref), num(20.0)]),
            num(1.5),
        ];
        assert_eq!(fn_sum(&args).unwrap(), num(31.5));
        assert_eq!(fn_sum(&[]).unwrap(), num(0.0));
    }

    #[test]
    fn test_sumif() {
        let range = CalcValue::List(vec![num(10.0), num(20.0), num(10.0)]);
        assert_eq!(
            fn_sumif(&[range.clone(), num(10.0)]).unwrap(),
            num(20.0)
        );
        assert_eq!(fn_sumif(&[range, ">=20".into()]).unwrap(), num(20.0));
    }

    #[test]
    fn test_sumif_with_sum_range() {
        let range = CalcValue::List(vec!["a".into(), "b".into(), "a".into(), "a".into()]);
        let sum_range = CalcValue::List(vec![num(1.0), num(2.0), "x".into()]);

        // The fourth position has no partner and the third is not numeric
        assert_eq!(
            fn_sumif(&[range, "a".into(), sum_range]).unwrap(),
            num(1.0)
        );
    }

    #[test]
    fn test_sumif_skips_error_items() {
        let range = CalcValue::List(vec![CalcValue::Error(CellError::Div0), num(5.0)]);
        let sum_range = CalcValue::List(vec![num(100.0), num(1.0)]);
        assert_eq!(
            fn_sumif(&[range, "#DIV/0!".into(), sum_range]).unwrap(),
            num(0.0)
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(fn_round(&[num(2.5), num(0.0)]).unwrap(), num(3.0));
        assert_eq!(fn_round(&[num(-2.5), num(0.0)]).unwrap(), num(-3.0));
        assert_eq!(fn_round(&[num(3.14159), num(2.0)]).unwrap(), num(3.14));
        assert_eq!(fn_round(&[num(1234.5), num(-2.0)]).unwrap(), num(1200.0));
        assert_eq!(fn_round(&[num(1.25), num(1.9)]).unwrap(), num(1.3));
        assert_eq!(fn_round(&[num(0.1), num(20.0)]).unwrap(), num(0.1));
    }

    #[test]
    fn test_round_large_numbers_unchanged() {
        assert_eq!(fn_round(&[num(1e300), num(10.0)]).unwrap(), num(1e300));
        assert_eq!(fn_round(&[num(-1e300), num(15.0)]).unwrap(), num(-1e300));
        assert_eq!(fn_round(&[num(1e16), num(0.0)]).unwrap(), num(1e16));
        assert_eq!(fn_round(&[num(1e200), num(-3.0)]).unwrap(), num(1e200));
    }

    #[test]
    fn test_round_errors() {
        assert_eq!(
            fn_round(&["x".into(), num(1.0)]).unwrap(),
            CalcValue::Error(CellError::Value)
        );
        assert_eq!(
            fn_round(&[num(1.0), CalcValue::Error(CellError::Na)]).unwrap(),
            CalcValue::Error(CellError::Na)
        );
    }

    #[test]
    fn test_abs_sqrt() {
        assert_eq!(fn_abs(&[num(-4.0)]).unwrap(), num(4.0));
        assert_eq!(fn_sqrt(&[num(16.0)]).unwrap(), num(4.0));
        assert_eq!(
            fn_sqrt(&[num(-1.0)]).unwrap(),
            CalcValue::Error(CellError::Num)
        );
        assert_eq!(
            fn_abs(&[CalcValue::Error(CellError::Ref)]).unwrap(),
            CalcValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_mod_follows_divisor_sign() {
        assert_eq!(fn_mod(&[num(-3.0), num(2.0)]).unwrap(), num(1.0));
        assert_eq!(fn_mod(&[num(3.0), num(-2.0)]).unwrap(), num(-1.0));
        assert_eq!(fn_mod(&[num(7.0), num(3.0)]).unwrap(), num(1.0));
        assert_eq!(
            fn_mod(&[num(5.0), num(0.0)]).unwrap(),
            CalcValue::Error(CellError::Div0)
        );
    }
}
