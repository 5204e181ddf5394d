//! Tests for formula evaluation through the CalcEngine facade

use cellcalc::prelude::*;
use pretty_assertions::assert_eq;

fn num(n: f64) -> CalcValue {
    CalcValue::Number(n)
}

fn engine_with(cells: &[(&str, f64)]) -> CalcEngine {
    let mut calc = CalcEngine::new();
    for (addr, value) in cells {
        calc.set_value(addr, *value);
    }
    calc
}

/// Test basic arithmetic and precedence
#[test]
fn test_evaluate_simple_formulas() {
    let mut calc = CalcEngine::new();

    assert_eq!(calc.evaluate("=1 + 2").unwrap(), num(3.0));
    assert_eq!(calc.evaluate("=1 + 2 * 3").unwrap(), num(7.0));
    assert_eq!(calc.evaluate("=(1 + 2) * 3").unwrap(), num(9.0));
    assert_eq!(calc.evaluate("=5 / 2").unwrap(), num(2.5));
    assert_eq!(calc.evaluate("1+1").unwrap(), num(2.0));
}

/// Test cell references, including case-insensitive lookup
#[test]
fn test_evaluate_with_cell_references() {
    let mut calc = engine_with(&[("A1", 10.0), ("B1", 20.0)]);

    assert_eq!(calc.evaluate("=A1 + B1").unwrap(), num(30.0));
    assert_eq!(calc.evaluate("=A1 * B1").unwrap(), num(200.0));

    calc.set_value("a2", 10);
    assert_eq!(calc.evaluate("=A2").unwrap(), num(10.0));
    assert_eq!(calc.evaluate("=a2").unwrap(), num(10.0));
}

/// Test nested parentheses with references
#[test]
fn test_nested_parentheses() {
    let mut calc = engine_with(&[("A1", 1.0), ("B1", 2.0), ("C1", 3.0), ("D1", 4.0)]);
    assert_eq!(calc.evaluate("=((A1 + B1) * (C1 - D1))").unwrap(), num(-3.0));
}

/// Test missing references and their propagation
#[test]
fn test_missing_cell_reference() {
    let mut calc = CalcEngine::new();

    let result = calc.evaluate("=A1").unwrap();
    assert_eq!(result, CalcValue::Error(CellError::Ref));
    assert_eq!(result.to_string(), "#REF!");

    let result = calc.evaluate("=A1 + 1").unwrap();
    assert_eq!(result.to_string(), "#REF!");
}

/// Test the alternative missing-cell behaviour
#[test]
fn test_missing_cell_as_empty() {
    let options = EvaluationOptions::new().missing_cell(MissingCellPolicy::Empty);
    let mut calc = CalcEngine::with_options(options);

    assert_eq!(calc.evaluate("=A1 + 1").unwrap(), num(1.0));
    assert_eq!(calc.evaluate("=A1 & \"x\"").unwrap(), CalcValue::text("x"));
    assert_eq!(calc.evaluate("=A1").unwrap().to_string(), "");
}

/// Test division by zero
#[test]
fn test_division_by_zero() {
    let mut calc = CalcEngine::new();
    let result = calc.evaluate("=1 / 0").unwrap();
    assert_eq!(result.to_string(), "#DIV/0!");
}

/// Test aggregate functions over ranges
#[test]
fn test_functions() {
    let mut calc = engine_with(&[("A1", 10.0), ("A2", 20.0), ("A3", 30.0)]);

    assert_eq!(calc.evaluate("=SUM(A1:A3)").unwrap(), num(60.0));
    assert_eq!(calc.evaluate("=AVERAGE(A1:A3)").unwrap(), num(20.0));
    assert_eq!(calc.evaluate("=MAX(A1:A3)").unwrap(), num(30.0));
    assert_eq!(calc.evaluate("=MIN(A1:A3)").unwrap(), num(10.0));
    assert_eq!(calc.evaluate("=COUNT(A1:A3)").unwrap(), num(3.0));
}

/// Test that a gap in a range does not disturb aggregates
#[test]
fn test_range_with_gap() {
    let mut calc = engine_with(&[("A1", 10.0), ("A3", 20.0)]);
    assert_eq!(calc.evaluate("=SUM(A1:A3)").unwrap(), num(30.0));
    assert_eq!(calc.evaluate("=COUNT(A3:A1)").unwrap(), num(2.0));
}

/// Test two-dimensional ranges
#[test]
fn test_rectangular_range() {
    let mut calc = engine_with(&[("A1", 1.0), ("B1", 2.0), ("A2", 3.0), ("B2", 4.0)]);
    assert_eq!(calc.evaluate("=SUM(A1:B2)").unwrap(), num(10.0));
    assert_eq!(calc.evaluate("=CONCATENATE(A1:B2)").unwrap(), CalcValue::text("1234"));
}

/// Test text concatenation
#[test]
fn test_string_concatenation() {
    let mut calc = CalcEngine::new();
    calc.set_value("A1", "Hello");
    calc.set_value("B1", "World");

    assert_eq!(calc.evaluate("=A1 & B1").unwrap(), CalcValue::text("HelloWorld"));
    assert_eq!(
        calc.evaluate("=A1 & \" \" & B1").unwrap(),
        CalcValue::text("Hello World")
    );
    assert_eq!(calc.evaluate("=A1 & C9").unwrap(), CalcValue::Error(CellError::Ref));
}

/// Test logical functions
#[test]
fn test_logic() {
    let mut calc = engine_with(&[("A1", 10.0)]);

    assert_eq!(
        calc.evaluate("=IF(A1 > 5, \"Big\", \"Small\")").unwrap(),
        CalcValue::text("Big")
    );
    assert_eq!(
        calc.evaluate("=IF(A1 < 5, \"Big\", \"Small\")").unwrap(),
        CalcValue::text("Small")
    );
    assert_eq!(
        calc.evaluate("=AND(A1 > 5, A1 < 20)").unwrap(),
        CalcValue::Boolean(true)
    );
    assert_eq!(calc.evaluate("=NOT(OR(A1 = 1, A1 = 2))").unwrap(), CalcValue::Boolean(true));
}

/// Test criteria functions
#[test]
fn test_countif_sumif() {
    let mut calc = engine_with(&[("A1", 10.0), ("A2", 20.0), ("A3", 10.0)]);

    assert_eq!(calc.evaluate("=COUNTIF(A1:A3, 10)").unwrap(), num(2.0));
    assert_eq!(calc.evaluate("=COUNTIF(A1:A3, \">15\")").unwrap(), num(1.0));
    assert_eq!(calc.evaluate("=SUMIF(A1:A3, 10)").unwrap(), num(20.0));

    calc.set_value("B1", 1);
    calc.set_value("B2", 2);
    calc.set_value("B3", 3);
    assert_eq!(calc.evaluate("=SUMIF(A1:A3, \"<>20\", B1:B3)").unwrap(), num(4.0));
}

/// Test MOD sign convention
#[test]
fn test_mod() {
    let mut calc = CalcEngine::new();
    assert_eq!(calc.evaluate("=MOD(-3, 2)").unwrap(), num(1.0));
    assert_eq!(calc.evaluate("=MOD(3, -2)").unwrap(), num(-1.0));
    assert_eq!(calc.evaluate("=MOD(5, 0)").unwrap().to_string(), "#DIV/0!");
}

/// Test text functions
#[test]
fn test_text_functions() {
    let mut calc = CalcEngine::new();
    calc.set_value("A1", "  Hello   World ");

    assert_eq!(calc.evaluate("=TRIM(A1)").unwrap(), CalcValue::text("Hello World"));
    assert_eq!(calc.evaluate("=LEN(TRIM(A1))").unwrap(), num(11.0));
    assert_eq!(calc.evaluate("=UPPER(LEFT(TRIM(A1), 5))").unwrap(), CalcValue::text("HELLO"));
    assert_eq!(calc.evaluate("=MID(\"abcdef\", 3, 2)").unwrap(), CalcValue::text("cd"));
    assert_eq!(calc.evaluate("=RIGHT(\"abc\", -1)").unwrap().to_string(), "#VALUE!");
}

/// Test custom function registration
#[test]
fn test_custom_function_registration() {
    let mut calc = CalcEngine::new();
    calc.set_value("A1", 5);

    calc.register_function("TRIPLE", |args| {
        let n = args.first().and_then(CalcValue::as_number).unwrap_or(0.0);
        Ok(CalcValue::Number(n * 3.0))
    });
    assert_eq!(calc.evaluate("=TRIPLE(A1)").unwrap(), num(15.0));

    // Last registration wins
    calc.register_function("triple", |_| Ok(CalcValue::text("replaced")));
    assert_eq!(calc.evaluate("=TRIPLE(A1)").unwrap(), CalcValue::text("replaced"));

    // Faults are isolated
    calc.register_function("BROKEN", |args| Ok(args[5].clone()));
    assert_eq!(calc.evaluate("=BROKEN()").unwrap(), CalcValue::Error(CellError::Value));
    assert_eq!(calc.evaluate("=IFERROR(BROKEN(), 0) + 1").unwrap(), num(1.0));
}

/// Test unknown functions
#[test]
fn test_unknown_function() {
    let mut calc = CalcEngine::new();
    assert_eq!(calc.evaluate("=FOO(1)").unwrap().to_string(), "#NAME?");
}

/// Test structural failures
#[test]
fn test_syntax_errors() {
    let mut calc = CalcEngine::new();

    for formula in ["=\"abc", "=1 +", "=SUM(1,)", "=1 $ 2", "=(1", "=1 2"] {
        let err = calc.evaluate(formula).unwrap_err();
        assert!(err.is_syntax(), "{} gave {:?}", formula, err);
    }
}

/// Test empty formulas
#[test]
fn test_empty_formula() {
    let mut calc = CalcEngine::new();
    assert_eq!(calc.evaluate("").unwrap(), CalcValue::Empty);
    assert_eq!(calc.evaluate("  ").unwrap(), CalcValue::Empty);
    assert_ne!(calc.evaluate("").unwrap(), CalcValue::text(""));
}

/// Test that repeated evaluation is stable and hits the cache
#[test]
fn test_idempotent_evaluation() {
    let mut calc = engine_with(&[("A1", 3.0), ("A2", 4.0)]);
    let formula = "=SQRT(A1^2 + A2^2) & \" units\"";

    let first = calc.evaluate(formula).unwrap();
    let second = calc.evaluate(formula).unwrap();
    assert_eq!(first, CalcValue::text("5 units"));
    assert_eq!(first, second);
    assert_eq!(calc.engine().cached_formulas(), 1);

    calc.clear_cache();
    assert_eq!(calc.evaluate(formula).unwrap(), first);
}

/// Test the column codec across the whole column space
#[test]
fn test_column_codec_round_trip() {
    for n in 1..=16384 {
        let letters = CellAddress::column_to_letters(n);
        assert_eq!(CellAddress::letters_to_column(&letters).unwrap(), n);
    }
    assert_eq!(CellAddress::column_to_letters(27), "AA");
    assert_eq!(CellAddress::column_to_letters(16384), "XFD");
}
