//! # cellcalc
//!
//! An embeddable spreadsheet formula engine.
//!
//! cellcalc evaluates Excel-style formulas (`=SUM(A1:A3)*2`, `=IF(A1>5,"Big","Small")`)
//! against an in-memory, address-keyed cell store.
//!
//! ## Features
//!
//! - Arithmetic, comparison and `&` concatenation with spreadsheet coercion rules
//! - Cell and rectangular range references
//! - In-band error values (`#DIV/0!`, `#REF!`, `#NAME?`, ...)
//! - Built-in math, statistical, logical, text and information functions
//! - Custom functions registered at runtime
//! - Parsed formulas are cached by text
//!
//! ## Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut calc = CalcEngine::new();
//! calc.set_value("A1", 10.0);
//! calc.set_value("A3", 20.0);
//!
//! assert_eq!(calc.evaluate("=SUM(A1:A3)").unwrap(), CalcValue::Number(30.0));
//! assert_eq!(calc.evaluate("=A2").unwrap(), CalcValue::Error(CellError::Ref));
//!
//! calc.register_function("TRIPLE", |args| {
//!     let n = args.first().and_then(CalcValue::as_number).unwrap_or(0.0);
//!     Ok(CalcValue::Number(n * 3.0))
//! });
//! assert_eq!(calc.evaluate("=TRIPLE(A1)").unwrap(), CalcValue::Number(30.0));
//! ```

pub mod calculation;
pub mod prelude;

pub use calculation::CalcEngine;

// Re-export core types
pub use cellcalc_core::{
    CellAddress, CellError, CellRange, CellSource, CellValue, Error, Result, Sheet,
};

// Re-export formula types
pub use cellcalc_formula::{
    evaluate, parse, parse_formula, tokenize, BinaryOperator, CalcValue, EvaluationContext,
    EvaluationOptions, FormulaEngine, FormulaError, FormulaExpr, FormulaResult, FunctionDef,
    FunctionRegistry, MissingCellPolicy, Token, TokenKind, UnaryOperator,
};
