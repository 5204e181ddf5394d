//! # cellcalc-formula
//!
//! Formula parser and evaluator for cellcalc.
//!
//! This crate provides:
//! - Tokenizing (text → tokens)
//! - Formula parsing (tokens → AST)
//! - Formula evaluation (AST → value) against any [`CellSource`](cellcalc_core::CellSource)
//! - A case-insensitive function registry seeded with built-in functions
//! - [`FormulaEngine`], which caches parsed formulas
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::Sheet;
//! use cellcalc_formula::{evaluate, parse_formula, CalcValue, EvaluationContext, FunctionRegistry};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value("A1", 10.0);
//! sheet.set_value("A3", 20.0);
//!
//! let registry = FunctionRegistry::new();
//! let ctx = EvaluationContext::new(&sheet, &registry);
//!
//! let ast = parse_formula("=SUM(A1:A3)").unwrap();
//! assert_eq!(evaluate(&ast, &ctx), CalcValue::Number(30.0));
//! ```

pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use engine::FormulaEngine;
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext, EvaluationOptions, MissingCellPolicy};
pub use functions::{FunctionDef, FunctionRegistry};
pub use lexer::tokenize;
pub use parser::{parse, parse_formula};
pub use token::{Token, TokenKind};
pub use value::CalcValue;
