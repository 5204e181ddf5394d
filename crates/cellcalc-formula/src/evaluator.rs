//! Formula evaluator
//!
//! Walks a formula AST and produces a [`CalcValue`]. Evaluation never fails:
//! spreadsheet errors travel in-band as [`CalcValue::Error`].

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::FormulaError;
use crate::functions::FunctionRegistry;
use crate::value::CalcValue;
use cellcalc_core::{CellAddress, CellError, CellRange, CellSource};
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};

/// What an unset single-cell reference evaluates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCellPolicy {
    /// `#REF!`
    #[default]
    RefError,
    /// The "no value" marker, which reads as `0` or empty text
    Empty,
}

/// Evaluation settings
///
/// Missing cells inside a range are always `#REF!` elements regardless of
/// `missing_cell`; aggregates skip them anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub missing_cell: MissingCellPolicy,
}

impl EvaluationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for unset single-cell references
    pub fn missing_cell(mut self, policy: MissingCellPolicy) -> Self {
        self.missing_cell = policy;
        self
    }
}

/// Context for formula evaluation
pub struct EvaluationContext<'a> {
    /// Cell values
    pub cells: &'a dyn CellSource,
    /// Functions callable from formulas
    pub registry: &'a FunctionRegistry,
    pub options: EvaluationOptions,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context with default options
    pub fn new(cells: &'a dyn CellSource, registry: &'a FunctionRegistry) -> Self {
        Self {
            cells,
            registry,
            options: EvaluationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// Get a single cell value, applying the missing-cell policy
    pub fn get_cell_value(&self, address: &str) -> CalcValue {
        match self.cells.cell(address) {
            Some(value) => value.into(),
            None => match self.options.missing_cell {
                MissingCellPolicy::RefError => CalcValue::Error(CellError::Ref),
                MissingCellPolicy::Empty => CalcValue::Empty,
            },
        }
    }

    /// Get a range of cell values as a row-major list
    ///
    /// A corner that is not a valid address makes the whole range `#REF!`; an unset
    /// cell becomes a `#REF!` element.
    pub fn get_range_values(&self, start: &str, end: &str) -> CalcValue {
        let range = match (CellAddress::parse(start), CellAddress::parse(end)) {
            (Ok(a), Ok(b)) => CellRange::new(a, b),
            _ => return CalcValue::Error(CellError::Ref),
        };

        let values = range
            .cells()
            .map(|addr| {
                self.cells
                    .cell(&addr.to_a1_string())
                    .map_or(CalcValue::Error(CellError::Ref), CalcValue::from)
            })
            .collect();

        CalcValue::List(values)
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> CalcValue {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => CalcValue::Number(*n),
        FormulaExpr::Text(s) => CalcValue::Text(s.clone()),

        // === References ===
        FormulaExpr::CellRef(address) => ctx.get_cell_value(address),
        FormulaExpr::Range { start, end } => ctx.get_range_values(start, end),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),
        FormulaExpr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, ctx),

        // === Functions ===
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Evaluate a binary operation
///
/// An error on the left stops evaluation before the right operand is visited.
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &EvaluationContext,
) -> CalcValue {
    let left_val = evaluate(left, ctx);
    if left_val.is_error() {
        return left_val;
    }

    let right_val = evaluate(right, ctx);
    if right_val.is_error() {
        return right_val;
    }

    if op == BinaryOperator::Concat {
        return CalcValue::Text(left_val.as_text() + &right_val.as_text());
    }

    if op.is_comparison() {
        let ordering = compare_values(&left_val, &right_val);
        let result = match op {
            BinaryOperator::Equal => ordering == Ordering::Equal,
            BinaryOperator::NotEqual => ordering != Ordering::Equal,
            BinaryOperator::LessThan => ordering == Ordering::Less,
            BinaryOperator::LessEqual => ordering != Ordering::Greater,
            BinaryOperator::GreaterThan => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        };
        return CalcValue::Boolean(result);
    }

    // Lists fail numeric coercion, so arithmetic on a range is #VALUE!
    let (l, r) = match (left_val.as_number(), right_val.as_number()) {
        (Some(l), Some(r)) => (l, r),
        _ => return CalcValue::Error(CellError::Value),
    };

    match op {
        BinaryOperator::Add => CalcValue::Number(l + r),
        BinaryOperator::Subtract => CalcValue::Number(l - r),
        BinaryOperator::Multiply => CalcValue::Number(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                CalcValue::Error(CellError::Div0)
            } else {
                CalcValue::Number(l / r)
            }
        }
        BinaryOperator::Power => CalcValue::Number(l.powf(r)),
        _ => CalcValue::Error(CellError::Value),
    }
}

/// Compare two values: numerically when both coerce, otherwise by upper-cased
/// text using ordinal ordering
fn compare_values(left: &CalcValue, right: &CalcValue) -> Ordering {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => compare_numbers(l, r),
        _ => left
            .as_text()
            .to_uppercase()
            .cmp(&right.as_text().to_uppercase()),
    }
}

/// NaN sorts below every number and equals only itself
fn compare_numbers(l: f64, r: f64) -> Ordering {
    match (l.is_nan(), r.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
    }
}

/// Evaluate a unary operation
fn evaluate_unary_op(op: UnaryOperator, operand: &FormulaExpr, ctx: &EvaluationContext) -> CalcValue {
    let val = evaluate(operand, ctx);

    // Propagate errors
    if val.is_error() {
        return val;
    }

    let n = match val.as_number() {
        Some(n) => n,
        None => return CalcValue::Error(CellError::Value),
    };

    match op {
        UnaryOperator::Negate => CalcValue::Number(-n),
        UnaryOperator::Plus => CalcValue::Number(n),
    }
}

/// Evaluate a function call
///
/// Every argument is evaluated, errors included; the function decides what to do
/// with them.
fn evaluate_function(name: &str, args: &[FormulaExpr], ctx: &EvaluationContext) -> CalcValue {
    let evaluated_args: Vec<CalcValue> = args.iter().map(|arg| evaluate(arg, ctx)).collect();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        ctx.registry.call(name, &evaluated_args)
    }));

    match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(FormulaError::UnknownFunction(_))) => CalcValue::Error(CellError::Name),
        Ok(Err(err @ FormulaError::ArgumentCount { .. })) => {
            log::debug!("{}", err);
            CalcValue::Error(CellError::Value)
        }
        Ok(Err(err)) => {
            log::warn!("function {} failed: {}", name, err);
            CalcValue::Error(CellError::Value)
        }
        Err(_) => {
            log::warn!("function {} panicked", name);
            CalcValue::Error(CellError::Value)
        }
    }
}
