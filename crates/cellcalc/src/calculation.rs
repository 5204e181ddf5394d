//! Cell store plus formula engine
//!
//! # Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut calc = CalcEngine::new();
//! calc.set_value("A1", 10.0);
//! calc.set_value("A2", 20.0);
//!
//! assert_eq!(calc.evaluate("=A1 + A2").unwrap(), CalcValue::Number(30.0));
//! ```

use crate::{
    CalcValue, CellSource, CellValue, EvaluationOptions, FormulaEngine, FormulaResult, Sheet,
};

/// A cell store wired to a formula engine
///
/// Formulas are evaluated on demand against the current cell values; nothing is
/// stored or recalculated automatically.
#[derive(Debug, Default)]
pub struct CalcEngine {
    sheet: Sheet,
    engine: FormulaEngine,
}

impl CalcEngine {
    /// Create an engine with an empty sheet and the built-in functions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom evaluation options
    pub fn with_options(options: EvaluationOptions) -> Self {
        Self {
            sheet: Sheet::new(),
            engine: FormulaEngine::with_options(options),
        }
    }

    /// Set a cell value (case-insensitive address)
    ///
    /// Setting [`CellValue::Empty`] unsets the cell.
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) {
        self.sheet.set_value(address, value);
    }

    /// Get a cell value, `None` if it was never set
    pub fn get_value(&self, address: &str) -> Option<&CellValue> {
        self.sheet.get_value(address)
    }

    /// Evaluate a formula, with or without a leading `=`
    ///
    /// Only malformed formula text is an `Err`; spreadsheet errors such as
    /// `#DIV/0!` come back as [`CalcValue::Error`].
    pub fn evaluate(&mut self, formula: &str) -> FormulaResult<CalcValue> {
        self.engine.evaluate(formula, &self.sheet)
    }

    /// Evaluate a formula against another cell source, reusing this engine's
    /// functions and AST cache
    pub fn evaluate_with(&mut self, formula: &str, cells: &dyn CellSource) -> FormulaResult<CalcValue> {
        self.engine.evaluate(formula, cells)
    }

    /// Register a custom function for all subsequent evaluations
    pub fn register_function<F>(&mut self, name: &str, implementation: F)
    where
        F: Fn(&[CalcValue]) -> FormulaResult<CalcValue> + Send + Sync + 'static,
    {
        self.engine.register_function(name, implementation);
    }

    /// Remove all cell values
    ///
    /// Cached formulas and registered functions are kept.
    pub fn clear(&mut self) {
        log::debug!("clearing {} cells", self.sheet.len());
        self.sheet.clear();
    }

    /// Drop the parsed-formula cache
    pub fn clear_cache(&mut self) {
        self.engine.clear_cache();
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FormulaEngine {
        &mut self.engine
    }
}
