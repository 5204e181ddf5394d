//! AST-caching formula engine
//!
//! Owns a function registry and a memo table of parsed formulas. The table is
//! keyed by formula text with the optional leading `=` removed, has no eviction
//! and is only emptied by [`FormulaEngine::clear_cache`]. Cell data is passed in
//! per call, so changing cells never invalidates a cached AST.

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, EvaluationContext, EvaluationOptions};
use crate::functions::FunctionRegistry;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::value::CalcValue;
use ahash::AHashMap;
use cellcalc_core::CellSource;

/// Formula evaluation with parsed-AST caching
#[derive(Debug, Default)]
pub struct FormulaEngine {
    registry: FunctionRegistry,
    cache: AHashMap<String, FormulaExpr>,
    options: EvaluationOptions,
}

/// Trim and drop an optional leading `=`
fn normalize(formula: &str) -> &str {
    let formula = formula.trim();
    formula.strip_prefix('=').unwrap_or(formula).trim()
}

impl FormulaEngine {
    /// Create an engine with the built-in functions and default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Evaluate formula text against `cells`
    ///
    /// Empty or whitespace-only text evaluates to [`CalcValue::Empty`]. Malformed
    /// text is a [`FormulaError::Syntax`](crate::FormulaError::Syntax) error and is
    /// not cached.
    ///
    /// # Example
    /// ```rust
    /// use cellcalc_core::Sheet;
    /// use cellcalc_formula::{CalcValue, FormulaEngine};
    ///
    /// let mut sheet = Sheet::new();
    /// sheet.set_value("A1", 10.0);
    ///
    /// let mut engine = FormulaEngine::new();
    /// assert_eq!(engine.evaluate("=A1*2", &sheet).unwrap(), CalcValue::Number(20.0));
    /// assert_eq!(engine.evaluate("", &sheet).unwrap(), CalcValue::Empty);
    /// assert!(engine.evaluate("=1+", &sheet).is_err());
    /// ```
    pub fn evaluate(&mut self, formula: &str, cells: &dyn CellSource) -> FormulaResult<CalcValue> {
        let key = normalize(formula);
        if key.is_empty() {
            return Ok(CalcValue::Empty);
        }

        let ast = Self::lookup_or_parse(&mut self.cache, key)?;
        let ctx = EvaluationContext::new(cells, &self.registry).with_options(self.options.clone());
        Ok(evaluate(ast, &ctx))
    }

    /// Get the cached AST for `formula`, parsing and caching it on first use
    pub fn parse_cached(&mut self, formula: &str) -> FormulaResult<&FormulaExpr> {
        Self::lookup_or_parse(&mut self.cache, normalize(formula))
    }

    fn lookup_or_parse<'c>(
        cache: &'c mut AHashMap<String, FormulaExpr>,
        key: &str,
    ) -> FormulaResult<&'c FormulaExpr> {
        if cache.contains_key(key) {
            log::trace!("AST cache hit for {}", key);
        } else {
            log::debug!("AST cache miss for {}", key);
            let ast = parse(&tokenize(key)?)?;
            cache.insert(key.to_string(), ast);
        }

        // Present: either found above or just inserted
        Ok(&cache[key])
    }

    /// Register a custom variadic function, replacing any existing one
    pub fn register_function<F>(&mut self, name: &str, implementation: F)
    where
        F: Fn(&[CalcValue]) -> FormulaResult<CalcValue> + Send + Sync + 'static,
    {
        self.registry.register_fn(name, implementation);
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Drop every cached AST
    pub fn clear_cache(&mut self) {
        log::debug!("clearing {} cached formulas", self.cache.len());
        self.cache.clear();
    }

    /// Number of distinct formulas currently cached
    pub fn cached_formulas(&self) -> usize {
        self.cache.len()
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EvaluationOptions) {
        self.options = options;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use crate::evaluator::MissingCellPolicy;
    use crate::parser::parse_formula;
    use cellcalc_core::{CellError, Sheet};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_cache_keyed_without_equals_sign() {
        let sheet = Sheet::new();
        let mut engine = FormulaEngine::new();

        engine.evaluate("=1+2", &sheet).unwrap();
        engine.evaluate("1+2", &sheet).unwrap();
        engine.evaluate("  =1+2 ", &sheet).unwrap();
        assert_eq!(engine.cached_formulas(), 1);

        engine.evaluate("=1+3", &sheet).unwrap();
        assert_eq!(engine.cached_formulas(), 2);

        engine.clear_cache();
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_cached_result_tracks_cell_changes() {
        let mut sheet = Sheet::new();
        let mut engine = FormulaEngine::new();

        sheet.set_value("A1", 1.0);
        assert_eq!(engine.evaluate("=A1*10", &sheet).unwrap(), CalcValue::Number(10.0));

        sheet.set_value("A1", 2.0);
        assert_eq!(engine.evaluate("=A1*10", &sheet).unwrap(), CalcValue::Number(20.0));
        assert_eq!(engine.cached_formulas(), 1);
    }

    #[test]
    fn test_empty_formula() {
        let sheet = Sheet::new();
        let mut engine = FormulaEngine::new();

        assert_eq!(engine.evaluate("", &sheet).unwrap(), CalcValue::Empty);
        assert_eq!(engine.evaluate("   ", &sheet).unwrap(), CalcValue::Empty);
        assert_eq!(engine.evaluate("=", &sheet).unwrap(), CalcValue::Empty);
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_syntax_errors_are_not_cached() {
        let sheet = Sheet::new();
        let mut engine = FormulaEngine::new();

        let err = engine.evaluate("=\"abc", &sheet).unwrap_err();
        assert_eq!(err, FormulaError::syntax(0, "unterminated string literal"));
        assert!(engine.evaluate("=1 2", &sheet).unwrap_err().is_syntax());
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_parse_cached_matches_parser() {
        let mut engine = FormulaEngine::new();
        let ast = engine.parse_cached("=SUM(A1:A3)*2").unwrap().clone();
        assert_eq!(ast, parse_formula("=SUM(A1:A3)*2").unwrap());
        assert_eq!(engine.cached_formulas(), 1);
    }

    #[test]
    fn test_register_function() {
        let sheet = Sheet::new();
        let mut engine = FormulaEngine::new();

        assert_eq!(
            engine.evaluate("=TWICE(4)", &sheet).unwrap(),
            CalcValue::Error(CellError::Name)
        );

        // Registration takes effect for already-cached formulas
        engine.register_function("twice", |args| {
            let n = args.first().and_then(CalcValue::as_number).unwrap_or(0.0);
            Ok(CalcValue::Number(n * 2.0))
        });
        assert_eq!(engine.evaluate("=TWICE(4)", &sheet).unwrap(), CalcValue::Number(8.0));
        assert!(engine.registry().contains("TWICE"));
    }

    #[test]
    fn test_options() {
        let sheet = Sheet::new();
        let options = EvaluationOptions::new().missing_cell(MissingCellPolicy::Empty);
        let mut engine = FormulaEngine::with_options(options.clone());

        assert_eq!(engine.options(), &options);
        assert_eq!(engine.evaluate("=B7+1", &sheet).unwrap(), CalcValue::Number(1.0));

        engine.set_options(EvaluationOptions::default());
        assert_eq!(
            engine.evaluate("=B7+1", &sheet).unwrap(),
            CalcValue::Error(CellError::Ref)
        );
    }

    proptest! {
        #[test]
        fn cached_and_cold_evaluation_agree(a in -1000i32..1000, b in -1000i32..1000, op in 0usize..5) {
            let ops = ["+", "-", "*", "/", "&"];
            let formula = format!("=A1{}{}", ops[op], b);

            let mut sheet = Sheet::new();
            sheet.set_value("A1", a);

            let mut engine = FormulaEngine::new();
            let cold = engine.evaluate(&formula, &sheet).unwrap();
            let warm = engine.evaluate(&formula, &sheet).unwrap();

            let mut fresh = FormulaEngine::new();
            prop_assert_eq!(&cold, &warm);
            prop_assert_eq!(cold, fresh.evaluate(&formula, &sheet).unwrap());
        }
    }
}
