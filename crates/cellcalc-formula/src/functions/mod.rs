//! Function registry and built-in functions

pub mod criteria;
pub mod info;
pub mod logical;
pub mod math;
pub mod statistical;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use crate::value::CalcValue;
use ahash::AHashMap;
use cellcalc_core::CellError;
use std::fmt;

/// Function implementation signature
///
/// Arguments arrive already evaluated; a range argument is a [`CalcValue::List`].
/// In-band spreadsheet errors are returned as `Ok(CalcValue::Error(..))`. An `Err`
/// is a fault and is turned into `#VALUE!` by the evaluator.
pub type FunctionImpl = dyn Fn(&[CalcValue]) -> FormulaResult<CalcValue> + Send + Sync;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: String,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: Box<FunctionImpl>,
}

impl FunctionDef {
    pub fn new<F>(name: &str, min_args: usize, max_args: Option<usize>, implementation: F) -> Self
    where
        F: Fn(&[CalcValue]) -> FormulaResult<CalcValue> + Send + Sync + 'static,
    {
        Self {
            name: name.to_uppercase(),
            min_args,
            max_args,
            implementation: Box::new(implementation),
        }
    }

    /// Check an argument count against this definition
    pub fn check_arity(&self, actual: usize) -> FormulaResult<()> {
        if actual < self.min_args {
            return Err(FormulaError::ArgumentCount {
                function: self.name.clone(),
                expected: format!("at least {}", self.min_args),
                actual,
            });
        }

        if let Some(max) = self.max_args {
            if actual > max {
                return Err(FormulaError::ArgumentCount {
                    function: self.name.clone(),
                    expected: format!("at most {}", max),
                    actual,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Case-insensitive table of callable functions
///
/// Registering a name that already exists replaces the previous entry.
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register_math_functions();
        registry.register_statistical_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_info_functions();

        registry
    }

    /// Create a registry with no functions at all
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
        }
    }

    /// Register a function, replacing any existing entry with the same name
    pub fn register(&mut self, def: FunctionDef) {
        let key = def.name.to_uppercase();
        if let Some(previous) = self.functions.insert(key, def) {
            log::debug!("replaced function {}", previous.name);
        }
    }

    /// Register a variadic function from a closure
    ///
    /// # Example
    /// ```rust
    /// use cellcalc_formula::{CalcValue, FunctionRegistry};
    ///
    /// let mut registry = FunctionRegistry::new();
    /// registry.register_fn("double", |args| {
    ///     let n = args.first().and_then(CalcValue::as_number).unwrap_or(0.0);
    ///     Ok(CalcValue::Number(n * 2.0))
    /// });
    ///
    /// let result = registry.call("DOUBLE", &[CalcValue::Number(21.0)]).unwrap();
    /// assert_eq!(result, CalcValue::Number(42.0));
    /// ```
    pub fn register_fn<F>(&mut self, name: &str, implementation: F)
    where
        F: Fn(&[CalcValue]) -> FormulaResult<CalcValue> + Send + Sync + 'static,
    {
        log::debug!("registering function {}", name.to_uppercase());
        self.register(FunctionDef::new(name, 0, None, implementation));
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up and invoke a function
    ///
    /// Fails with [`FormulaError::UnknownFunction`] for an unregistered name and
    /// with [`FormulaError::ArgumentCount`] when the arity does not match.
    pub fn call(&self, name: &str, args: &[CalcValue]) -> FormulaResult<CalcValue> {
        let func = self
            .get(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_uppercase()))?;

        func.check_arity(args.len())?;

        (func.implementation)(args)
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn builtin(
        &mut self,
        name: &str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: fn(&[CalcValue]) -> FormulaResult<CalcValue>,
    ) {
        self.register(FunctionDef::new(name, min_args, max_args, implementation));
    }

    fn register_math_functions(&mut self) {
        self.builtin("SUM", 0, None, math::fn_sum);
        self.builtin("SUMIF", 2, Some(3), math::fn_sumif);
        self.builtin("ROUND", 2, Some(2), math::fn_round);
        self.builtin("ABS", 1, Some(1), math::fn_abs);
        self.builtin("SQRT", 1, Some(1), math::fn_sqrt);
        self.builtin("MOD", 2, Some(2), math::fn_mod);
    }

    fn register_statistical_functions(&mut self) {
        self.builtin("AVERAGE", 0, None, statistical::fn_average);
        self.builtin("MIN", 0, None, statistical::fn_min);
        self.builtin("MAX", 0, None, statistical::fn_max);
        self.builtin("COUNT", 0, None, statistical::fn_count);
        self.builtin("COUNTIF", 2, Some(2), statistical::fn_countif);
    }

    fn register_logical_functions(&mut self) {
        self.builtin("IF", 3, Some(3), logical::fn_if);
        self.builtin("AND", 0, None, logical::fn_and);
        self.builtin("OR", 0, None, logical::fn_or);
        self.builtin("NOT", 1, Some(1), logical::fn_not);
        self.builtin("IFERROR", 2, Some(2), logical::fn_iferror);
    }

    fn register_text_functions(&mut self) {
        self.builtin("CONCATENATE", 0, None, text::fn_concatenate);
        self.builtin("LEFT", 2, Some(2), text::fn_left);
        self.builtin("RIGHT", 2, Some(2), text::fn_right);
        self.builtin("MID", 3, Some(3), text::fn_mid);
        self.builtin("LEN", 1, Some(1), text::fn_len);
        self.builtin("UPPER", 1, Some(1), text::fn_upper);
        self.builtin("LOWER", 1, Some(1), text::fn_lower);
        self.builtin("TRIM", 1, Some(1), text::fn_trim);
    }

    fn register_info_functions(&mut self) {
        self.builtin("ISERROR", 1, Some(1), info::fn_iserror);
        self.builtin("ISNA", 1, Some(1), info::fn_isna);
        self.builtin("ISNUMBER", 1, Some(1), info::fn_isnumber);
        self.builtin("ISTEXT", 1, Some(1), info::fn_istext);
        self.builtin("ISLOGICAL", 1, Some(1), info::fn_islogical);
        self.builtin("NA", 0, Some(0), info::fn_na);
    }
}

// === Argument helpers shared by the built-ins ===

/// Unwrap an argument helper result, returning the in-band error from the
/// enclosing function on failure
macro_rules! try_arg {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return Ok(crate::value::CalcValue::Error(e)),
        }
    };
}
pub(crate) use try_arg;

/// First error among the direct arguments (list elements are not inspected)
pub(crate) fn first_error(args: &[CalcValue]) -> Option<CellError> {
    args.iter().find_map(CalcValue::error)
}

/// Numeric argument at `index`; an error argument is passed through
pub(crate) fn number_arg(args: &[CalcValue], index: usize) -> Result<f64, CellError> {
    match args.get(index) {
        Some(CalcValue::Error(e)) => Err(*e),
        Some(value) => value.as_number().ok_or(CellError::Value),
        None => Err(CellError::Value),
    }
}

/// Text argument at `index`; lists are rejected with `#VALUE!`
pub(crate) fn text_arg(args: &[CalcValue], index: usize) -> Result<String, CellError> {
    match args.get(index) {
        Some(CalcValue::Error(e)) => Err(*e),
        Some(CalcValue::List(_)) | None => Err(CellError::Value),
        Some(value) => Ok(value.as_text()),
    }
}
