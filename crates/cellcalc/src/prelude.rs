//! Prelude module - common imports for cellcalc users
//!
//! ```rust
//! use cellcalc::prelude::*;
//! ```

pub use crate::{
    // Engine
    CalcEngine,
    // Values
    CalcValue,
    CellAddress,
    CellError,
    CellRange,
    CellSource,
    CellValue,
    // Configuration
    EvaluationOptions,
    // Errors
    FormulaError,
    FormulaResult,
    MissingCellPolicy,
    Sheet,
};
