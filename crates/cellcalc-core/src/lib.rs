//! # cellcalc-core
//!
//! Core data structures for the cellcalc formula engine.
//!
//! This crate provides the fundamental types used throughout cellcalc:
//! - [`CellValue`] and [`CellError`] - Values stored in cells, including in-band error codes
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and rectangular ranges
//! - [`Sheet`] - A case-insensitive, address-keyed cell store
//! - [`CellSource`] - The lookup interface the formula evaluator reads cells through
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{CellSource, CellValue, Sheet};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value("a1", 10.0);
//! sheet.set_value("B1", "Hello");
//!
//! assert_eq!(sheet.cell("A1"), Some(CellValue::Number(10.0)));
//! assert_eq!(sheet.cell("C1"), None);
//! ```

pub mod cell;
pub mod error;
pub mod sheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellRange, CellValue};
pub use error::{Error, Result};
pub use sheet::{CellSource, Sheet};
