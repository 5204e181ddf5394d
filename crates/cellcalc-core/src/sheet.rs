//! In-memory cell store

use ahash::AHashMap;

use crate::cell::CellValue;

/// Read access to cell values by address
///
/// This is the only view of cell data the formula evaluator needs. Lookups are
/// case-insensitive; `None` means the address was never written.
pub trait CellSource {
    /// Get the value stored at `address`, if any
    fn cell(&self, address: &str) -> Option<CellValue>;
}

/// A flat, address-keyed cell store
///
/// Addresses are stored verbatim apart from case folding, so any identifier-like
/// key can be written and read back. No formula is stored here; a sheet only holds
/// plain values.
#[derive(Debug, Default, Clone)]
pub struct Sheet {
    cells: AHashMap<String, CellValue>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    fn key(address: &str) -> String {
        address.to_uppercase()
    }

    /// Set a cell value by address string
    ///
    /// Writing [`CellValue::Empty`] removes the cell, so it reads back as unset.
    ///
    /// # Example
    /// ```rust
    /// use cellcalc_core::{CellValue, Sheet};
    ///
    /// let mut sheet = Sheet::new();
    /// sheet.set_value("A1", 42.0);
    /// assert_eq!(sheet.get_value("a1"), Some(&CellValue::Number(42.0)));
    ///
    /// sheet.set_value("A1", CellValue::Empty);
    /// assert_eq!(sheet.get_value("A1"), None);
    /// ```
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) {
        let value = value.into();
        let key = Self::key(address);
        if value.is_empty() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, value);
        }
    }

    /// Get a cell value by address string
    pub fn get_value(&self, address: &str) -> Option<&CellValue> {
        self.cells.get(&Self::key(address))
    }

    /// Remove a single cell, returning its previous value
    pub fn remove(&mut self, address: &str) -> Option<CellValue> {
        self.cells.remove(&Self::key(address))
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of cells holding a value
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether no cell holds a value
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over `(address, value)` pairs in no particular order
    ///
    /// Addresses are returned in their upper-cased stored form.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl CellSource for Sheet {
    fn cell(&self, address: &str) -> Option<CellValue> {
        self.get_value(address).cloned()
    }
}

impl<S: CellSource + ?Sized> CellSource for &S {
    fn cell(&self, address: &str) -> Option<CellValue> {
        (**self).cell(address)
    }
}
