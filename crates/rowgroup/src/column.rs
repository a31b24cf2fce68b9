#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;

use thiserror::Error;

use crate::pool::Sym;

/// Missing-value sentinel for [`Column::Int`] values and factor codes.
pub const MISSING_INT: i32 = i32::MIN;

/// One typed input column. All columns of a call share one row count.
pub enum Column<'a> {
    /// 32-bit signed integers; [`MISSING_INT`] marks a missing value.
    Int(&'a [i32]),
    /// Booleans; `None` marks a missing value.
    Bool(&'a [Option<bool>]),
    /// Factor codes in `1..=levels`; [`MISSING_INT`] marks a missing value.
    /// Codes outside that range are not checked.
    Factor { codes: &'a [i32], levels: u32 },
    /// 64-bit floats; any NaN bit pattern marks a missing value, and all
    /// missing values compare equal to each other.
    Double(&'a [f64]),
    /// Pre-interned string handles; rows are equal exactly when the handles
    /// are. See [`crate::StrPool`].
    Sym(&'a [Sym]),
    /// Any other atomic values: each row is rendered to text through
    /// [`StringSource`] and interned for the duration of the call.
    Other(&'a dyn StringSource),
}

impl Column<'_> {
    /// Row count of the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Int(values) => values.len(),
            Column::Bool(values) => values.len(),
            Column::Factor { codes, .. } => codes.len(),
            Column::Double(values) => values.len(),
            Column::Sym(values) => values.len(),
            Column::Other(source) => source.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A column of values the indexer has no native representation for.
///
/// The host renders each row to text and the indexer groups rows by the
/// rendered strings. `Ok(None)` marks a missing row; all missing rows of a
/// column fall into one group.
pub trait StringSource {
    fn len(&self) -> usize;

    /// The text for `row`, or `None` when the row is missing.
    fn value(&self, row: usize) -> Result<Option<Cow<'_, str>>, CoerceError>;
}

/// Why a [`StringSource`] could not produce text for a column.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The source is not a flat sequence of atomic values.
    #[error("value sequence is not atomic")]
    NotAtomic,
    /// Rendering a value to text failed.
    #[error("string coercion failed: {0}")]
    Failed(String),
}

impl<'a> StringSource for [&'a str] {
    fn len(&self) -> usize {
        <[&str]>::len(self)
    }

    fn value(&self, row: usize) -> Result<Option<Cow<'_, str>>, CoerceError> {
        match self.get(row) {
            Some(text) => Ok(Some(Cow::Borrowed(*text))),
            None => Err(CoerceError::Failed(format!("row {row} out of bounds"))),
        }
    }
}

impl<'a> StringSource for [Option<&'a str>] {
    fn len(&self) -> usize {
        <[Option<&str>]>::len(self)
    }

    fn value(&self, row: usize) -> Result<Option<Cow<'_, str>>, CoerceError> {
        match self.get(row) {
            Some(Some(text)) => Ok(Some(Cow::Borrowed(*text))),
            Some(None) => Ok(None),
            None => Err(CoerceError::Failed(format!("row {row} out of bounds"))),
        }
    }
}

impl StringSource for [String] {
    fn len(&self) -> usize {
        <[String]>::len(self)
    }

    fn value(&self, row: usize) -> Result<Option<Cow<'_, str>>, CoerceError> {
        match self.get(row) {
            Some(text) => Ok(Some(Cow::Borrowed(text.as_str()))),
            None => Err(CoerceError::Failed(format!("row {row} out of bounds"))),
        }
    }
}

/// Adapter rendering any displayable slice through its `Display` impl, the
/// way a host would fall back to "convert to text, then group".
pub struct DisplayColumn<'a, T>(pub &'a [T]);

impl<T: fmt::Display> StringSource for DisplayColumn<'_, T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn value(&self, row: usize) -> Result<Option<Cow<'_, str>>, CoerceError> {
        let Some(item) = self.0.get(row) else {
            return Err(CoerceError::Failed(format!("row {row} out of bounds")));
        };
        let mut text = String::new();
        write!(&mut text, "{item}")
            .map_err(|_| CoerceError::Failed(format!("row {row} failed to render")))?;
        Ok(Some(Cow::Owned(text)))
    }
}
