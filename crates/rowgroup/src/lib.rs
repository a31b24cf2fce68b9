//! Group indexing over typed columns.
//!
//! Given one column or a tuple of equal-length columns, [`group_index`]
//! assigns every row a one-based group id such that two rows share an id
//! exactly when they are equal column-wise, numbering groups in order of
//! first appearance and reporting each group's first row.
//!
//! Per column, the indexer picks the cheapest equality representation:
//! - small-range integers (booleans, factors, integer-valued floats
//!   included) go through a packed direct-address table;
//! - everything else goes through an equality-confirmed open-addressing
//!   hash, composed one column at a time against the partial index built
//!   from the columns before it.
//!
//! Strings take part as interned handles: intern through [`StrPool`] (or
//! hand any other atomic values to [`Column::Other`] and let the indexer
//! intern their rendered text for the duration of the call).

#![forbid(unsafe_code)]

mod column;
mod direct;
mod hash;
mod hashed;
mod meta;
mod pipeline;
mod pool;

pub use crate::column::{CoerceError, Column, DisplayColumn, StringSource, MISSING_INT};
pub use crate::pipeline::{group_index, group_index_with, GroupIndex, IndexError, IndexOptions};
pub use crate::pool::{StrPool, Sym};
