#![forbid(unsafe_code)]

//! The driver: classify every column, run the packed direct table over the
//! leading low-cardinality integer columns, then fold the remaining columns
//! one at a time through the composed hash indexer, alternating two index
//! buffers.

use thiserror::Error;

use crate::column::{CoerceError, Column};
use crate::direct;
use crate::hash::bit_width;
use crate::hashed;
use crate::meta::ColumnMeta;
use crate::pool::StrPool;

/// Thresholds steering the fast-int decisions.
///
/// The defaults are tuned constants; correctness does not depend on them,
/// only on which indexing method gets picked.
#[derive(Clone, Copy, Debug)]
pub struct IndexOptions {
    /// A column whose dense value range is below this always qualifies for
    /// the direct-address table.
    pub fast_range_limit: u32,
    /// Packed composite keys stay on the direct path while they need fewer
    /// bits than this (or stay within a few bits of the row count).
    pub packed_key_bits: u32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            fast_range_limit: 100_000,
            packed_key_bits: 17,
        }
    }
}

/// Dense one-based group ids plus each group's first row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupIndex {
    /// One group id per input row, dense in `1..=n_groups()`, numbered in
    /// order of first appearance.
    pub index: Vec<u32>,
    /// One-based position of each group's first row; strictly increasing.
    pub first_obs: Vec<u32>,
}

impl GroupIndex {
    /// Number of distinct groups.
    pub fn n_groups(&self) -> usize {
        self.first_obs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Errors raised before any result is produced; there are no partial results.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Columns of one call differ in length.
    #[error("columns must all have {expected} rows, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// The column set is empty.
    #[error("no columns to index")]
    NoColumns,
    /// A host source reported a non-atomic value sequence.
    #[error("column is not an atomic value sequence")]
    NonAtomic,
    /// Rendering a column to text failed.
    #[error("string coercion failed: {0}")]
    Coercion(String),
}

impl From<CoerceError> for IndexError {
    fn from(err: CoerceError) -> Self {
        match err {
            CoerceError::NotAtomic => IndexError::NonAtomic,
            CoerceError::Failed(why) => IndexError::Coercion(why),
        }
    }
}

/// Group the rows of `columns` by column-wise equality.
///
/// Every row gets a one-based group id, dense in `1..=G`, with groups
/// numbered in order of first appearance; `first_obs` records each group's
/// first row (one-based).
///
/// ```
/// use rowgroup::{group_index, Column};
///
/// let a = [1, 1, 2, 2, 1];
/// let b = [10, 20, 10, 10, 10];
/// let grouped = group_index(&[Column::Int(&a), Column::Int(&b)]).unwrap();
/// assert_eq!(grouped.index, vec![1, 2, 3, 3, 1]);
/// assert_eq!(grouped.first_obs, vec![1, 2, 3]);
/// ```
pub fn group_index(columns: &[Column<'_>]) -> Result<GroupIndex, IndexError> {
    group_index_with(columns, IndexOptions::default())
}

/// [`group_index`] with explicit [`IndexOptions`].
pub fn group_index_with(
    columns: &[Column<'_>],
    options: IndexOptions,
) -> Result<GroupIndex, IndexError> {
    let Some(first) = columns.first() else {
        return Err(IndexError::NoColumns);
    };
    let n = first.len();
    for column in columns {
        if column.len() != n {
            return Err(IndexError::LengthMismatch {
                expected: n,
                actual: column.len(),
            });
        }
    }

    // Coercion happens here, so a bad column errors out before any indexing.
    let mut pool = StrPool::new();
    let mut metas = Vec::with_capacity(columns.len());
    for column in columns {
        metas.push(ColumnMeta::build(column, &mut pool, &options)?);
    }

    debug_assert!(metas.iter().all(|meta| meta.n == n));

    if n == 0 {
        return Ok(GroupIndex::default());
    }

    // Fast-int prefix: keep packing leading columns while the combined key
    // stays small enough for one direct-address table.
    let k_total = metas.len();
    let mut prefix_len = 0;
    let mut sum_bits = 0u32;
    for meta in &metas {
        if !meta.fast_int {
            break;
        }
        let widened = sum_bits + meta.range_bits;
        if widened < options.packed_key_bits
            || (k_total >= 2 && widened <= bit_width(5 * n as u64))
        {
            prefix_len += 1;
            sum_bits = widened;
        } else {
            break;
        }
    }

    let mut index = vec![0u32; n];
    let mut first_obs: Vec<u32> = Vec::new();
    let mut groups;
    let rest_start;

    if prefix_len > 0 {
        let is_final = prefix_len == k_total;
        groups = direct::index_fast(&metas[..prefix_len], &mut index, &mut first_obs, is_final);
        rest_start = prefix_len;
    } else {
        let is_final = k_total == 1;
        groups = hashed::index_hashed(&metas[0], &mut index, &mut first_obs, is_final);
        rest_start = 1;
    }

    if rest_start < k_total {
        // Fold the remaining columns, alternating the two index buffers;
        // after the swap the latest index always sits in `index`.
        let mut scratch = vec![0u32; n];
        for (k, meta) in metas.iter().enumerate().skip(rest_start) {
            let is_final = k + 1 == k_total;
            groups = hashed::index_hashed_composed(
                meta,
                &index,
                groups,
                &mut scratch,
                &mut first_obs,
                is_final,
                &options,
            );
            std::mem::swap(&mut index, &mut scratch);
        }
    }

    debug_assert_eq!(groups as usize, first_obs.len(), "one first row per group");
    Ok(GroupIndex { index, first_obs })
}
