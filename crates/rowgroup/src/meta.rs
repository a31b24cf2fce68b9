#![forbid(unsafe_code)]

//! Per-column descriptors: classify each input column, scan its range and
//! missing-value state, and decide whether it qualifies for the packed
//! direct-address path.

use std::borrow::Cow;

use crate::column::{CoerceError, Column, StringSource, MISSING_INT};
use crate::hash::bit_width;
use crate::pipeline::IndexOptions;
use crate::pool::{StrPool, Sym};

/// Equality representation chosen for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    /// 32-bit integers (also booleans and factor codes).
    Int,
    /// Floats whose every non-missing value equals its `i32` truncation.
    IntDouble,
    /// General floats.
    Double,
    /// Interned string handles.
    Str,
}

/// The value buffer a descriptor reads from. Borrowed from the caller,
/// except for coerced columns whose interned handles the descriptor owns.
pub(crate) enum Buffer<'a> {
    Int(&'a [i32]),
    Bool(&'a [Option<bool>]),
    Double(&'a [f64]),
    Sym(Cow<'a, [Sym]>),
}

pub(crate) struct ColumnMeta<'a> {
    pub n: usize,
    pub kind: Kind,
    /// Smallest non-missing value of an integer-like column.
    pub min: i64,
    /// `max - min + 2`: one dense slot per value plus the missing sentinel.
    /// Zero for `Double` and `Str`.
    pub range: u64,
    pub range_bits: u32,
    pub any_missing: bool,
    /// Dense id of the missing sentinel, `range - 1` (truncated for columns
    /// that never take the direct path, where it only seeds a hash).
    pub missing_id: u32,
    pub fast_int: bool,
    pub buffer: Buffer<'a>,
}

impl<'a> ColumnMeta<'a> {
    pub(crate) fn build(
        column: &Column<'a>,
        pool: &mut StrPool,
        options: &IndexOptions,
    ) -> Result<Self, CoerceError> {
        match *column {
            Column::Int(values) => {
                let (min, max, any_missing) = scan_ints(values);
                Ok(Self::int_like(
                    Kind::Int,
                    min,
                    max,
                    any_missing,
                    Buffer::Int(values),
                    values.len(),
                    options,
                ))
            }
            Column::Bool(values) => {
                // 0, 1, missing; assumed missing without a scan.
                Ok(Self::int_like(
                    Kind::Int,
                    0,
                    1,
                    true,
                    Buffer::Bool(values),
                    values.len(),
                    options,
                ))
            }
            Column::Factor { codes, levels } => {
                // Codes start at 1; assumed missing without a scan.
                Ok(Self::int_like(
                    Kind::Int,
                    1,
                    i64::from(levels),
                    true,
                    Buffer::Int(codes),
                    codes.len(),
                    options,
                ))
            }
            Column::Double(values) => match scan_doubles(values) {
                DoubleScan::IntLike { min, max, any_missing } => Ok(Self::int_like(
                    Kind::IntDouble,
                    min,
                    max,
                    any_missing,
                    Buffer::Double(values),
                    values.len(),
                    options,
                )),
                DoubleScan::General { any_missing } => Ok(Self {
                    n: values.len(),
                    kind: Kind::Double,
                    min: 0,
                    range: 0,
                    range_bits: 0,
                    any_missing,
                    missing_id: 0,
                    fast_int: false,
                    buffer: Buffer::Double(values),
                }),
            },
            Column::Sym(values) => Ok(Self {
                n: values.len(),
                kind: Kind::Str,
                min: 0,
                range: 0,
                range_bits: 0,
                any_missing: values.iter().any(|sym| sym.is_missing()),
                missing_id: 0,
                fast_int: false,
                buffer: Buffer::Sym(Cow::Borrowed(values)),
            }),
            Column::Other(source) => {
                let syms = coerce_to_syms(source, pool)?;
                Ok(Self {
                    n: syms.len(),
                    kind: Kind::Str,
                    min: 0,
                    range: 0,
                    range_bits: 0,
                    any_missing: syms.iter().any(|sym| sym.is_missing()),
                    missing_id: 0,
                    fast_int: false,
                    buffer: Buffer::Sym(Cow::Owned(syms)),
                })
            }
        }
    }

    fn int_like(
        kind: Kind,
        min: i64,
        max: i64,
        any_missing: bool,
        buffer: Buffer<'a>,
        n: usize,
        options: &IndexOptions,
    ) -> Self {
        // 64-bit arithmetic: an i32 span can overflow 32 bits.
        let range = (max - min + 2) as u64;
        Self {
            n,
            kind,
            min,
            range,
            range_bits: bit_width(range),
            any_missing,
            missing_id: (range - 1) as u32,
            fast_int: range < u64::from(options.fast_range_limit) || range <= 2 * n as u64,
            buffer,
        }
    }
}

/// Min, max and missing state of an integer column. An empty or all-missing
/// column scans as `(0, 0, ..)`, which leaves only the missing sentinel.
fn scan_ints(values: &[i32]) -> (i64, i64, bool) {
    let mut min = 0i64;
    let mut max = 0i64;
    let mut any_missing = false;
    let mut seen = false;
    for &v in values {
        if v == MISSING_INT {
            any_missing = true;
            continue;
        }
        let v = i64::from(v);
        if !seen {
            min = v;
            max = v;
            seen = true;
        } else if v > max {
            max = v;
        } else if v < min {
            min = v;
        }
    }
    (min, max, any_missing)
}

enum DoubleScan {
    IntLike { min: i64, max: i64, any_missing: bool },
    General { any_missing: bool },
}

/// One pass over a float column: either every non-missing value equals its
/// `i32` truncation (then min/max describe the truncations), or the column
/// stays a general float column and the scan stops early.
fn scan_doubles(values: &[f64]) -> DoubleScan {
    let mut min = 0i64;
    let mut max = 0i64;
    let mut any_missing = false;
    let mut seen = false;
    for &v in values {
        if v.is_nan() {
            any_missing = true;
            continue;
        }
        // `as i32` saturates, so out-of-range values fail the comparison.
        let truncated = v as i32;
        if v != f64::from(truncated) {
            return DoubleScan::General { any_missing };
        }
        let t = i64::from(truncated);
        if !seen {
            min = t;
            max = t;
            seen = true;
        } else if t > max {
            max = t;
        } else if t < min {
            min = t;
        }
    }
    DoubleScan::IntLike { min, max, any_missing }
}

fn coerce_to_syms(source: &dyn StringSource, pool: &mut StrPool) -> Result<Vec<Sym>, CoerceError> {
    let n = source.len();
    let mut syms = Vec::with_capacity(n);
    for row in 0..n {
        let sym = match source.value(row)? {
            Some(text) => pool.intern(&text),
            None => Sym::MISSING,
        };
        syms.push(sym);
    }
    Ok(syms)
}
