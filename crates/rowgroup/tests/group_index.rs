use std::borrow::Cow;

use pretty_assertions::assert_eq;
use rowgroup::{
    group_index, group_index_with, CoerceError, Column, DisplayColumn, IndexError, IndexOptions,
    StrPool, StringSource, Sym, MISSING_INT,
};

fn check(columns: &[Column<'_>], want_index: &[u32], want_first: &[u32]) {
    let grouped = group_index(columns).expect("indexing should succeed");
    assert_eq!(grouped.index, want_index);
    assert_eq!(grouped.first_obs, want_first);
    assert_eq!(grouped.n_groups(), want_first.len());
}

fn syms(pool: &mut StrPool, texts: &[&str]) -> Vec<Sym> {
    texts.iter().map(|t| pool.intern(t)).collect()
}

#[test]
fn single_int_column_with_missing() {
    let values = [3, 1, 3, MISSING_INT, 1, MISSING_INT];
    check(&[Column::Int(&values)], &[1, 2, 1, 3, 2, 3], &[1, 2, 4]);
}

#[test]
fn two_int_columns_pack_into_one_key() {
    let a = [1, 1, 2, 2, 1];
    let b = [10, 20, 10, 10, 10];
    check(
        &[Column::Int(&a), Column::Int(&b)],
        &[1, 2, 3, 3, 1],
        &[1, 2, 3],
    );
}

#[test]
fn float_column_with_nan_and_integral_values() {
    let values = [1.0, 2.0, f64::NAN, 1.0, f64::NAN];
    check(&[Column::Double(&values)], &[1, 2, 3, 1, 3], &[1, 2, 3]);
}

#[test]
fn string_column_groups_by_handle_identity() {
    let mut pool = StrPool::new();
    let col = syms(&mut pool, &["x", "y", "x", "z", "y"]);
    check(&[Column::Sym(&col)], &[1, 2, 1, 3, 2], &[1, 2, 4]);
}

#[test]
fn int_prefix_composes_with_a_string_column() {
    let mut pool = StrPool::new();
    let a = [1, 1, 2, 1];
    let b = syms(&mut pool, &["a", "b", "a", "a"]);
    check(
        &[Column::Int(&a), Column::Sym(&b)],
        &[1, 2, 3, 1],
        &[1, 2, 3],
    );
}

#[test]
fn large_integers_with_a_narrow_span() {
    let values = [1_000_000_000, 1_000_000_001, 1_000_000_000, 1_000_000_002];
    check(&[Column::Int(&values)], &[1, 2, 1, 3], &[1, 2, 4]);
}

#[test]
fn wide_range_integers_take_the_hash_path() {
    // range is over the fast-int limit and over 2n, so no direct table.
    let values = [0, 1_000_000, 5, 1_000_000];
    check(&[Column::Int(&values)], &[1, 2, 3, 2], &[1, 2, 3]);
}

#[test]
fn bool_column_with_missing() {
    let values = [Some(true), None, Some(false), Some(true), None];
    check(&[Column::Bool(&values)], &[1, 2, 3, 1, 2], &[1, 2, 3]);
}

#[test]
fn factor_codes_group_like_ints() {
    let codes = [2, 1, MISSING_INT, 2];
    check(
        &[Column::Factor { codes: &codes, levels: 3 }],
        &[1, 2, 3, 1],
        &[1, 2, 3],
    );
}

#[test]
fn factor_with_more_levels_than_the_fast_limit() {
    let codes = [1, 199_999, 1];
    check(
        &[Column::Factor { codes: &codes, levels: 200_000 }],
        &[1, 2, 1],
        &[1, 2],
    );
}

#[test]
fn all_missing_int_column_is_one_group() {
    let values = [MISSING_INT; 4];
    check(&[Column::Int(&values)], &[1, 1, 1, 1], &[1]);
}

#[test]
fn nan_bit_patterns_collapse_to_one_missing_state() {
    let quiet = f64::from_bits(0x7FF8_0000_0000_0001);
    let payload = f64::from_bits(0x7FF8_0000_0000_0F0F);
    let values = [quiet, 0.5, payload, f64::NAN];
    check(&[Column::Double(&values)], &[1, 2, 1, 1], &[1, 2]);
}

#[test]
fn negative_zero_groups_with_zero() {
    let values = [0.0, -0.0, 1.5];
    check(&[Column::Double(&values)], &[1, 1, 2], &[1, 3]);
}

#[test]
fn four_fast_int_columns_accumulate_a_packed_key() {
    let a = [1, 1, 2, 1];
    let b = [5, 5, 5, 5];
    let c = [9, 8, 9, 9];
    let d = [0, 0, 0, 0];
    check(
        &[
            Column::Int(&a),
            Column::Int(&b),
            Column::Int(&c),
            Column::Int(&d),
        ],
        &[1, 2, 3, 1],
        &[1, 2, 3],
    );
}

#[test]
fn small_int_column_composes_directly_after_a_string_column() {
    let mut pool = StrPool::new();
    let a = syms(&mut pool, &["u", "v", "u", "u", "v"]);
    let b = [7, 7, 8, 7, 7];
    check(
        &[Column::Sym(&a), Column::Int(&b)],
        &[1, 2, 3, 1, 2],
        &[1, 2, 3],
    );
}

#[test]
fn bool_column_after_a_general_column_stays_correct() {
    let a = [0.5, 0.5, 0.5, 1.5];
    let b = [Some(true), None, Some(true), Some(true)];
    check(
        &[Column::Double(&a), Column::Bool(&b)],
        &[1, 2, 1, 3],
        &[1, 2, 4],
    );
}

#[test]
fn three_general_columns_alternate_index_buffers() {
    let a = [0.5, 0.5, 1.5, 0.5];
    let b = [2.5, 2.5, 2.5, 2.5];
    let c = [9.5, 8.5, 9.5, 9.5];
    check(
        &[Column::Double(&a), Column::Double(&b), Column::Double(&c)],
        &[1, 2, 3, 1],
        &[1, 2, 3],
    );
}

#[test]
fn missing_values_group_per_column() {
    let a = [1, MISSING_INT, 1, MISSING_INT];
    let b = [f64::NAN, 2.5, f64::NAN, 2.5];
    check(
        &[Column::Int(&a), Column::Double(&b)],
        &[1, 2, 1, 2],
        &[1, 2],
    );
}

#[test]
fn displayable_values_coerce_to_text() {
    let values = [7u64, 8, 7];
    let source = DisplayColumn(&values);
    check(&[Column::Other(&source)], &[1, 2, 1], &[1, 2]);
}

#[test]
fn str_slices_coerce_without_a_caller_pool() {
    let values = ["x", "y", "x"];
    check(&[Column::Other(&values[..])], &[1, 2, 1], &[1, 2]);
}

#[test]
fn missing_text_rows_share_one_group() {
    let values = [Some("a"), None, Some("a"), None];
    check(&[Column::Other(&values[..])], &[1, 2, 1, 2], &[1, 2]);
}

#[test]
fn empty_rows_give_an_empty_result() {
    let ints: [i32; 0] = [];
    let texts: [&str; 0] = [];
    let grouped = group_index(&[Column::Int(&ints), Column::Other(&texts[..])])
        .expect("empty input should succeed");
    assert_eq!(grouped.index, Vec::<u32>::new());
    assert_eq!(grouped.first_obs, Vec::<u32>::new());
    assert_eq!(grouped.n_groups(), 0);
    assert!(grouped.is_empty());
}

#[test]
fn no_columns_is_an_error() {
    assert_eq!(group_index(&[]), Err(IndexError::NoColumns));
}

#[test]
fn length_mismatch_is_an_error() {
    let a = [1, 2, 3];
    let b = [1.0, 2.0];
    assert_eq!(
        group_index(&[Column::Int(&a), Column::Double(&b)]),
        Err(IndexError::LengthMismatch { expected: 3, actual: 2 })
    );
}

struct Failing {
    rows: usize,
    error: CoerceError,
}

impl StringSource for Failing {
    fn len(&self) -> usize {
        self.rows
    }

    fn value(&self, _row: usize) -> Result<Option<Cow<'_, str>>, CoerceError> {
        Err(self.error.clone())
    }
}

#[test]
fn coercion_failure_surfaces_before_indexing() {
    let source = Failing {
        rows: 2,
        error: CoerceError::Failed("opaque value".to_owned()),
    };
    assert_eq!(
        group_index(&[Column::Other(&source)]),
        Err(IndexError::Coercion("opaque value".to_owned()))
    );
}

#[test]
fn non_atomic_sources_are_rejected() {
    let source = Failing {
        rows: 2,
        error: CoerceError::NotAtomic,
    };
    let ints = [1, 2];
    assert_eq!(
        group_index(&[Column::Int(&ints), Column::Other(&source)]),
        Err(IndexError::NonAtomic)
    );
}

#[test]
fn reindexing_the_result_reproduces_it() {
    let mut pool = StrPool::new();
    let a = [1, 1, 2, MISSING_INT, 1];
    let b = syms(&mut pool, &["a", "b", "a", "a", "a"]);
    let grouped = group_index(&[Column::Int(&a), Column::Sym(&b)]).unwrap();

    let as_ints: Vec<i32> = grouped.index.iter().map(|&g| g as i32).collect();
    let again = group_index(&[Column::Int(&as_ints)]).unwrap();
    assert_eq!(again, grouped);
}

#[test]
fn results_do_not_depend_on_the_thresholds() {
    // range 22 sits between 2n and the default fast limit, so shrinking the
    // limit pushes the column from the packed table onto the hash path.
    let a = [10, 20, 30, 10];
    let b = [1.0, 1.0, 2.0, 1.0];
    let columns = [Column::Int(&a), Column::Double(&b)];

    let default = group_index(&columns).unwrap();
    assert_eq!(default.index, vec![1, 2, 3, 1]);
    assert_eq!(default.first_obs, vec![1, 2, 3]);

    let rerouted = group_index_with(
        &columns,
        IndexOptions { fast_range_limit: 10, packed_key_bits: 0 },
    )
    .unwrap();
    assert_eq!(rerouted, default);
}
