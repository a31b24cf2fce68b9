use rowgroup::{group_index, Column, StrPool, Sym};
use std::time::Instant;

fn main() {
    let rows: usize = std::env::var("ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1_000_000);

    // Packed-table benchmark: two small-range integer keys.
    let region: Vec<i32> = (0..rows).map(|i| (i % 12) as i32).collect();
    let bucket: Vec<i32> = (0..rows).map(|i| (i % 3_000) as i32).collect();

    let start = Instant::now();
    let grouped = group_index(&[Column::Int(&region), Column::Int(&bucket)])
        .expect("indexing should succeed");
    println!("packed groups: {}", grouped.n_groups());
    println!("packed time: {:?}", start.elapsed());

    // Hash-path benchmark: fractional floats never qualify for the table.
    let amount: Vec<f64> = (0..rows).map(|i| (i % 4_096) as f64 + 0.5).collect();

    let start = Instant::now();
    let grouped = group_index(&[Column::Double(&amount)]).expect("indexing should succeed");
    println!("hashed groups: {}", grouped.n_groups());
    println!("hashed time: {:?}", start.elapsed());

    // Composed benchmark: an interned string key folded over an int prefix.
    let mut pool = StrPool::new();
    let categories: Vec<Sym> = (0..1_024)
        .map(|i| pool.intern(&format!("C{i:04}")))
        .collect();
    let category: Vec<Sym> = (0..rows).map(|i| categories[i % categories.len()]).collect();

    let start = Instant::now();
    let grouped = group_index(&[Column::Int(&region), Column::Sym(&category)])
        .expect("indexing should succeed");
    println!("composed groups: {}", grouped.n_groups());
    println!("composed time: {:?}", start.elapsed());
}
