//! Benchmark suite for list-file parsing
//!
//! Measures `parse_records` over generated in-memory lists of increasing size,
//! with the same address predicate the Ethereum client uses.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use batch_disburse::io::{parse_records, ListReader};
use batch_disburse::network::is_eth_address;

fn main() {
    divan::main();
}

/// A list of `rows` transfers with a comment every hundred rows
fn generate_list(rows: usize) -> String {
    let mut list = String::with_capacity(rows * 72);
    for i in 0..rows {
        if i % 100 == 0 {
            list.push_str(&format!("# block {}\n", i / 100));
        }
        list.push_str(&format!(
            "recipient-{}\t0x{:040X}\t{}.{:02}\tETH\n",
            i,
            i,
            i % 50 + 1,
            i % 100
        ));
    }
    list
}

#[divan::bench(args = [100, 1_000, 100_000])]
fn parse_list(bencher: divan::Bencher, rows: usize) {
    let list = generate_list(rows);

    bencher.bench(|| {
        let reader = ListReader::from_reader(divan::black_box(list.as_bytes()));
        parse_records(reader, is_eth_address).unwrap_or_default()
    });
}
