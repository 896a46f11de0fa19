//! Benchmarks for engine building blocks.

mod order;
mod process;

pub use order::bench_order;
pub use process::bench_process;
