//! Drivers that sit on top of the kernels: a fast-vs-reference correctness
//! check, a throughput benchmark, and text rendering for both.

pub mod bench;
pub mod check;
pub mod render;

pub use bench::{BenchConfig, BenchReport, run_bench};
pub use check::{CheckReport, CheckRow, PROBE_INPUTS, default_tolerance, run_check};
pub use render::{render_bench, render_check};
