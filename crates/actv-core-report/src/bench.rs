use actv_core_kernel::{Kernel, par_apply};
use anyhow::{Result, bail};
use log::debug;
use serde::Serialize;
use std::hint::black_box;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct BenchConfig {
    pub size: usize,
    pub iters: usize,
    pub warmup: usize,
    /// Split each call across the rayon pool in pieces of this many elements.
    pub parallel_split: Option<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            iters: 10_000,
            warmup: 100,
            parallel_split: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub kernel: &'static str,
    pub size: usize,
    pub iters: usize,
    pub parallel: bool,
    pub total_ns: u64,
    pub ns_per_iter: f64,
    pub ns_per_elem: f64,
    pub melem_per_sec: f64,
}

/// Benchmark input: a sawtooth over [-2, 2) with period 100.
pub fn hydrate_input(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i % 100) as f32 / 25.0 - 2.0).collect()
}

fn call(kernel: Kernel, input: &[f32], output: &mut [f32], split: Option<usize>) -> Result<()> {
    match split {
        Some(s) => par_apply(kernel, input, output, s),
        None => kernel.apply(input, output),
    }
}

/// Warm up, then time `iters` back-to-back calls of `kernel` over one buffer.
pub fn run_bench(kernel: Kernel, cfg: &BenchConfig) -> Result<BenchReport> {
    if cfg.size == 0 {
        bail!("bench size must be > 0");
    }
    if cfg.iters == 0 {
        bail!("bench iters must be > 0");
    }

    let input = hydrate_input(cfg.size);
    let mut output = vec![0.0f32; cfg.size];

    debug!(
        "bench {}: size {} warmup {} iters {}",
        kernel, cfg.size, cfg.warmup, cfg.iters
    );

    for _ in 0..cfg.warmup {
        call(kernel, black_box(&input), black_box(&mut output), cfg.parallel_split)?;
    }

    let start = Instant::now();
    for _ in 0..cfg.iters {
        call(kernel, black_box(&input), black_box(&mut output), cfg.parallel_split)?;
    }
    let elapsed = start.elapsed();
    black_box(&output);

    let total_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX).max(1);
    let ns_per_iter = total_ns as f64 / cfg.iters as f64;
    let ns_per_elem = ns_per_iter / cfg.size as f64;
    // elements per ns * 1e3 = million elements per second
    let melem_per_sec = 1e3 / ns_per_elem;

    Ok(BenchReport {
        kernel: kernel.name(),
        size: cfg.size,
        iters: cfg.iters,
        parallel: cfg.parallel_split.is_some(),
        total_ns,
        ns_per_iter,
        ns_per_elem,
        melem_per_sec,
    })
}
