use actv_core_kernel::Activation;
use anyhow::{Result, bail};
use log::debug;
use serde::Serialize;

/// Inputs the correctness check uses when none are given.
pub const PROBE_INPUTS: [f32; 8] = [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0];

/// Largest fast-vs-reference gap accepted for an activation on [-6, 6].
pub fn default_tolerance(activation: Activation) -> f32 {
    match activation {
        Activation::Gelu => 0.02,
        Activation::Dish => 0.01,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckRow {
    pub x: f32,
    pub fast: f32,
    pub reference: f32,
    pub abs_diff: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub activation: &'static str,
    pub rows: Vec<CheckRow>,
    pub max_abs_diff: f32,
    pub tolerance: f32,
    pub passed: bool,
}

/// Run the fast and reference kernels of `activation` on the same inputs
/// and compare them element by element.
pub fn run_check(activation: Activation, inputs: &[f32], tolerance: f32) -> Result<CheckReport> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        bail!("tolerance must be a finite non-negative number, got {}", tolerance);
    }

    let mut fast = vec![0.0f32; inputs.len()];
    let mut reference = vec![0.0f32; inputs.len()];
    activation.fast().apply(inputs, &mut fast)?;
    activation.reference().apply(inputs, &mut reference)?;

    let rows: Vec<CheckRow> = inputs
        .iter()
        .zip(fast.iter().zip(reference.iter()))
        .map(|(&x, (&f, &r))| CheckRow {
            x,
            fast: f,
            reference: r,
            abs_diff: (f - r).abs(),
        })
        .collect();

    // NaN compares false, so a NaN gap fails the check below
    let max_abs_diff = rows.iter().map(|r| r.abs_diff).fold(0.0f32, |m, d| {
        if d.is_nan() || m.is_nan() { f32::NAN } else { m.max(d) }
    });
    let passed = max_abs_diff <= tolerance;

    debug!(
        "check {}: {} points, max |fast - ref| = {:e} (tol {:e})",
        activation,
        rows.len(),
        max_abs_diff,
        tolerance
    );

    Ok(CheckReport {
        activation: activation.name(),
        rows,
        max_abs_diff,
        tolerance,
        passed,
    })
}
