//! GELU over raw f32 slices.
//!
//! gelu(x) = 0.5 * x * (1 + erf(x / sqrt(2)))
//!         ~= 0.5 * x * (1 + tanh(sqrt(2/pi) * (x + 0.044715 x^3)))
//!
//! The fast path uses the tanh form with a rational tanh, chunked at SIMD
//! width. The reference path uses the erf form one element at a time.

use crate::approx::{FRAC_1_SQRT_2, GELU_COEF, SQRT_2_OVER_PI, erf_as, tanh_rational};
use crate::chunk::{FixedWidthPlanner, ScalarPlanner, chunked_map, chunked_map_inplace};

#[inline(always)]
pub fn gelu_fast(x: f32) -> f32 {
    let x3 = x * x * x;
    let poly = x + GELU_COEF * x3;
    let inner = SQRT_2_OVER_PI * poly;
    let tanh = tanh_rational(inner);
    x * (tanh + 1.0) * 0.5
}

#[inline]
pub fn gelu_ref(x: f32) -> f32 {
    0.5 * x * (1.0 + erf_as(x * FRAC_1_SQRT_2))
}

#[inline(always)]
fn gelu_fast_chunk(x: &[f32], out: &mut [f32]) {
    for (o, &v) in out.iter_mut().zip(x) {
        *o = gelu_fast(v);
    }
}

/// GELU (tanh approximation, SIMD-width chunks) over a raw slice of f32
pub fn gelu_fast_arr_f32(input: &[f32], output: &mut [f32]) -> anyhow::Result<()> {
    if input.len() != output.len() {
        anyhow::bail!("[kernel][gelu_fast] length mismatch");
    }

    chunked_map(&FixedWidthPlanner::native(), input, output, gelu_fast_chunk);

    Ok(())
}

pub fn gelu_fast_inplace_f32(data: &mut [f32]) -> anyhow::Result<()> {
    chunked_map_inplace(&FixedWidthPlanner::native(), data, |chunk| {
        for v in chunk.iter_mut() {
            *v = gelu_fast(*v);
        }
    });

    Ok(())
}

/// GELU (erf definition, scalar) over a raw slice of f32
pub fn gelu_ref_arr_f32(input: &[f32], output: &mut [f32]) -> anyhow::Result<()> {
    if input.len() != output.len() {
        anyhow::bail!("[kernel][gelu_ref] length mismatch");
    }

    chunked_map(&ScalarPlanner, input, output, |x, o| o[0] = gelu_ref(x[0]));

    Ok(())
}

pub fn gelu_ref_inplace_f32(data: &mut [f32]) -> anyhow::Result<()> {
    chunked_map_inplace(&ScalarPlanner, data, |c| c[0] = gelu_ref(c[0]));

    Ok(())
}
