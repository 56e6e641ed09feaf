//! Dish activation over raw f32 slices.
//!
//! dish(x) = x * 0.5 * (1 + x / sqrt(1 + x^2))
//!
//! Fast path: bit-trick inverse square root, chunked at SIMD width.
//! Reference path: Newton square root, one element at a time.

use crate::approx::{rsqrt_fast, sqrt_newton};
use crate::chunk::{FixedWidthPlanner, ScalarPlanner, chunked_map, chunked_map_inplace};

#[inline(always)]
pub fn dish_fast(x: f32) -> f32 {
    let sigmoidal_input = x * x + 1.0;
    let rsqrt = rsqrt_fast(sigmoidal_input);
    let s = (x * rsqrt + 1.0) * 0.5;
    x * s
}

#[inline]
pub fn dish_ref(x: f32) -> f32 {
    let denom = 1.0 + x * x;
    let y = sqrt_newton(denom);
    let s = 0.5 * (1.0 + x / y);
    x * s
}

#[inline(always)]
fn dish_fast_chunk(x: &[f32], out: &mut [f32]) {
    for (o, &v) in out.iter_mut().zip(x) {
        *o = dish_fast(v);
    }
}

/// Dish (fast rsqrt, SIMD-width chunks) over a raw slice of f32
pub fn dish_fast_arr_f32(input: &[f32], output: &mut [f32]) -> anyhow::Result<()> {
    if input.len() != output.len() {
        anyhow::bail!("[kernel][dish_fast] length mismatch");
    }

    chunked_map(&FixedWidthPlanner::native(), input, output, dish_fast_chunk);

    Ok(())
}

pub fn dish_fast_inplace_f32(data: &mut [f32]) -> anyhow::Result<()> {
    chunked_map_inplace(&FixedWidthPlanner::native(), data, |chunk| {
        for v in chunk.iter_mut() {
            *v = dish_fast(*v);
        }
    });

    Ok(())
}

/// Dish (Newton sqrt, scalar) over a raw slice of f32
pub fn dish_ref_arr_f32(input: &[f32], output: &mut [f32]) -> anyhow::Result<()> {
    if input.len() != output.len() {
        anyhow::bail!("[kernel][dish_ref] length mismatch");
    }

    chunked_map(&ScalarPlanner, input, output, |x, o| o[0] = dish_ref(x[0]));

    Ok(())
}

pub fn dish_ref_inplace_f32(data: &mut [f32]) -> anyhow::Result<()> {
    chunked_map_inplace(&ScalarPlanner, data, |c| c[0] = dish_ref(c[0]));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBES: [f32; 8] = [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0];

    fn dish_f64(x: f64) -> f64 {
        0.5 * x * (1.0 + x / (1.0 + x * x).sqrt())
    }

    #[test]
    fn test_dish_ref_probe_values() {
        let mut out = [0.0f32; 8];
        dish_ref_arr_f32(&PROBES, &mut out).unwrap();

        assert_eq!(out[3], 0.0);
        assert!((out[5] - 0.8536).abs() < 1e-4, "dish_ref(1) = {}", out[5]);
        assert!((out[1] + 0.1464).abs() < 1e-4, "dish_ref(-1) = {}", out[1]);
    }

    #[test]
    fn test_dish_fast_agrees_with_ref() {
        let input: Vec<f32> = (0..=1200).map(|i| -6.0 + i as f32 * 0.01).collect();
        let mut fast = vec![0.0f32; input.len()];
        let mut reference = vec![0.0f32; input.len()];
        dish_fast_arr_f32(&input, &mut fast).unwrap();
        dish_ref_arr_f32(&input, &mut reference).unwrap();

        for (i, (f, r)) in fast.iter().zip(reference.iter()).enumerate() {
            assert!(
                (f - r).abs() < 0.01,
                "Mismatch at x = {}: fast {}, ref {}",
                input[i],
                f,
                r
            );
            let exact = dish_f64(input[i] as f64);
            assert!((*f as f64 - exact).abs() < 1e-3, "dish_fast({})", input[i]);
        }

        let mut fast = [0.0f32; 8];
        let mut reference = [0.0f32; 8];
        dish_fast_arr_f32(&PROBES, &mut fast).unwrap();
        dish_ref_arr_f32(&PROBES, &mut reference).unwrap();
        for i in 0..PROBES.len() {
            assert!((fast[i] - reference[i]).abs() < 0.01, "probe {}", PROBES[i]);
        }
    }

    #[test]
    fn test_dish_inplace_matches_out_of_place() {
        let input: Vec<f32> = (0..33).map(|i| i as f32 * 0.3 - 5.0).collect();

        let mut out = vec![0.0f32; input.len()];
        dish_fast_arr_f32(&input, &mut out).unwrap();
        let mut data = input.clone();
        dish_fast_inplace_f32(&mut data).unwrap();
        assert_eq!(out, data);

        dish_ref_arr_f32(&input, &mut out).unwrap();
        let mut data = input.clone();
        dish_ref_inplace_f32(&mut data).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_dish_is_elementwise() {
        let input = [3.0f32, -0.5, 3.0, 2.0, -2.0];
        let permuted = [-2.0f32, 3.0, 2.0, -0.5, 3.0];
        let mut out = [0.0f32; 5];
        let mut out_p = [0.0f32; 5];
        dish_fast_arr_f32(&input, &mut out).unwrap();
        dish_fast_arr_f32(&permuted, &mut out_p).unwrap();

        assert_eq!(out[0], out[2]);
        assert_eq!(out_p[0], out[4]);
        assert_eq!(out_p[1], out[0]);
        assert_eq!(out_p[2], out[3]);
        assert_eq!(out_p[3], out[1]);
    }

    #[test]
    fn test_dish_length_mismatch() {
        let input = [1.0f32; 4];
        let mut output = [0.0f32; 2];
        assert!(dish_fast_arr_f32(&input, &mut output).is_err());
        assert!(dish_ref_arr_f32(&input, &mut output).is_err());
    }

    #[test]
    fn test_dish_empty() {
        assert!(dish_fast_arr_f32(&[], &mut []).is_ok());
        assert!(dish_ref_arr_f32(&[], &mut []).is_ok());
        assert!(dish_ref_inplace_f32(&mut []).is_ok());
    }
}
