//! Elementwise GELU and Dish activations over f32 slices.
//!
//! Every activation has a fast path (SIMD-width chunks, cheap
//! approximations) and a reference path (scalar loop, an independent
//! approximation family). The two are expected to agree within a bounded
//! error, never bit-for-bit.

pub mod approx;
pub mod chunk;
pub mod cpu_dish;
pub mod cpu_gelu;

use anyhow::{Result, anyhow, bail};
use log::trace;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

use crate::chunk::LANES;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Activation {
    Gelu,
    Dish,
}

impl Activation {
    pub const ALL: [Activation; 2] = [Activation::Gelu, Activation::Dish];

    pub const fn name(self) -> &'static str {
        match self {
            Activation::Gelu => "gelu",
            Activation::Dish => "dish",
        }
    }

    pub const fn fast(self) -> Kernel {
        Kernel::new(self, Path::Fast)
    }

    pub const fn reference(self) -> Kernel {
        Kernel::new(self, Path::Reference)
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gelu" => Ok(Activation::Gelu),
            "dish" => Ok(Activation::Dish),
            other => Err(anyhow!("unknown activation '{}' (expected gelu or dish)", other)),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Path {
    Fast,
    Reference,
}

impl Path {
    pub const fn suffix(self) -> &'static str {
        match self {
            Path::Fast => "fast",
            Path::Reference => "ref",
        }
    }
}

/// One of the four activation kernels.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Kernel {
    pub activation: Activation,
    pub path: Path,
}

impl Kernel {
    pub const GELU_FAST: Kernel = Kernel::new(Activation::Gelu, Path::Fast);
    pub const GELU_REF: Kernel = Kernel::new(Activation::Gelu, Path::Reference);
    pub const DISH_FAST: Kernel = Kernel::new(Activation::Dish, Path::Fast);
    pub const DISH_REF: Kernel = Kernel::new(Activation::Dish, Path::Reference);

    pub const ALL: [Kernel; 4] = [
        Kernel::GELU_FAST,
        Kernel::GELU_REF,
        Kernel::DISH_FAST,
        Kernel::DISH_REF,
    ];

    pub const fn new(activation: Activation, path: Path) -> Self {
        Self { activation, path }
    }

    pub const fn name(&self) -> &'static str {
        match (self.activation, self.path) {
            (Activation::Gelu, Path::Fast) => "gelu_fast",
            (Activation::Gelu, Path::Reference) => "gelu_ref",
            (Activation::Dish, Path::Fast) => "dish_fast",
            (Activation::Dish, Path::Reference) => "dish_ref",
        }
    }

    /// Single-element form of the kernel.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        match (self.activation, self.path) {
            (Activation::Gelu, Path::Fast) => cpu_gelu::gelu_fast(x),
            (Activation::Gelu, Path::Reference) => cpu_gelu::gelu_ref(x),
            (Activation::Dish, Path::Fast) => cpu_dish::dish_fast(x),
            (Activation::Dish, Path::Reference) => cpu_dish::dish_ref(x),
        }
    }

    /// Write `output[i] = kernel(input[i])` for every i.
    pub fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<()> {
        match (self.activation, self.path) {
            (Activation::Gelu, Path::Fast) => cpu_gelu::gelu_fast_arr_f32(input, output),
            (Activation::Gelu, Path::Reference) => cpu_gelu::gelu_ref_arr_f32(input, output),
            (Activation::Dish, Path::Fast) => cpu_dish::dish_fast_arr_f32(input, output),
            (Activation::Dish, Path::Reference) => cpu_dish::dish_ref_arr_f32(input, output),
        }
    }

    pub fn apply_inplace(&self, data: &mut [f32]) -> Result<()> {
        match (self.activation, self.path) {
            (Activation::Gelu, Path::Fast) => cpu_gelu::gelu_fast_inplace_f32(data),
            (Activation::Gelu, Path::Reference) => cpu_gelu::gelu_ref_inplace_f32(data),
            (Activation::Dish, Path::Fast) => cpu_dish::dish_fast_inplace_f32(data),
            (Activation::Dish, Path::Reference) => cpu_dish::dish_ref_inplace_f32(data),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let (act, path) = lower
            .split_once('_')
            .ok_or_else(|| anyhow!("kernel name '{}' should look like gelu_fast", s))?;
        let path = match path {
            "fast" | "rvv" | "simd" => Path::Fast,
            "ref" | "reference" | "scalar" => Path::Reference,
            other => bail!("unknown kernel path '{}' (expected fast or ref)", other),
        };
        Ok(Kernel::new(act.parse()?, path))
    }
}

/// Run `kernel` over disjoint pieces of the buffers on the rayon pool.
///
/// Pieces are at least `min_split` elements, rounded up to a whole number
/// of SIMD chunks, so the fast path still sees full-width chunks. A split
/// larger than the buffer runs the whole buffer as one piece.
pub fn par_apply(kernel: Kernel, input: &[f32], output: &mut [f32], min_split: usize) -> Result<()> {
    if input.len() != output.len() {
        bail!("[kernel][{}] length mismatch", kernel);
    }
    if input.is_empty() {
        return Ok(());
    }

    let split = min_split.clamp(LANES, input.len().max(LANES)).div_ceil(LANES) * LANES;
    trace!(
        "{}: {} elements in pieces of {}",
        kernel,
        input.len(),
        split
    );

    output
        .par_chunks_mut(split)
        .zip(input.par_chunks(split))
        .try_for_each(|(out, inp)| kernel.apply(inp, out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_names_round_trip() {
        let names: Vec<&str> = Kernel::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["gelu_fast", "gelu_ref", "dish_fast", "dish_ref"]);

        for k in Kernel::ALL {
            assert_eq!(k.to_string().parse::<Kernel>().unwrap(), k);
        }
        assert_eq!("GELU_reference".parse::<Kernel>().unwrap(), Kernel::GELU_REF);
        assert_eq!("dish_rvv".parse::<Kernel>().unwrap(), Kernel::DISH_FAST);
        assert!("gelu".parse::<Kernel>().is_err());
        assert!("relu_fast".parse::<Kernel>().is_err());
        assert!("gelu_slow".parse::<Kernel>().is_err());
    }

    #[test]
    fn test_activation_pairs() {
        assert_eq!(Activation::Gelu.fast(), Kernel::GELU_FAST);
        assert_eq!(Activation::Dish.reference(), Kernel::DISH_REF);
        assert_eq!("Dish".parse::<Activation>().unwrap(), Activation::Dish);
        assert!("silu".parse::<Activation>().is_err());
    }

    #[test]
    fn test_apply_matches_eval() {
        let input = [-2.0f32, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0, 4.5];
        for k in Kernel::ALL {
            let mut out = [0.0f32; 9];
            k.apply(&input, &mut out).unwrap();
            for (o, &x) in out.iter().zip(input.iter()) {
                assert_eq!(*o, k.eval(x), "{} at {}", k, x);
            }

            let mut data = input;
            k.apply_inplace(&mut data).unwrap();
            assert_eq!(data, out);
        }
    }

    #[test]
    fn test_zero_length_writes_nothing() {
        let mut sentinel = [42.0f32; 4];
        for k in Kernel::ALL {
            k.apply(&[], &mut sentinel[..0]).unwrap();
            k.apply_inplace(&mut sentinel[..0]).unwrap();
        }
        assert_eq!(sentinel, [42.0; 4]);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let input: Vec<f32> = (0..100).map(|i| (i % 100) as f32 / 25.0 - 2.0).collect();
        for k in Kernel::ALL {
            let mut first = vec![0.0f32; input.len()];
            let mut second = vec![0.0f32; input.len()];
            k.apply(&input, &mut first).unwrap();
            k.apply(&input, &mut second).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_par_apply_matches_serial() {
        let input: Vec<f32> = (0..10_003).map(|i| (i % 1201) as f32 * 0.01 - 6.0).collect();
        for k in Kernel::ALL {
            let mut serial = vec![0.0f32; input.len()];
            let mut parallel = vec![0.0f32; input.len()];
            k.apply(&input, &mut serial).unwrap();
            par_apply(k, &input, &mut parallel, 1000).unwrap();
            assert_eq!(serial, parallel, "{}", k);
        }
    }

    #[test]
    fn test_par_apply_length_mismatch() {
        let mut out = [0.0f32; 3];
        assert!(par_apply(Kernel::GELU_FAST, &[1.0; 4], &mut out, 1).is_err());
        assert!(par_apply(Kernel::GELU_FAST, &[], &mut [], 0).is_ok());
    }

    #[test]
    fn test_par_apply_huge_split() {
        let input: Vec<f32> = (0..19).map(|i| i as f32 * 0.5 - 4.0).collect();
        for k in Kernel::ALL {
            let mut serial = vec![0.0f32; input.len()];
            k.apply(&input, &mut serial).unwrap();
            for split in [usize::MAX, usize::MAX / 2, usize::MAX - LANES + 1] {
                let mut parallel = vec![0.0f32; input.len()];
                par_apply(k, &input, &mut parallel, split).unwrap();
                assert_eq!(serial, parallel, "{} split {}", k, split);
            }
        }
    }
}
