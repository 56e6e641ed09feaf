//! Scalar numeric approximations the kernels are built from.
//!
//! Fast path: [`rsqrt_fast`] (Dish) and [`tanh_rational`] (GELU).
//! Reference path: [`sqrt_newton`] (Dish), [`erf_as`] on top of
//! [`exp_neg_poly`] (GELU).
//!
//! The two families are independent on purpose, so a regression in one
//! path shows up as disagreement with the other instead of being shared.
//! Iteration counts and polynomial degrees are fixed; changing any of them
//! changes the error bounds checked in the kernel tests.
#![allow(clippy::excessive_precision)]

/// sqrt(2 / pi)
pub const SQRT_2_OVER_PI: f32 = 0.7978845608;
/// Cubic coefficient of the tanh form of GELU.
pub const GELU_COEF: f32 = 0.044715;
/// 1 / sqrt(2)
pub const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Seed constant for the bit-level inverse square root.
pub const RSQRT_MAGIC: u32 = 0x5f3759df;
/// Two steps keep relative error under ~5e-6 for a in [1, 37].
pub const RSQRT_NEWTON_STEPS: usize = 2;
/// Five steps from y0 = d are enough for d in [1, 37]; larger d converges
/// slower and is not corrected.
pub const SQRT_NEWTON_STEPS: usize = 5;

// tanh(t) ~= t * (A + B t^2) / (1 + D t^2), fit over t in [-5.5, 5.5]
pub const TANH_A: f32 = 0.90030408;
pub const TANH_B: f32 = 0.02400349;
pub const TANH_D: f32 = 0.26035699;

/// Above this exp(-u) is returned as exactly zero (e^-12 ~= 6.1e-6).
pub const EXP_NEG_CUTOFF: f32 = 12.0;

/// Degree-10 fit of exp(-u) on [0, 12], highest power first.
/// Worst-case absolute error ~3e-4, largest near u = 0.
pub const EXP_NEG_COEFFS: [f32; 11] = [
    1.46142604e-09,
    -1.03328834e-07,
    3.24018600e-06,
    -5.96481771e-05,
    7.20241845e-04,
    -6.04450876e-03,
    3.64137587e-02,
    -1.59185221e-01,
    4.94145526e-01,
    -9.97995214e-01,
    9.99830662e-01,
];

// Abramowitz & Stegun 7.1.26
pub const ERF_A1: f32 = 0.254829592;
pub const ERF_A2: f32 = -0.284496736;
pub const ERF_A3: f32 = 1.421413741;
pub const ERF_A4: f32 = -1.453152027;
pub const ERF_A5: f32 = 1.061405429;
pub const ERF_P: f32 = 0.3275911;

/// One Newton-Raphson step for f(y) = 1/y^2 - a.
#[inline(always)]
pub fn rsqrt_newton_step(y: f32, a: f32) -> f32 {
    y * (1.5 - 0.5 * (a * (y * y)))
}

/// Bit-trick seed for 1/sqrt(a), before any refinement.
#[inline(always)]
pub fn rsqrt_seed(a: f32) -> f32 {
    f32::from_bits(RSQRT_MAGIC.wrapping_sub(a.to_bits() >> 1))
}

/// Approximate 1/sqrt(a). Caller guarantees `a > 0`.
#[inline(always)]
pub fn rsqrt_fast(a: f32) -> f32 {
    let mut y = rsqrt_seed(a);
    for _ in 0..RSQRT_NEWTON_STEPS {
        y = rsqrt_newton_step(y, a);
    }
    y
}

/// Rational tanh, clamped to [-1, 1].
///
/// `min`/`max` return the non-NaN operand, so the clamp also holds when
/// `t * t` overflows for very large finite `t`.
#[inline(always)]
pub fn tanh_rational(t: f32) -> f32 {
    let t2 = t * t;
    let num = t * (TANH_B * t2 + TANH_A);
    let den = TANH_D * t2 + 1.0;
    (num / den).min(1.0).max(-1.0)
}

/// exp(-u) for u >= 0 via Horner's method over [`EXP_NEG_COEFFS`].
#[inline]
pub fn exp_neg_poly(u: f32) -> f32 {
    if u > EXP_NEG_CUTOFF {
        return 0.0;
    }
    EXP_NEG_COEFFS[1..]
        .iter()
        .fold(EXP_NEG_COEFFS[0], |y, &c| y * u + c)
}

/// erf(x) via Abramowitz & Stegun 7.1.26.
#[inline]
pub fn erf_as(x: f32) -> f32 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + ERF_P * x);
    let exp_term = exp_neg_poly(x * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;

    let y = (1.0 - poly * exp_term).min(1.0).max(-1.0);
    sign * y
}

/// sqrt(d) by a fixed number of Newton steps starting at `d`.
/// Caller guarantees `d > 0`.
#[inline]
pub fn sqrt_newton(d: f32) -> f32 {
    let mut y = d;
    for _ in 0..SQRT_NEWTON_STEPS {
        y = 0.5 * (y + d / y);
    }
    y
}
