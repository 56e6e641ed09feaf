//! Chunked elementwise map shared by every kernel.
//!
//! A kernel never walks its buffers directly. It hands a planner and a
//! per-chunk transform to [`chunked_map`], which asks the planner how many
//! elements the next step may cover, slices that many off the front of the
//! remaining input/output and calls the transform on the pair.

/// f32 lanes in one 256-bit register. Width of a fast-path chunk.
pub const LANES: usize = 8;

/// Decides how wide the next chunk is given what is left.
///
/// Must return a width in `1..=remaining` whenever `remaining > 0`.
/// Out-of-range answers are clamped by the map so it always progresses.
pub trait ChunkPlanner {
    fn next_width(&self, remaining: usize) -> usize;
}

/// Unit-width planner used by the reference kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarPlanner;

impl ChunkPlanner for ScalarPlanner {
    #[inline(always)]
    fn next_width(&self, remaining: usize) -> usize {
        remaining.min(1)
    }
}

/// Fixed SIMD width capped by the remaining element count.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthPlanner {
    width: usize,
}

impl FixedWidthPlanner {
    /// A zero width is promoted to 1.
    pub const fn new(width: usize) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
        }
    }

    /// Planner for the native lane count.
    pub const fn native() -> Self {
        Self::new(LANES)
    }

    pub const fn width(&self) -> usize {
        self.width
    }
}

impl Default for FixedWidthPlanner {
    fn default() -> Self {
        Self::native()
    }
}

impl ChunkPlanner for FixedWidthPlanner {
    #[inline(always)]
    fn next_width(&self, remaining: usize) -> usize {
        remaining.min(self.width)
    }
}

/// Walk `input` in planner-sized chunks, writing the matching range of
/// `output` through `f`. Returns the number of chunks visited.
///
/// Only `output[..input.len()]` is touched. With an empty input neither
/// buffer is read or written.
#[inline]
pub fn chunked_map<P, F>(planner: &P, input: &[f32], output: &mut [f32], mut f: F) -> usize
where
    P: ChunkPlanner + ?Sized,
    F: FnMut(&[f32], &mut [f32]),
{
    let n = input.len();
    debug_assert!(output.len() >= n);

    let mut i = 0;
    let mut chunks = 0;
    while i < n {
        let remaining = n - i;
        let w = planner.next_width(remaining).clamp(1, remaining);
        f(&input[i..i + w], &mut output[i..i + w]);
        i += w;
        chunks += 1;
    }
    chunks
}

/// In-place variant of [`chunked_map`]: each chunk is read and overwritten.
#[inline]
pub fn chunked_map_inplace<P, F>(planner: &P, data: &mut [f32], mut f: F) -> usize
where
    P: ChunkPlanner + ?Sized,
    F: FnMut(&mut [f32]),
{
    let n = data.len();
    let mut i = 0;
    let mut chunks = 0;
    while i < n {
        let remaining = n - i;
        let w = planner.next_width(remaining).clamp(1, remaining);
        f(&mut data[i..i + w]);
        i += w;
        chunks += 1;
    }
    chunks
}
