//! Synthetic rasters for tests and benchmarks.

use crate::raster::{ChannelLayout, Raster};

/// Small xorshift generator so synthetic frames are reproducible.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

/// Noisy flat field: every sample is `level ± spread`, clamped to the layout's range.
pub fn noisy_raster(
    width: usize,
    height: usize,
    layout: ChannelLayout,
    level: u16,
    spread: u16,
    seed: u64,
) -> Raster {
    let mut rng = XorShift::new(seed);
    let max = layout.max_sample_value() as i64;
    let samples = (0..width * height * layout.channel_count())
        .map(|_| {
            let jitter = rng.below(2 * spread as u64 + 1) as i64 - spread as i64;
            (level as i64 + jitter).clamp(0, max) as u16
        })
        .collect();
    Raster::new(width, height, layout, samples)
}

/// Monochrome raster of `background` with `value` written at each `(x, y)`.
pub fn spike_raster(
    width: usize,
    height: usize,
    background: u16,
    spikes: &[(usize, usize, u16)],
) -> Raster {
    let mut samples = vec![background; width * height];
    for &(x, y, value) in spikes {
        samples[y * width + x] = value;
    }
    Raster::mono16(width, height, samples)
}
