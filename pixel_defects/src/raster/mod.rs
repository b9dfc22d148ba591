//! In-memory pixel buffer analysed by the detectors.

mod tiff_source;


use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub use tiff_source::{ImageSource, TiffSource};

/// Sample layout of a [`Raster`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// One 16-bit sample per pixel.
    #[default]
    Mono16,
    /// Four 8-bit samples per pixel (R, G, B, A byte lanes).
    Rgba8,
}

impl ChannelLayout {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::Mono16 => 1,
            ChannelLayout::Rgba8 => 4,
        }
    }

    /// Largest value a single sample can hold.
    pub fn max_sample_value(self) -> u16 {
        match self {
            ChannelLayout::Mono16 => u16::MAX,
            ChannelLayout::Rgba8 => u8::MAX as u16,
        }
    }
}

/// Row-major pixel buffer with channel-interleaved samples.
///
/// Immutable once built; detectors only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    layout: ChannelLayout,
    samples: Vec<u16>,
}

impl Raster {
    /// Build a raster from channel-interleaved samples.
    ///
    /// Panics if the sample count does not match `width * height * channels`.
    pub fn new(width: usize, height: usize, layout: ChannelLayout, samples: Vec<u16>) -> Self {
        assert!(width > 0 && height > 0, "raster dimensions must be positive");
        assert_eq!(
            samples.len(),
            width * height * layout.channel_count(),
            "samples length must equal width * height * channels"
        );
        debug_assert!(samples.iter().all(|&s| s <= layout.max_sample_value()));

        Self {
            width,
            height,
            layout,
            samples,
        }
    }

    pub fn mono16(width: usize, height: usize, samples: Vec<u16>) -> Self {
        Self::new(width, height, ChannelLayout::Mono16, samples)
    }

    pub fn rgba8(width: usize, height: usize, pixels: &[[u8; 4]]) -> Self {
        let samples = pixels
            .iter()
            .flat_map(|px| px.iter().map(|&v| v as u16))
            .collect();
        Self::new(width, height, ChannelLayout::Rgba8, samples)
    }

    /// Build an RGBA raster from packed 32-bit words where channel `c` lives in
    /// bits `8c..8c+8`.
    pub fn from_packed_rgba(width: usize, height: usize, words: &[u32]) -> Self {
        let samples = words
            .iter()
            .flat_map(|&word| (0..4).map(move |channel| ((word >> (channel * 8)) & 0xff) as u16))
            .collect();
        Self::new(width, height, ChannelLayout::Rgba8, samples)
    }

    pub fn new_filled(width: usize, height: usize, layout: ChannelLayout, value: u16) -> Self {
        Self::new(
            width,
            height,
            layout,
            vec![value; width * height * layout.channel_count()],
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.layout.channel_count()
    }

    #[inline]
    pub fn max_sample_value(&self) -> u16 {
        self.layout.max_sample_value()
    }

    /// Sample of pixel `index` (row-major) in `channel`.
    #[inline]
    pub fn sample(&self, index: usize, channel: usize) -> u16 {
        debug_assert!(index < self.pixel_count() && channel < self.channel_count());
        self.samples[index * self.channel_count() + channel]
    }

    /// Column and row of a linear pixel index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }
}
