//! Mean-neighborhood detector.
//!
//! A pixel is flagged when, in any channel, the arithmetic mean of the
//! `k*k - 1` surrounding samples differs from the pixel by more than the
//! threshold. Works for 3x3 and 5x5 windows.

use super::scan_windows;
use crate::error::Result;
use crate::geometry::NeighborhoodGeometry;
use crate::math::exceeds_threshold;
use crate::raster::Raster;

pub fn detect(raster: &Raster, window_size: usize, threshold: f64) -> Result<Vec<usize>> {
    let geometry = NeighborhoodGeometry::for_raster(window_size, raster)?;
    let neighbor_count = geometry.offsets().len() as f64;
    let channels = raster.channel_count();

    Ok(scan_windows(&geometry, raster.pixel_count(), |origin| {
        let center = origin + geometry.center_offset();
        (0..channels).any(|channel| {
            let sum: u32 = geometry
                .offsets()
                .iter()
                .map(|&offset| raster.sample(origin + offset, channel) as u32)
                .sum();
            let mean = sum as f64 / neighbor_count;
            let delta = mean - raster.sample(center, channel) as f64;
            exceeds_threshold(delta, threshold)
        })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ChannelLayout;

    #[test]
    fn test_mean_uses_real_division() {
        // Neighbors sum to 7, mean 0.875 against a center of 0: flagged at
        // 0.8 but not at 0.9. Integer division would give 0 and miss it.
        let mut samples = vec![0u16; 9];
        samples[0] = 7;
        let raster = Raster::mono16(3, 3, samples);

        assert_eq!(detect(&raster, 3, 0.8).unwrap(), vec![4]);
        assert!(detect(&raster, 3, 0.9).unwrap().is_empty());
    }

    #[test]
    fn test_dark_pixel_is_flagged() {
        let mut raster_samples = vec![1000u16; 25];
        raster_samples[12] = 0;
        let raster = Raster::mono16(5, 5, raster_samples);

        assert_eq!(detect(&raster, 5, 999.0).unwrap(), vec![12]);
        assert!(detect(&raster, 5, 1000.0).unwrap().is_empty());
    }

    #[test]
    fn test_5x5_divides_by_24() {
        let mut samples = vec![0u16; 25];
        samples[0] = 240;
        let raster = Raster::mono16(5, 5, samples);

        // Mean is exactly 10.
        assert_eq!(detect(&raster, 5, 9.99).unwrap(), vec![12]);
        assert!(detect(&raster, 5, 10.0).unwrap().is_empty());
    }

    #[test]
    fn test_single_offending_channel_flags_pixel() {
        let mut pixels = vec![[50u8, 50, 50, 255]; 9];
        pixels[4] = [50, 50, 200, 255];
        let raster = Raster::rgba8(3, 3, &pixels);

        assert_eq!(raster.layout(), ChannelLayout::Rgba8);
        assert_eq!(detect(&raster, 3, 100.0).unwrap(), vec![4]);
        assert!(detect(&raster, 3, 150.0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_window() {
        let raster = Raster::new_filled(9, 9, ChannelLayout::Mono16, 0);
        assert!(detect(&raster, 4, 1.0).is_err());
        assert!(detect(&raster, 7, 1.0).is_err());
    }
}
