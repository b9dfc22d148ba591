use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::{PhotometricInterpretation, PlanarConfiguration, Tag};
use tiff::TiffError;

use super::{ChannelLayout, Raster};
use crate::error::LoadError;

/// Produces a [`Raster`] for analysis.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<Raster, LoadError>;
}

/// Loads uncompressed or compressed TIFF files with a fixed expected layout.
#[derive(Debug, Clone, Copy)]
pub struct TiffSource {
    /// Layout the file must have; anything else is rejected.
    pub layout: ChannelLayout,
    /// Smallest accepted width and height.
    pub min_dimension: usize,
}

impl Default for TiffSource {
    fn default() -> Self {
        Self {
            layout: ChannelLayout::Mono16,
            min_dimension: 5,
        }
    }
}

impl TiffSource {
    pub fn new(layout: ChannelLayout, min_dimension: usize) -> Self {
        Self {
            layout,
            min_dimension,
        }
    }
}

impl ImageSource for TiffSource {
    fn load(&self, path: &Path) -> Result<Raster, LoadError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => read_failure(path, e),
        })?;

        let mut decoder = Decoder::new(BufReader::new(file)).map_err(|e| tiff_failure(path, e))?;

        let planar = decoder
            .find_tag_unsigned::<u16>(Tag::PlanarConfiguration)
            .map_err(|e| tiff_failure(path, e))?
            .unwrap_or(PlanarConfiguration::Chunky.to_u16());
        if planar != PlanarConfiguration::Chunky.to_u16() {
            return Err(unsupported(path, "planar sample layout is not contiguous"));
        }

        let expected_photometric = match self.layout {
            ChannelLayout::Mono16 => PhotometricInterpretation::BlackIsZero,
            ChannelLayout::Rgba8 => PhotometricInterpretation::RGB,
        };
        let photometric = decoder
            .find_tag_unsigned::<u16>(Tag::PhotometricInterpretation)
            .map_err(|e| tiff_failure(path, e))?;
        if photometric != Some(expected_photometric.to_u16()) {
            return Err(unsupported(
                path,
                format!(
                    "photometric interpretation {:?}, expected {:?}",
                    photometric.and_then(PhotometricInterpretation::from_u16),
                    expected_photometric
                ),
            ));
        }

        let color_type = decoder.colortype().map_err(|e| tiff_failure(path, e))?;
        let expected_color_type = match self.layout {
            ChannelLayout::Mono16 => tiff::ColorType::Gray(16),
            ChannelLayout::Rgba8 => tiff::ColorType::RGBA(8),
        };
        if color_type != expected_color_type {
            return Err(unsupported(
                path,
                format!("color type {color_type:?}, expected {expected_color_type:?}"),
            ));
        }

        let (width, height) = decoder.dimensions().map_err(|e| tiff_failure(path, e))?;
        let (width, height) = (width as usize, height as usize);
        if width < self.min_dimension || height < self.min_dimension {
            return Err(LoadError::ImageTooSmall {
                path: path.to_path_buf(),
                width,
                height,
                min: self.min_dimension,
            });
        }

        let sample_count = width * height * self.layout.channel_count();
        let decoded = decoder.read_image().map_err(|e| match e {
            TiffError::LimitsExceeded => LoadError::AllocationFailure {
                path: path.to_path_buf(),
                bytes: sample_count * std::mem::size_of::<u16>(),
            },
            e => tiff_failure(path, e),
        })?;

        let samples = match decoded {
            DecodingResult::U16(buf) => buf,
            DecodingResult::U8(buf) => {
                let mut samples = Vec::new();
                samples
                    .try_reserve_exact(buf.len())
                    .map_err(|_| LoadError::AllocationFailure {
                        path: path.to_path_buf(),
                        bytes: buf.len() * std::mem::size_of::<u16>(),
                    })?;
                samples.extend(buf.iter().map(|&v| v as u16));
                samples
            }
            _ => return Err(unsupported(path, "sample format is not unsigned integer")),
        };

        if samples.len() != sample_count {
            return Err(LoadError::ReadFailure {
                path: path.to_path_buf(),
                reason: format!(
                    "decoded {} samples, expected {}",
                    samples.len(),
                    sample_count
                ),
            });
        }

        tracing::info!(
            path = %path.display(),
            width,
            height,
            layout = %self.layout,
            "Loaded raster"
        );

        Ok(Raster::new(width, height, self.layout, samples))
    }
}

fn unsupported(path: &Path, reason: impl Into<String>) -> LoadError {
    LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn read_failure(path: &Path, e: impl std::fmt::Display) -> LoadError {
    LoadError::ReadFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn tiff_failure(path: &Path, e: TiffError) -> LoadError {
    match e {
        TiffError::UnsupportedError(inner) => unsupported(path, inner.to_string()),
        e => read_failure(path, e),
    }
}

#[cfg(test)]
mod tests {
    use tiff::encoder::{colortype, TiffEncoder};

    use super::*;

    fn write_gray16(path: &Path, width: u32, height: u32, data: &[u16]) {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray16>(width, height, data)
            .unwrap();
    }

    fn write_rgba8(path: &Path, width: u32, height: u32, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::RGBA8>(width, height, data)
            .unwrap();
    }

    #[test]
    fn test_load_mono16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.tif");
        let data: Vec<u16> = (0..35).map(|i| i * 1000).collect();
        write_gray16(&path, 7, 5, &data);

        let raster = TiffSource::default().load(&path).unwrap();

        assert_eq!(raster.width(), 7);
        assert_eq!(raster.height(), 5);
        assert_eq!(raster.layout(), ChannelLayout::Mono16);
        assert_eq!(raster.sample(0, 0), 0);
        assert_eq!(raster.sample(34, 0), 34000);
    }

    #[test]
    fn test_load_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.tif");
        let data: Vec<u8> = (0..25u8).flat_map(|i| [i, i + 1, i + 2, 255]).collect();
        write_rgba8(&path, 5, 5, &data);

        let raster = TiffSource::new(ChannelLayout::Rgba8, 5).load(&path).unwrap();

        assert_eq!(raster.channel_count(), 4);
        assert_eq!(raster.sample(10, 0), 10);
        assert_eq!(raster.sample(10, 2), 12);
        assert_eq!(raster.sample(10, 3), 255);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TiffSource::default()
            .load(&dir.path().join("absent.tif"))
            .unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }), "{err}");
    }

    #[test]
    fn test_layout_mismatch_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.tif");
        write_gray16(&path, 5, 5, &[0; 25]);

        let err = TiffSource::new(ChannelLayout::Rgba8, 5)
            .load(&path)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }), "{err}");
    }

    #[test]
    fn test_too_small() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.tif");
        write_gray16(&path, 4, 4, &[0; 16]);

        let err = TiffSource::default().load(&path).unwrap_err();
        assert!(
            matches!(
                err,
                LoadError::ImageTooSmall {
                    width: 4,
                    height: 4,
                    min: 5,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn test_garbage_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.tif");
        std::fs::write(&path, b"definitely not a tiff").unwrap();

        let err = TiffSource::default().load(&path).unwrap_err();
        assert!(
            matches!(
                err,
                LoadError::ReadFailure { .. } | LoadError::UnsupportedFormat { .. }
            ),
            "{err}"
        );
    }
}
