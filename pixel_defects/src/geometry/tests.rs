use std::collections::HashSet;

use super::*;
use crate::raster::ChannelLayout;

#[test]
fn test_3x3_offsets() {
    let geometry = NeighborhoodGeometry::new(3, 10).unwrap();

    assert_eq!(geometry.offsets(), &[0, 1, 2, 10, 12, 20, 21, 22]);
    assert_eq!(geometry.center_offset(), 11);
    assert_eq!(geometry.valid_column_bound(), 8);
    assert_eq!(geometry.margin(), 1);
    assert_eq!(geometry.last_offset(), 22);
}

#[test]
fn test_5x5_offsets_cover_square() {
    let width = 9;
    let geometry = NeighborhoodGeometry::new(5, width).unwrap();

    assert_eq!(geometry.offsets().len(), 24);
    assert_eq!(geometry.center_offset(), 2 * width + 2);
    assert_eq!(geometry.valid_column_bound(), 5);

    let mut cells: HashSet<usize> = geometry.offsets().iter().copied().collect();
    assert_eq!(cells.len(), 24, "offsets must be distinct");
    assert!(cells.insert(geometry.center_offset()));

    let expected: HashSet<usize> = (0..5)
        .flat_map(|row| (0..5).map(move |col| row * width + col))
        .collect();
    assert_eq!(cells, expected);
}

#[test]
fn test_invalid_window_sizes() {
    for window_size in [0, 1, 2, 4, 6, 7] {
        let err = NeighborhoodGeometry::new(window_size, 16).unwrap_err();
        assert!(
            matches!(err, Error::InvalidWindowSize { window_size: w, .. } if w == window_size),
            "window {window_size}: {err}"
        );
    }
}

#[test]
fn test_origins_never_wrap_rows() {
    let width = 7;
    let height = 6;
    for window_size in [3, 5] {
        let geometry = NeighborhoodGeometry::new(window_size, width).unwrap();
        for origin in geometry.origins(width * height) {
            let (ox, oy) = (origin % width, origin / width);
            for &offset in geometry.offsets() {
                let cell = origin + offset;
                let (cx, cy) = (cell % width, cell / width);
                assert!(cell < width * height);
                assert!(cx >= ox && cx < ox + window_size, "column wrap at {origin}");
                assert!(cy >= oy && cy < oy + window_size, "row overflow at {origin}");
            }
        }
    }
}

#[test]
fn test_origins_reach_every_interior_pixel_once() {
    let width = 8;
    let height = 7;
    for window_size in [3, 5] {
        let geometry = NeighborhoodGeometry::new(window_size, width).unwrap();
        let margin = geometry.margin();
        let centers: Vec<usize> = geometry
            .origins(width * height)
            .map(|origin| origin + geometry.center_offset())
            .collect();

        let expected: Vec<usize> = (margin..height - margin)
            .flat_map(|y| (margin..width - margin).map(move |x| y * width + x))
            .collect();
        assert_eq!(centers, expected, "window {window_size}");
    }
}

#[test]
fn test_5x5_on_5x5_tests_only_center() {
    let raster = Raster::new_filled(5, 5, ChannelLayout::Mono16, 0);
    let geometry = NeighborhoodGeometry::for_raster(5, &raster).unwrap();

    assert_eq!(geometry.valid_column_bound(), 1);
    assert_eq!(geometry.origin_range(raster.pixel_count()), 0..1);
    let centers: Vec<usize> = geometry
        .origins(raster.pixel_count())
        .map(|origin| origin + geometry.center_offset())
        .collect();
    assert_eq!(centers, vec![12]);
}

#[test]
fn test_5x5_on_4x4_is_rejected() {
    let raster = Raster::new_filled(4, 4, ChannelLayout::Mono16, 0);
    let err = NeighborhoodGeometry::for_raster(5, &raster).unwrap_err();
    assert!(
        matches!(
            err,
            Error::ImageTooSmall {
                width: 4,
                height: 4,
                window_size: 5
            }
        ),
        "{err}"
    );
}

#[test]
fn test_narrow_but_tall_image_is_rejected() {
    let raster = Raster::new_filled(2, 10, ChannelLayout::Mono16, 0);
    assert!(NeighborhoodGeometry::for_raster(3, &raster).is_err());
}
