//! Small numeric helpers shared by the detectors.

/// Median of exactly three values.
///
/// Returns the middle value under the total order of `T`, so any permutation of
/// the same inputs yields the same result and `median3(x, x, y) == x`.
#[inline]
pub fn median3<T: Ord + Copy>(a: T, b: T, c: T) -> T {
    let lo = a.min(b);
    let hi = a.max(b);
    lo.max(hi.min(c))
}

/// Two-branch deviation test: positive deltas must exceed `threshold`,
/// negative deltas must fall below `-threshold`.
#[inline]
pub fn exceeds_threshold(delta: f64, threshold: f64) -> bool {
    if delta >= 0.0 {
        delta > threshold
    } else {
        delta < -threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median3_all_orderings() {
        let values = [3u16, 7, 11];
        let orderings = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orderings {
            let [a, b, c] = order.map(|i| values[i]);
            assert_eq!(median3(a, b, c), 7, "median3({a}, {b}, {c})");
        }
    }

    #[test]
    fn test_median3_duplicates() {
        assert_eq!(median3(5, 5, 9), 5);
        assert_eq!(median3(9, 5, 5), 5);
        assert_eq!(median3(5, 9, 5), 5);
        assert_eq!(median3(9, 9, 5), 9);
        assert_eq!(median3(4, 4, 4), 4);
        for x in [0u16, 1, 300, u16::MAX] {
            for y in [0u16, 2, 65000] {
                assert_eq!(median3(x, x, y), x, "median3({x}, {x}, {y})");
            }
        }
    }

    #[test]
    fn test_exceeds_threshold_matches_absolute_value() {
        let thresholds = [0.0, 0.5, 1.0, 25.5, 6553.5];
        let mut delta = -100.0;
        while delta <= 100.0 {
            for &threshold in &thresholds {
                assert_eq!(
                    exceeds_threshold(delta, threshold),
                    delta.abs() > threshold,
                    "delta={delta}, threshold={threshold}"
                );
            }
            delta += 0.125;
        }
    }

    #[test]
    fn test_exceeds_threshold_boundaries() {
        assert!(!exceeds_threshold(10.0, 10.0));
        assert!(!exceeds_threshold(-10.0, 10.0));
        assert!(exceeds_threshold(10.000001, 10.0));
        assert!(exceeds_threshold(-10.000001, 10.0));
        assert!(!exceeds_threshold(0.0, 0.0));
        assert!(!exceeds_threshold(-0.0, 0.0));
    }
}
