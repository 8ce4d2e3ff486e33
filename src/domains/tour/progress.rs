/// Completion percentage for display.
///
/// A route without segments is complete by definition.
pub fn progress_percent(segment_index: usize, fraction: f64, total_segments: usize) -> u8 {
    if total_segments == 0 {
        return 100;
    }
    let overall = (segment_index as f64 + fraction) / total_segments as f64;
    (overall * 100.0).floor().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_and_clamps() {
        assert_eq!(progress_percent(0, 0.0, 2), 0);
        assert_eq!(progress_percent(0, 0.5, 2), 25);
        assert_eq!(progress_percent(1, 0.5, 3), 50);
        assert_eq!(progress_percent(2, 0.0, 2), 100);
        assert_eq!(progress_percent(5, 0.5, 2), 100);
    }

    #[test]
    fn never_decreases_along_the_route() {
        let mut last = 0;
        for index in 0..4 {
            for step in 0..50 {
                let percent = progress_percent(index, f64::from(step) / 50.0, 4);
                assert!(percent >= last);
                assert!(percent <= 100);
                last = percent;
            }
        }
        assert_eq!(progress_percent(4, 0.0, 4), 100);
    }

    #[test]
    fn empty_route_is_complete() {
        assert_eq!(progress_percent(0, 0.0, 0), 100);
    }
}
