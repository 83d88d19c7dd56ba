/// Tick generation for the time axis.
///
/// Pure function of the visible window, the pixel width it maps onto, and the
/// zoom level. Times are millisecond offsets from the window start; labels
/// render as seconds with one decimal.

/// One tick mark on the ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Offset from the window start, in milliseconds.
    pub time_ms: f64,
    /// Horizontal pixel position within the group width.
    pub x: f32,
    pub label: String,
}

/// How many raw subdivisions to aim for at a given zoom level.
fn bucket_count(zoom: u32) -> f64 {
    if zoom < 50 {
        10.0
    } else if zoom < 100 {
        20.0
    } else {
        30.0
    }
}

/// Round a raw spacing up to the nearest k * 10^m, k in {1, 2, 5}.
fn nice_spacing(raw_ms: f64) -> f64 {
    let magnitude = 10f64.powf(raw_ms.log10().floor());
    for k in [1.0, 2.0, 5.0] {
        let candidate = k * magnitude;
        if candidate >= raw_ms {
            return candidate;
        }
    }
    10.0 * magnitude
}

/// Emit ticks at 0, spacing, 2*spacing, ... while <= window_ms.
pub fn ticks(window_ms: f64, pixel_width: f32, zoom: u32) -> Vec<Tick> {
    if !(window_ms > 0.0) || pixel_width <= 0.0 {
        return Vec::new();
    }

    // Floor at one millisecond so degenerate windows can't explode the count.
    let raw = (window_ms / bucket_count(zoom)).max(1.0);
    let spacing = nice_spacing(raw);

    let mut out = Vec::new();
    let mut i = 0u32;
    loop {
        let t = i as f64 * spacing;
        if t > window_ms {
            break;
        }
        out.push(Tick {
            time_ms: t,
            x: (t / window_ms) as f32 * pixel_width,
            label: format!("{:.1}s", t / 1000.0),
        });
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_nice(spacing: f64) -> bool {
        let magnitude = 10f64.powf(spacing.log10().floor());
        let k = spacing / magnitude;
        [1.0, 2.0, 5.0].iter().any(|c| (k - c).abs() < 1e-9)
    }

    #[test]
    fn test_spacing_is_always_nice() {
        for window in [37.0, 999.0, 1000.0, 12_345.0, 90_000.0, 3_600_000.0] {
            for zoom in [0, 49, 50, 99, 100, 1000] {
                let t = ticks(window, 800.0, zoom);
                assert!(t.len() >= 2, "window {} zoom {}", window, zoom);
                let spacing = t[1].time_ms - t[0].time_ms;
                assert!(is_nice(spacing), "spacing {} not nice", spacing);
            }
        }
    }

    #[test]
    fn test_last_tick_within_window() {
        let window = 12_345.0;
        let t = ticks(window, 800.0, 0);
        let last = t.last().unwrap().time_ms;
        let spacing = t[1].time_ms - t[0].time_ms;
        assert!(last <= window);
        assert!(window - last < spacing);
    }

    #[test]
    fn test_bucket_grows_with_zoom() {
        let window = 100_000.0;
        let coarse = ticks(window, 800.0, 0).len();
        let medium = ticks(window, 800.0, 50).len();
        let fine = ticks(window, 800.0, 100).len();
        assert!(coarse <= medium);
        assert!(medium <= fine);
    }

    #[test]
    fn test_first_tick_at_zero() {
        let t = ticks(5_000.0, 400.0, 0);
        assert_eq!(t[0].time_ms, 0.0);
        assert_eq!(t[0].x, 0.0);
        assert_eq!(t[0].label, "0.0s");
    }

    #[test]
    fn test_pixel_positions_proportional() {
        let window = 10_000.0;
        let width = 500.0;
        for tick in ticks(window, width, 0) {
            let expected = (tick.time_ms / window) as f32 * width;
            assert!((tick.x - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_labels_in_seconds_one_decimal() {
        let t = ticks(10_000.0, 500.0, 0);
        // 10 s window at the coarse bucket lands on 1 s spacing.
        assert_eq!(t[1].label, "1.0s");
    }

    #[test]
    fn test_empty_window_yields_no_ticks() {
        assert!(ticks(0.0, 500.0, 0).is_empty());
        assert!(ticks(-5.0, 500.0, 0).is_empty());
        assert!(ticks(1000.0, 0.0, 0).is_empty());
    }

    #[test]
    fn test_sub_millisecond_window_floored() {
        // Spacing can never drop below 1 ms.
        let t = ticks(0.5, 500.0, 1000);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].time_ms, 0.0);
    }
}
