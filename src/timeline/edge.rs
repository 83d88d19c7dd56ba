use egui::{Pos2, Vec2};

/// Below this horizontal distance between endpoints an edge is classified as
/// near-vertical and drawn as a two-segment S-curve so it visibly bows
/// instead of overlapping a straight vertical run.
pub const NEAR_VERTICAL_DX: f32 = 30.0;

const CTRL_OFFSET: f32 = 24.0;
const CTRL_SPREAD: f32 = 8.0;
const ARROW_SIZE: f32 = 6.0;

/// A routed dependency connector. Both kinds begin and end exactly at the
/// endpoints they were given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePath {
    /// Two cubic segments with fixed horizontal control offsets, bowing
    /// right then left through the midpoint.
    SCurve {
        start: Pos2,
        c1: Pos2,
        c2: Pos2,
        mid: Pos2,
        c3: Pos2,
        c4: Pos2,
        end: Pos2,
    },
    /// Single quadratic through the horizontal midpoint.
    Quadratic {
        start: Pos2,
        control: Pos2,
        end: Pos2,
    },
}

impl EdgePath {
    pub fn endpoints(&self) -> (Pos2, Pos2) {
        match *self {
            EdgePath::SCurve { start, end, .. } => (start, end),
            EdgePath::Quadratic { start, end, .. } => (start, end),
        }
    }

    /// Arrowhead triangle at the target endpoint, oriented along the
    /// incoming curve direction.
    pub fn arrow_head(&self) -> [Pos2; 3] {
        let (last_control, end) = match *self {
            EdgePath::SCurve { c4, end, .. } => (c4, end),
            EdgePath::Quadratic { control, end, .. } => (control, end),
        };
        let mut dir = end - last_control;
        if dir.length() < f32::EPSILON {
            dir = Vec2::RIGHT;
        } else {
            dir = dir.normalized();
        }
        let perp = dir.rot90();
        let base = end - dir * ARROW_SIZE;
        [
            end,
            base + perp * (ARROW_SIZE * 0.6),
            base - perp * (ARROW_SIZE * 0.6),
        ]
    }
}

/// Route one dependency edge from a source bar's trailing edge to a target
/// bar's leading edge.
///
/// `ordinal` and `fan_count` come from the per-pass dependency ranks: the
/// control offsets grow with the ordinal so several edges sharing an
/// endpoint stay visually separated. Total for any two finite points.
pub fn route(start: Pos2, end: Pos2, ordinal: usize, fan_count: usize) -> EdgePath {
    let spread = (ordinal as f32 - fan_count.saturating_sub(1) as f32 / 2.0) * CTRL_SPREAD;

    if (end.x - start.x).abs() < NEAR_VERTICAL_DX {
        let bow = CTRL_OFFSET + ordinal as f32 * CTRL_SPREAD;
        let mid = Pos2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        EdgePath::SCurve {
            start,
            c1: Pos2::new(start.x + bow, start.y),
            c2: Pos2::new(mid.x + bow, mid.y),
            mid,
            c3: Pos2::new(mid.x - bow, mid.y),
            c4: Pos2::new(end.x - bow, end.y),
            end,
        }
    } else {
        let mid_x = (start.x + end.x) / 2.0;
        EdgePath::Quadratic {
            start,
            control: Pos2::new(mid_x + spread, start.y),
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_edge_is_quadratic() {
        let path = route(Pos2::new(0.0, 10.0), Pos2::new(200.0, 80.0), 0, 1);
        assert!(matches!(path, EdgePath::Quadratic { .. }));
    }

    #[test]
    fn test_near_vertical_edge_is_s_curve() {
        let path = route(Pos2::new(100.0, 10.0), Pos2::new(110.0, 200.0), 0, 1);
        assert!(matches!(path, EdgePath::SCurve { .. }));
    }

    #[test]
    fn test_classification_boundary_exact() {
        let start = Pos2::new(0.0, 0.0);
        // 29.99 px is near-vertical, 30 px is not.
        assert!(matches!(
            route(start, Pos2::new(29.99, 100.0), 0, 1),
            EdgePath::SCurve { .. }
        ));
        assert!(matches!(
            route(start, Pos2::new(30.0, 100.0), 0, 1),
            EdgePath::Quadratic { .. }
        ));
    }

    #[test]
    fn test_endpoints_preserved_exactly() {
        let a = Pos2::new(13.5, 42.25);
        let b = Pos2::new(14.0, 260.75);
        let c = Pos2::new(500.0, 90.0);
        for path in [route(a, b, 2, 5), route(a, c, 1, 3)] {
            let (s, e) = path.endpoints();
            assert_eq!(s, a);
            assert!(e == b || e == c);
        }
    }

    #[test]
    fn test_parallel_edges_get_distinct_controls() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 100.0);
        let first = route(a, b, 0, 3);
        let second = route(a, b, 1, 3);
        assert_ne!(first, second);
        // Endpoints still identical.
        assert_eq!(first.endpoints(), second.endpoints());
    }

    #[test]
    fn test_arrow_head_sits_on_target() {
        let end = Pos2::new(200.0, 80.0);
        let path = route(Pos2::new(0.0, 10.0), end, 0, 1);
        let arrow = path.arrow_head();
        assert_eq!(arrow[0], end);
        for p in arrow {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_coincident_points_still_drawable() {
        let p = Pos2::new(50.0, 50.0);
        let path = route(p, p, 0, 1);
        let (s, e) = path.endpoints();
        assert_eq!(s, p);
        assert_eq!(e, p);
        let arrow = path.arrow_head();
        assert!(arrow.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
