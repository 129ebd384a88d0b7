use std::fmt::Write as _;

use eframe::egui::{Vec2, vec2};

use super::GraphNode;

/// Gap between the source circle and the start of the line.
pub(crate) const SOURCE_PADDING: f32 = 2.0;
/// Gap in front of the target circle, wide enough for the arrowhead.
pub(crate) const TARGET_PADDING: f32 = 4.0;

const MAX_CURVE_OFFSET: f32 = 80.0;
const CURVE_OFFSET_FACTOR: f32 = 0.4;
const CURVE_SAMPLES: usize = 16;

// Marker outline `M0,-5 L8,0 L0,5 L2,0 Z`, shifted so the tip sits at the origin.
const GLYPH_LEFT: Vec2 = vec2(-8.0, -5.0);
const GLYPH_NOTCH: Vec2 = vec2(-6.0, 0.0);
const GLYPH_RIGHT: Vec2 = vec2(-8.0, 5.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PathShape {
    Straight,
    Quadratic { control: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ArrowTip {
    pub(crate) pos: Vec2,
    pub(crate) angle: f32,
}

/// Routed edge between two trimmed endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgePath {
    pub(crate) start: Vec2,
    pub(crate) end: Vec2,
    pub(crate) shape: PathShape,
    pub(crate) arrow: ArrowTip,
}

/// The four corners of a notched arrowhead, already rotated and placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ArrowGlyph {
    pub(crate) tip: Vec2,
    pub(crate) left: Vec2,
    pub(crate) notch: Vec2,
    pub(crate) right: Vec2,
}

impl ArrowGlyph {
    pub(crate) fn points(&self) -> [Vec2; 4] {
        [self.tip, self.left, self.notch, self.right]
    }
}

impl EdgePath {
    pub(crate) fn degenerate() -> Self {
        Self {
            start: Vec2::ZERO,
            end: Vec2::ZERO,
            shape: PathShape::Straight,
            arrow: ArrowTip {
                pos: Vec2::ZERO,
                angle: 0.0,
            },
        }
    }

    /// Point along the path for `t` in `[0, 1]`.
    pub(crate) fn point_at(&self, t: f32) -> Vec2 {
        match self.shape {
            PathShape::Straight => self.start + (self.end - self.start) * t,
            PathShape::Quadratic { control } => {
                let inv = 1.0 - t;
                self.start * (inv * inv) + control * (2.0 * inv * t) + self.end * (t * t)
            }
        }
    }

    /// SVG path data in absolute commands.
    pub(crate) fn svg_d(&self) -> String {
        let mut d = String::new();
        let _ = write!(d, "M{:.2},{:.2} ", self.start.x, self.start.y);
        match self.shape {
            PathShape::Straight => {
                let _ = write!(d, "L{:.2},{:.2}", self.end.x, self.end.y);
            }
            PathShape::Quadratic { control } => {
                let _ = write!(
                    d,
                    "Q{:.2},{:.2} {:.2},{:.2}",
                    control.x, control.y, self.end.x, self.end.y
                );
            }
        }
        d
    }

    pub(crate) fn distance_to(&self, point: Vec2) -> f32 {
        match self.shape {
            PathShape::Straight => segment_distance(point, self.start, self.end),
            PathShape::Quadratic { .. } => {
                let mut best = f32::INFINITY;
                let mut previous = self.start;
                for step in 1..=CURVE_SAMPLES {
                    let next = self.point_at(step as f32 / CURVE_SAMPLES as f32);
                    best = best.min(segment_distance(point, previous, next));
                    previous = next;
                }
                best
            }
        }
    }
}

/// Closest point to `point` on the segment `a..b`. `None` for a zero-length segment.
pub(crate) fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Option<Vec2> {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq <= 0.0 || !length_sq.is_finite() {
        return None;
    }

    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    Some(a + ab * t)
}

pub(crate) fn segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    match closest_point_on_segment(point, a, b) {
        Some(closest) => (point - closest).length(),
        None => (point - a).length(),
    }
}

fn should_curve(dx: f32, dy: f32) -> bool {
    let horizontally_close = dx.abs() > 20.0 && dx.abs() < 100.0;
    let same_level = dy.abs() < 50.0;
    (horizontally_close && same_level) || (dx.abs() < dy.abs() * 0.5 && !same_level)
}

/// Routes the edge `source -> target`, trimmed to the circle outlines.
pub(in crate::app) fn compute_path(source: &GraphNode, target: &GraphNode) -> EdgePath {
    let (from, to) = (source.pos, target.pos);
    if !from.x.is_finite() || !from.y.is_finite() || !to.x.is_finite() || !to.y.is_finite() {
        return EdgePath::degenerate();
    }

    let delta = to - from;
    let angle = delta.y.atan2(delta.x);
    let direction = vec2(angle.cos(), angle.sin());
    let distance = delta.length();

    let start = from + direction * (source.radius + SOURCE_PADDING);
    let end = to - direction * (target.radius + TARGET_PADDING);

    if !should_curve(delta.x, delta.y) {
        return EdgePath {
            start,
            end,
            shape: PathShape::Straight,
            arrow: ArrowTip { pos: end, angle },
        };
    }

    let perpendicular = vec2(-angle.sin(), angle.cos());
    let magnitude = (distance * CURVE_OFFSET_FACTOR).min(MAX_CURVE_OFFSET);
    let control = (start + end) * 0.5 + perpendicular * magnitude;
    let tangent = end - control;

    EdgePath {
        start,
        end,
        shape: PathShape::Quadratic { control },
        arrow: ArrowTip {
            pos: end,
            angle: tangent.y.atan2(tangent.x),
        },
    }
}

/// Places the arrowhead at `tip`. `None` when the tip or its angle is NaN,
/// so the caller can skip drawing it.
pub(crate) fn arrow_glyph(tip: ArrowTip) -> Option<ArrowGlyph> {
    if tip.pos.x.is_nan() || tip.pos.y.is_nan() || tip.angle.is_nan() {
        return None;
    }

    let (sin, cos) = tip.angle.sin_cos();
    let place = |local: Vec2| {
        tip.pos + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    };

    Some(ArrowGlyph {
        tip: tip.pos,
        left: place(GLYPH_LEFT),
        notch: place(GLYPH_NOTCH),
        right: place(GLYPH_RIGHT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::physics::test_support::node_at;

    #[test]
    fn long_horizontal_edge_is_straight_and_trimmed() {
        let source = node_at("a", 0.0, 0.0);
        let target = node_at("b", 300.0, 0.0);
        let path = compute_path(&source, &target);

        assert_eq!(path.shape, PathShape::Straight);
        assert!((path.start - vec2(32.0, 0.0)).length() < 1e-4);
        assert!((path.end - vec2(266.0, 0.0)).length() < 1e-4);
        assert_eq!(path.arrow.pos, path.end);
        assert_eq!(path.arrow.angle, 0.0);
        assert_eq!(path.svg_d(), "M32.00,0.00 L266.00,0.00");
    }

    #[test]
    fn short_same_level_edge_curves() {
        let source = node_at("a", 0.0, 0.0);
        let target = node_at("b", 80.0, 10.0);
        let path = compute_path(&source, &target);

        let PathShape::Quadratic { control } = path.shape else {
            panic!("expected a curve, got {:?}", path.shape);
        };
        let tangent = path.end - control;
        assert!((path.arrow.angle - tangent.y.atan2(tangent.x)).abs() < 1e-5);
        assert!(path.svg_d().contains('Q'));
    }

    #[test]
    fn steep_edge_curves_but_diagonal_does_not() {
        let source = node_at("a", 0.0, 0.0);
        let curved = |x, y| {
            matches!(
                compute_path(&source, &node_at("b", x, y)).shape,
                PathShape::Quadratic { .. }
            )
        };
        assert!(curved(10.0, 300.0));
        assert!(!curved(300.0, 300.0));
        // dx inside (20, 100) but dy too large and not steep enough
        assert!(!curved(60.0, 100.0));
    }

    #[test]
    fn curve_offset_is_capped() {
        let source = node_at("a", 0.0, 0.0);
        let target = node_at("b", 0.0, 1000.0);
        let path = compute_path(&source, &target);
        let PathShape::Quadratic { control } = path.shape else {
            panic!("expected a curve");
        };
        let midpoint = (path.start + path.end) * 0.5;
        assert!(((control - midpoint).length() - MAX_CURVE_OFFSET).abs() < 1e-3);
    }

    #[test]
    fn non_finite_endpoint_yields_degenerate_path() {
        let source = node_at("a", f32::NAN, 0.0);
        let target = node_at("b", 100.0, 0.0);
        assert_eq!(compute_path(&source, &target), EdgePath::degenerate());
        assert_eq!(EdgePath::degenerate().svg_d(), "M0.00,0.00 L0.00,0.00");
    }

    #[test]
    fn glyph_rotates_with_angle() {
        let glyph = arrow_glyph(ArrowTip {
            pos: vec2(10.0, 10.0),
            angle: std::f32::consts::FRAC_PI_2,
        })
        .expect("finite tip");

        assert_eq!(glyph.tip, vec2(10.0, 10.0));
        // Pointing down: the base sits above the tip.
        assert!((glyph.notch - vec2(10.0, 4.0)).length() < 1e-4);
        assert!((glyph.left - vec2(15.0, 2.0)).length() < 1e-4);
        assert!((glyph.right - vec2(5.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn glyph_refuses_nan() {
        assert!(
            arrow_glyph(ArrowTip {
                pos: vec2(0.0, 0.0),
                angle: f32::NAN,
            })
            .is_none()
        );
        assert!(
            arrow_glyph(ArrowTip {
                pos: vec2(f32::NAN, 0.0),
                angle: 0.0,
            })
            .is_none()
        );
    }

    #[test]
    fn segment_helpers_clamp_to_endpoints() {
        let a = vec2(0.0, 0.0);
        let b = vec2(10.0, 0.0);
        assert_eq!(closest_point_on_segment(vec2(5.0, 3.0), a, b), Some(vec2(5.0, 0.0)));
        assert_eq!(closest_point_on_segment(vec2(-5.0, 3.0), a, b), Some(a));
        assert_eq!(closest_point_on_segment(vec2(1.0, 1.0), a, a), None);
        assert!((segment_distance(vec2(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn curved_hit_test_follows_the_bulge() {
        let source = node_at("a", 0.0, 0.0);
        let target = node_at("b", 0.0, 400.0);
        let path = compute_path(&source, &target);
        let apex = path.point_at(0.5);
        assert!(path.distance_to(apex) < 1.0);
        assert!(segment_distance(apex, path.start, path.end) > 20.0);
    }
}
