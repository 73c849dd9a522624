//! Closed-form geometry for ring segments.
//!
//! Angles handed to this module are "compass" degrees: measured clockwise from
//! straight up, in screen space where `y` grows downward.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Maps any angle into `[0, 360)`. Non-finite input maps to `0.0`.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Pointer angle around `center` as `atan2(dy, dx)` in degrees.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y)
        .atan2(pointer.x - center.x)
        .to_degrees()
}

/// Same as [`pointer_angle`] but expressed in compass degrees, normalized.
pub fn compass_angle(center: Point, pointer: Point) -> f64 {
    normalize_degrees(pointer_angle(center, pointer) + 90.0)
}

pub fn polar(center: Point, radius: f64, compass_deg: f64) -> Point {
    let rad = (compass_deg - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub sweep: Sweep,
}

impl Arc {
    pub fn large_arc(&self) -> bool {
        (self.end_deg - self.start_deg).abs() > 180.0
    }

    pub fn start_point(&self) -> Point {
        polar(self.center, self.radius, self.start_deg)
    }

    pub fn end_point(&self) -> Point {
        polar(self.center, self.radius, self.end_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    ArcTo(Arc),
    Close,
}

/// A closed outline built by [`segment_path`].
///
/// Renders as an SVG path `d` attribute through `Display`; raster backends
/// walk [`SegmentPath::commands`] instead so fills and clips share geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPath {
    commands: Vec<PathCommand>,
}

impl SegmentPath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.commands.iter().filter_map(|c| match c {
            PathCommand::ArcTo(arc) => Some(arc),
            _ => None,
        })
    }
}

impl fmt::Display for SegmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for command in &self.commands {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match command {
                PathCommand::MoveTo(p) => write!(f, "M {} {}", fmt_num(p.x), fmt_num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L {} {}", fmt_num(p.x), fmt_num(p.y))?,
                PathCommand::ArcTo(arc) => {
                    let to = arc.end_point();
                    let sweep = match arc.sweep {
                        Sweep::Clockwise => 1,
                        Sweep::CounterClockwise => 0,
                    };
                    write!(
                        f,
                        "A {r} {r} 0 {} {} {} {}",
                        u8::from(arc.large_arc()),
                        sweep,
                        fmt_num(to.x),
                        fmt_num(to.y),
                        r = fmt_num(arc.radius),
                    )?
                }
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Annular sector between `inner` and `outer` spanning `start..end` compass
/// degrees. An `inner` radius of zero or less yields a pie slice.
pub fn segment_path(
    center: Point,
    outer: f64,
    inner: f64,
    start_deg: f64,
    end_deg: f64,
) -> SegmentPath {
    let outer_arc = Arc {
        center,
        radius: outer,
        start_deg,
        end_deg,
        sweep: Sweep::Clockwise,
    };

    let commands = if inner <= 0.0 {
        vec![
            PathCommand::MoveTo(center),
            PathCommand::LineTo(outer_arc.start_point()),
            PathCommand::ArcTo(outer_arc),
            PathCommand::Close,
        ]
    } else {
        let inner_arc = Arc {
            center,
            radius: inner,
            start_deg: end_deg,
            end_deg: start_deg,
            sweep: Sweep::CounterClockwise,
        };
        vec![
            PathCommand::MoveTo(outer_arc.start_point()),
            PathCommand::ArcTo(outer_arc),
            PathCommand::LineTo(inner_arc.start_point()),
            PathCommand::ArcTo(inner_arc),
            PathCommand::Close,
        ]
    };

    SegmentPath { commands }
}

/// Border line along a segment edge; starts at the center when `inner <= 0`.
pub fn radial_edge(center: Point, inner: f64, outer: f64, compass_deg: f64) -> (Point, Point) {
    let from = if inner > 0.0 {
        polar(center, inner, compass_deg)
    } else {
        center
    };
    (from, polar(center, outer, compass_deg))
}

/// Angular span of one of `count` equal segments.
pub fn segment_span(count: usize) -> f64 {
    360.0 / count.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Point = Point { x: 300.0, y: 300.0 };

    fn close(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-9
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
    }

    #[test]
    fn test_polar_is_clockwise_from_up() {
        assert!(close(polar(C, 100.0, 0.0), Point::new(300.0, 200.0)));
        assert!(close(polar(C, 100.0, 90.0), Point::new(400.0, 300.0)));
        assert!(close(polar(C, 100.0, 180.0), Point::new(300.0, 400.0)));
    }

    #[test]
    fn test_compass_angle_inverts_polar() {
        for deg in [0.0, 15.0, 90.0, 200.0, 359.0] {
            let p = polar(C, 50.0, deg);
            assert!((compass_angle(C, p) - deg).abs() < 1e-9, "{deg}");
        }
    }

    #[test]
    fn test_annular_segment_commands() {
        let path = segment_path(C, 200.0, 100.0, 0.0, 90.0);
        let cmds = path.commands();
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], PathCommand::MoveTo(p) if close(p, Point::new(300.0, 100.0))));
        assert!(matches!(cmds[2], PathCommand::LineTo(p) if close(p, Point::new(400.0, 300.0))));
        assert!(matches!(cmds[4], PathCommand::Close));
        assert_eq!(
            path.to_string(),
            "M 300 100 A 200 200 0 0 1 500 300 L 400 300 A 100 100 0 0 0 300 200 Z"
        );
    }

    #[test]
    fn test_zero_inner_radius_is_pie_slice() {
        let path = segment_path(C, 100.0, 0.0, 90.0, 180.0);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(C));
        assert_eq!(path.arcs().count(), 1);
        assert_eq!(path.to_string(), "M 300 300 L 400 300 A 100 100 0 0 1 300 400 Z");
    }

    #[test]
    fn test_large_arc_flag() {
        let wide = segment_path(C, 100.0, 50.0, 0.0, 200.0);
        assert!(wide.arcs().all(Arc::large_arc));
        let narrow = segment_path(C, 100.0, 50.0, 0.0, 180.0);
        assert!(!narrow.arcs().any(Arc::large_arc));
    }

    #[test]
    fn test_quadrants_tile_annulus() {
        let quadrants: Vec<_> = (0..4)
            .map(|i| segment_path(C, 200.0, 120.0, i as f64 * 90.0, (i + 1) as f64 * 90.0))
            .collect();

        let span: f64 = quadrants
            .iter()
            .map(|q| {
                let outer = q.arcs().next().unwrap();
                outer.end_deg - outer.start_deg
            })
            .sum();
        assert_eq!(span, 360.0);

        for i in 0..4 {
            let this = quadrants[i].arcs().next().unwrap();
            let next = quadrants[(i + 1) % 4].arcs().next().unwrap();
            assert!(close(this.end_point(), next.start_point()));

            let this_inner = quadrants[i].arcs().nth(1).unwrap();
            let next_inner = quadrants[(i + 1) % 4].arcs().nth(1).unwrap();
            assert!(close(this_inner.start_point(), next_inner.end_point()));
        }
    }

    #[test]
    fn test_radial_edge() {
        let (a, b) = radial_edge(C, 0.0, 100.0, 90.0);
        assert_eq!(a, C);
        assert!(close(b, Point::new(400.0, 300.0)));
        let (a, _) = radial_edge(C, 50.0, 100.0, 90.0);
        assert!(close(a, Point::new(350.0, 300.0)));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(2.34567), "2.346");
    }
}
