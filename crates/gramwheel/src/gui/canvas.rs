use ringkit::geom::Point;

/// Maps a square logical canvas onto a drawing area, scaled to fit and
/// centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CanvasTransform {
    pub fn fit(width: f64, height: f64, logical_size: f64) -> Self {
        let scale = (width.min(height) / logical_size).max(f64::EPSILON);
        Self {
            scale,
            offset_x: (width - logical_size * scale) / 2.0,
            offset_y: (height - logical_size * scale) / 2.0,
        }
    }

    pub fn to_logical(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }

    pub fn apply(&self, cr: &cairo::Context) {
        cr.translate(self.offset_x, self.offset_y);
        cr.scale(self.scale, self.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_centers_on_wide_area() {
        let t = CanvasTransform::fit(1200.0, 600.0, 600.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 300.0);
        assert_eq!(t.offset_y, 0.0);
        assert_eq!(t.to_logical(600.0, 300.0), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_fit_scales_down() {
        let t = CanvasTransform::fit(450.0, 900.0, 900.0);
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.offset_y, 225.0);
        assert_eq!(t.to_logical(225.0, 450.0), Point::new(450.0, 450.0));
        assert_eq!(t.to_logical(0.0, 225.0), Point::new(0.0, 0.0));
    }
}
