use crate::geom::{Point, normalize_degrees, pointer_angle};

/// One pointer gesture rotating one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<T> {
    pub target: T,
    center: Point,
    start_pointer: f64,
    initial_angle: f64,
}

impl<T: Copy> DragSession<T> {
    pub fn new(target: T, center: Point, pointer: Point, initial_angle: f64) -> Self {
        Self {
            target,
            center,
            start_pointer: pointer_angle(center, pointer),
            initial_angle,
        }
    }

    /// Ring angle for the current pointer position. The mapping is 1:1: no
    /// inertia, no snapping, no clamping.
    pub fn angle_at(&self, pointer: Point) -> f64 {
        let delta = pointer_angle(self.center, pointer) - self.start_pointer;
        normalize_degrees(self.initial_angle + delta)
    }
}

/// Holds at most one active [`DragSession`].
#[derive(Debug, Clone)]
pub struct RotationController<T> {
    active: Option<DragSession<T>>,
}

impl<T> Default for RotationController<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T: Copy + PartialEq> RotationController<T> {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Starts a session. Refused while another one is still active.
    pub fn begin(&mut self, session: DragSession<T>) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(session);
        true
    }

    pub fn update(&self, pointer: Point) -> Option<(T, f64)> {
        self.active
            .as_ref()
            .map(|session| (session.target, session.angle_at(pointer)))
    }

    /// Releases the session as-is. The ring keeps whatever angle it reached.
    pub fn end(&mut self) -> Option<T> {
        self.active.take().map(|session| session.target)
    }

    pub fn active_target(&self) -> Option<T> {
        self.active.as_ref().map(|session| session.target)
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::polar;

    const C: Point = Point { x: 300.0, y: 300.0 };

    /// Pointer placed at a raw `atan2` angle.
    fn at(deg: f64) -> Point {
        polar(C, 150.0, deg + 90.0)
    }

    #[test]
    fn test_drag_ten_to_hundred_degrees() {
        let session = DragSession::new(0usize, C, at(10.0), 0.0);
        let angle = session.angle_at(at(100.0));
        assert!((angle - 90.0).abs() < 1e-9, "{angle}");
    }

    #[test]
    fn test_drag_wraps_below_zero() {
        let session = DragSession::new(0usize, C, at(50.0), 10.0);
        let angle = session.angle_at(at(20.0));
        assert!((angle - 340.0).abs() < 1e-9, "{angle}");
    }

    #[test]
    fn test_drag_across_atan2_seam() {
        let session = DragSession::new(0usize, C, at(170.0), 0.0);
        let angle = session.angle_at(at(-170.0));
        assert!((angle - 20.0).abs() < 1e-9, "{angle}");
    }

    #[test]
    fn test_single_active_session() {
        let mut controller = RotationController::new();
        assert!(controller.begin(DragSession::new(1usize, C, at(0.0), 0.0)));
        assert!(!controller.begin(DragSession::new(2usize, C, at(0.0), 0.0)));
        assert_eq!(controller.active_target(), Some(1));

        let (target, _) = controller.update(at(45.0)).unwrap();
        assert_eq!(target, 1);

        assert_eq!(controller.end(), Some(1));
        assert!(!controller.is_dragging());
        assert!(controller.update(at(90.0)).is_none());
        assert_eq!(controller.end(), None);
    }
}
