//! The rotating ring puzzle: rings of editable cells around a sun-ray center.

use crate::color::HexColor;
use crate::geom::{Point, compass_angle, normalize_degrees, segment_span};
use crate::rotation::{DragSession, RotationController};
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;

pub const CANVAS_SIZE: f64 = 600.0;
pub const RING_RANGE: RangeInclusive<usize> = 2..=8;
pub const SEGMENT_RANGE: RangeInclusive<usize> = 2..=12;
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 8.0..=48.0;
pub const DEFAULT_RINGS: usize = 5;
pub const DEFAULT_SEGMENTS: usize = 3;
/// Shuffle lands on multiples of this many degrees.
pub const SHUFFLE_STEP: f64 = 15.0;
const SHUFFLE_POSITIONS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingId {
    Ring(usize),
    Center,
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring(index) => write!(f, "Ring {}", index + 1),
            Self::Center => f.write_str("Center"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub ring: RingId,
    pub segment: usize,
}

impl CellKey {
    pub fn new(ring: RingId, segment: usize) -> Self {
        Self { ring, segment }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub key: CellKey,
    pub text: String,
    pub background: HexColor,
    pub text_color: HexColor,
    pub font_size: f64,
}

impl Cell {
    fn ring_default(ring: usize, segment: usize) -> Self {
        Self {
            key: CellKey::new(RingId::Ring(ring), segment),
            text: format!("R{}C{}", ring + 1, segment + 1),
            background: HexColor::rgb(0xff, 0xff, 0xff),
            text_color: HexColor::rgb(0x00, 0x00, 0x00),
            font_size: 16.0,
        }
    }

    fn center_default(segment: usize) -> Self {
        Self {
            key: CellKey::new(RingId::Center, segment),
            text: format!("C{}", segment + 1),
            background: HexColor::rgb(0xff, 0xeb, 0x3b),
            text_color: HexColor::rgb(0x00, 0x00, 0x00),
            font_size: 14.0,
        }
    }
}

/// Partial update from the cell editor. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPatch {
    pub text: Option<String>,
    pub background: Option<HexColor>,
    pub text_color: Option<HexColor>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rings: usize,
    pub segments: usize,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(DEFAULT_RINGS, DEFAULT_SEGMENTS)
    }
}

impl Dimensions {
    /// Clamps both values into their allowed ranges.
    pub fn new(rings: usize, segments: usize) -> Self {
        Self {
            rings: rings.clamp(*RING_RANGE.start(), *RING_RANGE.end()),
            segments: segments.clamp(*SEGMENT_RANGE.start(), *SEGMENT_RANGE.end()),
        }
    }

    pub fn center_segments(&self) -> usize {
        self.segments * 2
    }

    pub fn cell_count(&self) -> usize {
        self.rings * self.segments + self.center_segments()
    }

    pub fn segments_in(&self, ring: RingId) -> usize {
        match ring {
            RingId::Ring(_) => self.segments,
            RingId::Center => self.center_segments(),
        }
    }
}

/// Radii of every band on the canvas.
///
/// Ring 0 is the outermost band. The center disc takes one band's thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuzzleLayout {
    pub center: Point,
    pub max_radius: f64,
    pub thickness: f64,
    pub rings: usize,
}

impl PuzzleLayout {
    pub fn new(dims: Dimensions) -> Self {
        let max_radius = CANVAS_SIZE * 0.45;
        Self {
            center: Point::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0),
            max_radius,
            thickness: max_radius / (dims.rings + 1) as f64,
            rings: dims.rings,
        }
    }

    /// `(outer, inner)` radius of a band.
    pub fn bounds(&self, ring: RingId) -> (f64, f64) {
        match ring {
            RingId::Ring(index) => {
                let outer = self.max_radius - index as f64 * self.thickness;
                (outer, outer - self.thickness)
            }
            RingId::Center => (self.center_radius(), 0.0),
        }
    }

    pub fn center_radius(&self) -> f64 {
        self.max_radius - self.rings as f64 * self.thickness
    }

    /// Border width of the radial lines; inner rings get thicker lines.
    pub fn border_width(&self, index: usize) -> f64 {
        2.0 + self.rings.saturating_sub(index + 1) as f64 * 0.5
    }

    pub fn ring_at(&self, point: Point) -> Option<RingId> {
        let dist = self.center.distance_to(point);
        if dist > self.max_radius {
            return None;
        }
        if dist <= self.center_radius() {
            return Some(RingId::Center);
        }
        let index = ((self.max_radius - dist) / self.thickness).floor() as usize;
        Some(RingId::Ring(index.min(self.rings - 1)))
    }
}

pub struct Puzzle {
    dims: Dimensions,
    layout: PuzzleLayout,
    cells: Vec<Cell>,
    ring_angles: Vec<f64>,
    center_angle: f64,
    pub selected: Option<CellKey>,
    drag: RotationController<RingId>,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new(Dimensions::default())
    }
}

impl Puzzle {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            layout: PuzzleLayout::new(dims),
            cells: Self::init_cells(dims),
            ring_angles: vec![0.0; dims.rings],
            center_angle: 0.0,
            selected: None,
            drag: RotationController::new(),
        }
    }

    pub fn init_cells(dims: Dimensions) -> Vec<Cell> {
        let rings = (0..dims.rings)
            .flat_map(|r| (0..dims.segments).map(move |s| Cell::ring_default(r, s)));
        let center = (0..dims.center_segments()).map(Cell::center_default);
        rings.chain(center).collect()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn layout(&self) -> &PuzzleLayout {
        &self.layout
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Full reset: fresh default cells, every angle back to 0, no selection.
    /// Returns `false` when the clamped dimensions did not change.
    pub fn reconfigure(&mut self, rings: usize, segments: usize) -> bool {
        let dims = Dimensions::new(rings, segments);
        if dims == self.dims {
            return false;
        }
        log::info!(
            "Reconfiguring puzzle to {} rings x {} segments",
            dims.rings,
            dims.segments
        );
        *self = Self::new(dims);
        true
    }

    pub fn set_rings(&mut self, rings: usize) -> bool {
        self.reconfigure(rings, self.dims.segments)
    }

    pub fn set_segments(&mut self, segments: usize) -> bool {
        self.reconfigure(self.dims.rings, segments)
    }

    fn cell_index(&self, key: CellKey) -> Option<usize> {
        if key.segment >= self.dims.segments_in(key.ring) {
            return None;
        }
        match key.ring {
            RingId::Ring(r) if r < self.dims.rings => Some(r * self.dims.segments + key.segment),
            RingId::Ring(_) => None,
            RingId::Center => Some(self.dims.rings * self.dims.segments + key.segment),
        }
    }

    pub fn cell(&self, key: CellKey) -> Option<&Cell> {
        self.cell_index(key).and_then(|i| self.cells.get(i))
    }

    /// Applies an editor change. Font size is clamped to 8..=48; unknown
    /// cells are ignored.
    pub fn update_cell(&mut self, key: CellKey, patch: CellPatch) -> bool {
        let Some(cell) = self.cell_index(key).and_then(|i| self.cells.get_mut(i)) else {
            return false;
        };

        if let Some(text) = patch.text {
            cell.text = text;
        }
        if let Some(color) = patch.background {
            cell.background = color;
        }
        if let Some(color) = patch.text_color {
            cell.text_color = color;
        }
        if let Some(size) = patch.font_size {
            cell.font_size = size.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        }
        true
    }

    pub fn angle(&self, ring: RingId) -> f64 {
        match ring {
            RingId::Ring(index) => self.ring_angles.get(index).copied().unwrap_or(0.0),
            RingId::Center => self.center_angle,
        }
    }

    pub fn set_angle(&mut self, ring: RingId, angle: f64) {
        let angle = normalize_degrees(angle);
        match ring {
            RingId::Ring(index) => {
                if let Some(slot) = self.ring_angles.get_mut(index) {
                    *slot = angle;
                }
            }
            RingId::Center => self.center_angle = angle,
        }
    }

    pub fn ring_angles(&self) -> &[f64] {
        &self.ring_angles
    }

    /// Every ring and the center get an independent multiple of 15°.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for angle in &mut self.ring_angles {
            *angle = rng.gen_range(0..SHUFFLE_POSITIONS) as f64 * SHUFFLE_STEP;
        }
        self.center_angle = rng.gen_range(0..SHUFFLE_POSITIONS) as f64 * SHUFFLE_STEP;
        log::debug!(
            "Shuffled rings to {:?}, center {}",
            self.ring_angles,
            self.center_angle
        );
    }

    /// Cell under a canvas point, taking each ring's rotation into account.
    pub fn cell_at(&self, point: Point) -> Option<CellKey> {
        let ring = self.layout.ring_at(point)?;
        let local = normalize_degrees(compass_angle(self.layout.center, point) - self.angle(ring));
        let count = self.dims.segments_in(ring);
        let segment = ((local / segment_span(count)).floor() as usize).min(count - 1);
        Some(CellKey::new(ring, segment))
    }

    pub fn select(&mut self, key: Option<CellKey>) {
        self.selected = key.filter(|k| self.cell_index(*k).is_some());
    }

    pub fn selected_cell(&self) -> Option<&Cell> {
        self.selected.and_then(|key| self.cell(key))
    }

    /// Starts rotating the ring under `pointer`, if any.
    pub fn begin_drag(&mut self, pointer: Point) -> Option<RingId> {
        let ring = self.layout.ring_at(pointer)?;
        let session = DragSession::new(ring, self.layout.center, pointer, self.angle(ring));
        self.drag.begin(session).then_some(ring)
    }

    /// Returns `true` when an angle changed.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        match self.drag.update(pointer) {
            Some((ring, angle)) => {
                self.set_angle(ring, angle);
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) -> Option<RingId> {
        self.drag.end()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}
