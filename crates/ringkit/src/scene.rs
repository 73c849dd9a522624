//! Renderer-independent shape tree, rebuilt from state on every change.

use crate::color::rgba;
use crate::geom::{Point, SegmentPath, radial_edge, segment_path, segment_span};
use crate::passivegram::{self, Layer, PassiveGram, SHRINK_AFTER, WRAP_AFTER};
use crate::puzzle::{self, CellKey, Puzzle, RingId};
use crate::text::{LabelLayout, layout_label, segment_anchor};
use palette::Srgba;
use std::time::Duration;
use strum::IntoEnumIterator;

pub type Paint = Srgba<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
}

impl Stroke {
    pub fn new(paint: Paint, width: f64) -> Self {
        Self { paint, width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub layout: LabelLayout,
    pub font_size: f64,
    pub bold: bool,
    pub fill: Paint,
}

/// Rotation about `origin`, clockwise degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub rotation: Option<Rotation>,
    /// Clip outline in the group's own (rotated) coordinates.
    pub clip: Option<SegmentPath>,
    pub children: Vec<Shape>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        width: f64,
        height: f64,
        corner_radius: f64,
        fill: Paint,
    },
    Path {
        path: SegmentPath,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
    },
    Text(TextShape),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Every shape, groups flattened depth-first.
    pub fn walk(&self) -> Vec<&Shape> {
        fn visit<'a>(shapes: &'a [Shape], out: &mut Vec<&'a Shape>) {
            for shape in shapes {
                out.push(shape);
                if let Shape::Group(group) = shape {
                    visit(&group.children, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.shapes, &mut out);
        out
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextShape> {
        self.walk().into_iter().filter_map(|shape| match shape {
            Shape::Text(text) => Some(text),
            _ => None,
        })
    }
}

const BACKGROUND: (f64, f64, f64) = (26.0 / 255.0, 26.0 / 255.0, 46.0 / 255.0);
const CORNER_RADIUS: f64 = 20.0;
const HIGHLIGHT_WIDTH: f64 = 4.0;

fn background(size: f64) -> Shape {
    let (r, g, b) = BACKGROUND;
    Shape::Rect {
        width: size,
        height: size,
        corner_radius: CORNER_RADIUS,
        fill: rgba(r, g, b, 1.0),
    }
}

fn rotated(degrees: f64, origin: Point, children: Vec<Shape>) -> Shape {
    Shape::Group(Group {
        rotation: Some(Rotation { degrees, origin }),
        clip: None,
        children,
    })
}

fn ring_circle(center: Point, radius: f64, stroke: Stroke) -> Shape {
    Shape::Circle {
        center,
        radius,
        fill: None,
        stroke: Some(stroke),
    }
}

/// One band of the puzzle: clipped cells, rotating borders, static outline.
fn puzzle_band(puzzle: &Puzzle, ring: RingId) -> Vec<Shape> {
    let layout = puzzle.layout();
    let center = layout.center;
    let (outer, inner) = layout.bounds(ring);
    let count = puzzle.dimensions().segments_in(ring);
    let span = segment_span(count);
    let angle = puzzle.angle(ring);
    let mut shapes = Vec::new();

    for segment in 0..count {
        let key = CellKey::new(ring, segment);
        let Some(cell) = puzzle.cell(key) else {
            continue;
        };

        let start = segment as f64 * span;
        let mid = start + span / 2.0;
        let path = segment_path(center, outer, inner, start, start + span);
        let anchor = segment_anchor(center, outer, inner, mid);

        let mut children = vec![
            Shape::Path {
                path: path.clone(),
                fill: Some(cell.background.to_paint()),
                stroke: None,
            },
            Shape::Text(TextShape {
                layout: layout_label(&cell.text, anchor, mid, cell.font_size, None),
                font_size: cell.font_size,
                bold: true,
                fill: cell.text_color.to_paint(),
            }),
        ];
        if puzzle.selected == Some(key) {
            children.push(Shape::Path {
                path: path.clone(),
                fill: None,
                stroke: Some(Stroke::new(rgba(1.0, 0.34, 0.7, 0.9), HIGHLIGHT_WIDTH)),
            });
        }

        shapes.push(Shape::Group(Group {
            rotation: Some(Rotation {
                degrees: angle,
                origin: center,
            }),
            clip: Some(path),
            children,
        }));
    }

    let border = match ring {
        RingId::Ring(index) => Stroke::new(rgba(0.0, 0.0, 0.0, 0.8), layout.border_width(index)),
        RingId::Center => Stroke::new(rgba(0.0, 0.0, 0.0, 0.8), 3.0),
    };
    let edges = (0..count)
        .map(|segment| {
            let (from, to) = radial_edge(center, inner, outer, segment as f64 * span);
            Shape::Line {
                from,
                to,
                stroke: border,
            }
        })
        .collect();
    shapes.push(rotated(angle, center, edges));

    match ring {
        RingId::Ring(index) => {
            let outline = Stroke::new(rgba(0.0, 0.0, 0.0, 0.6), 2.0);
            shapes.push(ring_circle(center, outer, outline));
            if index + 1 < layout.rings {
                shapes.push(ring_circle(center, inner, outline));
            }
        }
        RingId::Center => {
            shapes.push(ring_circle(center, outer, border));
        }
    }

    shapes
}

pub fn puzzle_scene(puzzle: &Puzzle) -> Scene {
    let rings = puzzle.dimensions().rings;
    let mut shapes = vec![background(puzzle::CANVAS_SIZE)];

    for index in 0..rings {
        shapes.push(Shape::Group(Group {
            children: puzzle_band(puzzle, RingId::Ring(index)),
            ..Default::default()
        }));
    }
    if puzzle.layout().center_radius() > 0.0 {
        shapes.push(Shape::Group(Group {
            children: puzzle_band(puzzle, RingId::Center),
            ..Default::default()
        }));
    }

    Scene {
        width: puzzle::CANVAS_SIZE,
        height: puzzle::CANVAS_SIZE,
        shapes,
    }
}

const PHRASE_COLOR: (f64, f64, f64) = (26.0 / 255.0, 26.0 / 255.0, 46.0 / 255.0);

fn passivegram_layer(wheel: &PassiveGram, layer: Layer, spin_offset: f64) -> Shape {
    let center = Layer::center();
    let style = layer.style();
    let (outer, inner) = layer.bounds();
    let span = segment_span(passivegram::SEGMENTS);
    let black = rgba(0.0, 0.0, 0.0, 1.0);
    let (r, g, b) = PHRASE_COLOR;

    let mut rotating = Vec::new();
    for (segment, phrase) in wheel.values(layer).iter().enumerate() {
        let start = segment as f64 * span;
        let mid = start + span / 2.0;
        rotating.push(Shape::Path {
            path: segment_path(center, outer, inner, start, start + span),
            fill: Some(style.color.to_paint()),
            stroke: Some(Stroke::new(black, 3.0)),
        });

        if phrase.is_empty() {
            continue;
        }
        let font_size = if phrase.chars().count() > SHRINK_AFTER {
            style.base_font_size * 0.8
        } else {
            style.base_font_size
        };
        let anchor = segment_anchor(center, outer, inner, mid);
        rotating.push(Shape::Text(TextShape {
            layout: layout_label(phrase, anchor, mid, font_size, Some(WRAP_AFTER)),
            font_size,
            bold: true,
            fill: rgba(r, g, b, 1.0),
        }));
    }

    for segment in 0..passivegram::SEGMENTS {
        let (from, to) = radial_edge(center, inner, outer, segment as f64 * span);
        rotating.push(Shape::Line {
            from,
            to,
            stroke: Stroke::new(black, 3.5),
        });
    }

    let mut children = vec![rotated(wheel.angle(layer), center, rotating)];
    children.push(ring_circle(center, outer, Stroke::new(black, 3.5)));
    if inner > 0.0 {
        children.push(ring_circle(center, inner, Stroke::new(black, 3.5)));
    }

    rotated(spin_offset, center, children)
}

/// PassiveGram scene. `spin_elapsed` is the time since the current draw
/// started, if one is running.
pub fn passivegram_scene(wheel: &PassiveGram, spin_elapsed: Option<Duration>) -> Scene {
    let mut shapes = vec![background(passivegram::CANVAS_SIZE)];

    // outermost first so inner layers paint on top
    for layer in Layer::iter().rev() {
        let offset = spin_elapsed
            .filter(|_| wheel.is_spinning())
            .map(|elapsed| layer.spin().offset(elapsed))
            .unwrap_or(0.0);
        shapes.push(passivegram_layer(wheel, layer, offset));
    }

    if wheel.mode().is_none() {
        let center = Layer::center();
        shapes.push(Shape::Circle {
            center,
            radius: Layer::outermost_radius(),
            fill: Some(rgba(0.0, 0.0, 0.0, 0.45)),
            stroke: None,
        });
        shapes.push(Shape::Text(TextShape {
            layout: layout_label("Select Mode", center, 0.0, 28.0, None),
            font_size: 28.0,
            bold: true,
            fill: rgba(1.0, 1.0, 1.0, 1.0),
        }));
    }

    Scene {
        width: passivegram::CANVAS_SIZE,
        height: passivegram::CANVAS_SIZE,
        shapes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passivegram::Mode;
    use crate::puzzle::{CellPatch, Dimensions};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn clipped_groups(scene: &Scene) -> usize {
        scene
            .walk()
            .into_iter()
            .filter(|s| matches!(s, Shape::Group(g) if g.clip.is_some()))
            .count()
    }

    #[test]
    fn test_puzzle_scene_has_one_clipped_group_per_cell() {
        let puzzle = Puzzle::new(Dimensions::new(4, 5));
        let scene = puzzle_scene(&puzzle);
        assert_eq!(clipped_groups(&scene), 4 * 5 + 10);
        assert_eq!(scene.texts().count(), puzzle.cells().len());
        assert_eq!(scene.width, 600.0);
    }

    #[test]
    fn test_puzzle_scene_reflects_edits_and_angles() {
        let mut puzzle = Puzzle::default();
        let key = CellKey::new(RingId::Ring(2), 1);
        puzzle.update_cell(
            key,
            CellPatch {
                text: Some("hello".into()),
                ..Default::default()
            },
        );
        puzzle.set_angle(RingId::Ring(2), 33.0);
        let scene = puzzle_scene(&puzzle);

        assert!(scene.texts().any(|t| t.layout.lines[0].text == "hello"));
        let rotated_33 = scene.walk().into_iter().any(|s| {
            matches!(s, Shape::Group(g) if g.clip.is_some()
                && g.rotation.map(|r| r.degrees) == Some(33.0))
        });
        assert!(rotated_33);
    }

    #[test]
    fn test_selected_cell_is_outlined() {
        let mut puzzle = Puzzle::default();
        let plain = puzzle_scene(&puzzle).walk().len();
        puzzle.select(Some(CellKey::new(RingId::Center, 2)));
        assert_eq!(puzzle_scene(&puzzle).walk().len(), plain + 1);
    }

    #[test]
    fn test_passivegram_prompt_until_mode_selected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut wheel = PassiveGram::default();
        let scene = passivegram_scene(&wheel, None);
        let texts: Vec<_> = scene.texts().collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].layout.lines[0].text, "Select Mode");

        wheel.select_mode(Mode::Standard, &mut rng).unwrap();
        assert_eq!(passivegram_scene(&wheel, None).texts().count(), 0);

        wheel.begin_draw();
        wheel.reveal_draw(&mut rng).unwrap();
        let scene = passivegram_scene(&wheel, Some(Duration::from_millis(900)));
        assert_eq!(scene.texts().count(), 4 * passivegram::SEGMENTS);
    }

    #[test]
    fn test_long_phrases_shrink_and_wrap() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut wheel = PassiveGram::default();
        wheel.select_mode(Mode::Reporting, &mut rng).unwrap();
        wheel.begin_draw();
        wheel.reveal_draw(&mut rng).unwrap();
        let scene = passivegram_scene(&wheel, None);

        let long = scene
            .texts()
            .find(|t| {
                t.layout.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join(" ")
                    == "is considered to"
            });
        if let Some(text) = long {
            assert_eq!(text.layout.lines.len(), 2);
            assert!((text.font_size - 12.0 * 0.8).abs() < 1e-9);
        }
        assert!(scene.texts().all(|t| t.layout.lines.len() <= 2));
    }

    #[test]
    fn test_spin_rotates_layer_groups_only_while_spinning() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut wheel = PassiveGram::default();
        wheel.select_mode(Mode::Standard, &mut rng).unwrap();
        wheel.begin_draw();

        let scene = passivegram_scene(&wheel, Some(Duration::from_millis(700)));
        let spinning = scene.shapes[1..5]
            .iter()
            .filter(|s| matches!(s, Shape::Group(g) if g.rotation.is_some_and(|r| r.degrees != 0.0)))
            .count();
        assert_eq!(spinning, 4);

        wheel.finish_draw();
        let scene = passivegram_scene(&wheel, Some(Duration::from_millis(700)));
        let spinning = scene.shapes[1..5]
            .iter()
            .filter(|s| matches!(s, Shape::Group(g) if g.rotation.is_some_and(|r| r.degrees != 0.0)))
            .count();
        assert_eq!(spinning, 0);
    }
}
