use cairo::Context;
use palette::Srgba;
use ringkit::geom::{Arc, PathCommand, SegmentPath, Sweep};
use ringkit::scene::{Group, Scene, Shape, Stroke, TextShape};
use ringkit::text::Baseline;
use std::f64::consts::PI;

/// Compass degrees to cairo's radians (0 at +x, clockwise on screen).
fn cairo_angle(compass_deg: f64) -> f64 {
    (compass_deg - 90.0).to_radians()
}

fn set_paint(cr: &Context, paint: Srgba<f64>) {
    let (r, g, b, a) = paint.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn trace_arc(cr: &Context, arc: &Arc) {
    let (start, end) = (cairo_angle(arc.start_deg), cairo_angle(arc.end_deg));
    match arc.sweep {
        Sweep::Clockwise => cr.arc(arc.center.x, arc.center.y, arc.radius, start, end),
        Sweep::CounterClockwise => {
            cr.arc_negative(arc.center.x, arc.center.y, arc.radius, start, end)
        }
    }
}

fn trace(cr: &Context, path: &SegmentPath) {
    cr.new_path();
    for command in path.commands() {
        match command {
            PathCommand::MoveTo(p) => cr.move_to(p.x, p.y),
            PathCommand::LineTo(p) => cr.line_to(p.x, p.y),
            PathCommand::ArcTo(arc) => trace_arc(cr, arc),
            PathCommand::Close => cr.close_path(),
        }
    }
}

fn fill_and_stroke(
    cr: &Context,
    fill: Option<Srgba<f64>>,
    stroke: Option<Stroke>,
) -> Result<(), cairo::Error> {
    if let Some(paint) = fill {
        set_paint(cr, paint);
        cr.fill_preserve()?;
    }
    if let Some(stroke) = stroke {
        set_paint(cr, stroke.paint);
        cr.set_line_width(stroke.width);
        cr.stroke_preserve()?;
    }
    cr.new_path();
    Ok(())
}

fn rounded_rect(cr: &Context, width: f64, height: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(width - r, r, r, -PI / 2.0, 0.0);
    cr.arc(width - r, height - r, r, 0.0, PI / 2.0);
    cr.arc(r, height - r, r, PI / 2.0, PI);
    cr.arc(r, r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

fn draw_text(cr: &Context, text: &TextShape) -> Result<(), cairo::Error> {
    let weight = if text.bold {
        cairo::FontWeight::Bold
    } else {
        cairo::FontWeight::Normal
    };
    let layout = &text.layout;

    cr.save()?;
    cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
    cr.set_font_size(text.font_size);
    set_paint(cr, text.fill);
    cr.translate(layout.anchor.x, layout.anchor.y);
    cr.rotate(layout.rotation.to_radians());

    for line in &layout.lines {
        let ext = cr.text_extents(&line.text)?;
        let x = -ext.width() / 2.0 - ext.x_bearing();
        let y = match layout.baseline {
            Baseline::Middle => -(ext.y_bearing() + ext.height() / 2.0),
            Baseline::Alphabetic => line.dy,
        };
        cr.move_to(x, y);
        cr.show_text(&line.text)?;
    }
    cr.restore()
}

fn draw_group(cr: &Context, group: &Group) -> Result<(), cairo::Error> {
    cr.save()?;
    if let Some(rotation) = group.rotation {
        let origin = rotation.origin;
        cr.translate(origin.x, origin.y);
        cr.rotate(rotation.degrees.to_radians());
        cr.translate(-origin.x, -origin.y);
    }
    if let Some(clip) = &group.clip {
        trace(cr, clip);
        cr.clip();
    }
    draw_shapes(cr, &group.children)?;
    cr.restore()
}

fn draw_shapes(cr: &Context, shapes: &[Shape]) -> Result<(), cairo::Error> {
    for shape in shapes {
        match shape {
            Shape::Rect {
                width,
                height,
                corner_radius,
                fill,
            } => {
                rounded_rect(cr, *width, *height, *corner_radius);
                fill_and_stroke(cr, Some(*fill), None)?;
            }
            Shape::Path { path, fill, stroke } => {
                trace(cr, path);
                fill_and_stroke(cr, *fill, *stroke)?;
            }
            Shape::Line { from, to, stroke } => {
                cr.new_path();
                cr.move_to(from.x, from.y);
                cr.line_to(to.x, to.y);
                fill_and_stroke(cr, None, Some(*stroke))?;
            }
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                cr.new_path();
                cr.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
                fill_and_stroke(cr, *fill, *stroke)?;
            }
            Shape::Text(text) => draw_text(cr, text)?,
            Shape::Group(group) => draw_group(cr, group)?,
        }
    }
    Ok(())
}

/// Paints a scene in logical canvas units; callers set up the transform.
pub fn paint(cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
    cr.set_line_join(cairo::LineJoin::Round);
    draw_shapes(cr, &scene.shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringkit::passivegram::{Mode, PassiveGram};
    use ringkit::puzzle::Puzzle;
    use ringkit::scene::{passivegram_scene, puzzle_scene};

    fn pixel(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> [u8; 4] {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let i = y * stride + x * 4;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn test_cairo_angle_matches_compass() {
        assert!((cairo_angle(0.0) + PI / 2.0).abs() < 1e-12);
        assert!((cairo_angle(90.0)).abs() < 1e-12);
    }

    #[test]
    fn test_paints_puzzle_onto_image() {
        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 600, 600).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            paint(&cr, &puzzle_scene(&Puzzle::default())).unwrap();
        }
        surface.flush();
        // corner stays transparent outside the rounded background
        assert_eq!(pixel(&mut surface, 0, 0)[3], 0);
        // background is opaque just inside the corner radius
        assert_eq!(pixel(&mut surface, 300, 5)[3], 255);
        // the center disc is yellow, sampled clear of borders and labels (BGRA)
        let [b, g, r, _] = pixel(&mut surface, 304, 289);
        assert!(r > 200 && g > 200 && b < 120);
    }

    #[test]
    fn test_paints_passivegram_without_error() {
        let mut rng = rand::thread_rng();
        let mut wheel = PassiveGram::default();
        wheel.select_mode(Mode::Causative, &mut rng).unwrap();
        wheel.begin_draw();
        wheel.reveal_draw(&mut rng).unwrap();

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 900, 900).unwrap();
        let cr = Context::new(&surface).unwrap();
        paint(&cr, &passivegram_scene(&wheel, None)).unwrap();
    }
}
