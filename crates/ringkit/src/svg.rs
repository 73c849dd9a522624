//! SVG serialization of a [`Scene`].

use crate::geom::fmt_num;
use crate::scene::{Group, Paint, Scene, Shape, Stroke, TextShape};
use crate::text::Baseline;
use palette::Srgb;
use std::fmt;

/// Display adapter writing a scene as a standalone SVG document.
pub struct SvgDocument<'a>(pub &'a Scene);

pub fn render(scene: &Scene) -> String {
    SvgDocument(scene).to_string()
}

fn paint(color: Paint) -> String {
    let rgb: Srgb<u8> = color.color.into_format();
    if color.alpha >= 1.0 {
        format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    } else {
        format!(
            "rgba({},{},{},{})",
            rgb.red,
            rgb.green,
            rgb.blue,
            fmt_num(color.alpha)
        )
    }
}

fn fill_attr(fill: Option<Paint>) -> String {
    match fill {
        Some(color) => format!(r#" fill="{}""#, paint(color)),
        None => r#" fill="none""#.to_string(),
    }
}

fn stroke_attr(stroke: Option<Stroke>) -> String {
    match stroke {
        Some(s) => format!(
            r#" stroke="{}" stroke-width="{}""#,
            paint(s.paint),
            fmt_num(s.width)
        ),
        None => String::new(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &TextShape) -> fmt::Result {
    let layout = &text.layout;
    let (x, y) = (fmt_num(layout.anchor.x), fmt_num(layout.anchor.y));
    let baseline = match layout.baseline {
        Baseline::Middle => "middle",
        Baseline::Alphabetic => "alphabetic",
    };
    write!(
        f,
        r#"<text x="{x}" y="{y}" transform="rotate({} {x} {y})" text-anchor="middle" dominant-baseline="{baseline}" font-size="{}"{} fill="{}">"#,
        fmt_num(layout.rotation),
        fmt_num(text.font_size),
        if text.bold { r#" font-weight="bold""# } else { "" },
        paint(text.fill),
    )?;

    if let [line] = layout.lines.as_slice() {
        f.write_str(&escape(&line.text))?;
    } else {
        for line in &layout.lines {
            write!(
                f,
                r#"<tspan x="{x}" y="{}">{}</tspan>"#,
                fmt_num(layout.anchor.y + line.dy),
                escape(&line.text)
            )?;
        }
    }
    f.write_str("</text>")
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &Group, next_clip: &mut usize) -> fmt::Result {
    f.write_str("<g")?;
    if let Some(rotation) = group.rotation {
        write!(
            f,
            r#" transform="rotate({} {} {})""#,
            fmt_num(rotation.degrees),
            fmt_num(rotation.origin.x),
            fmt_num(rotation.origin.y)
        )?;
    }

    let clip = group.clip.as_ref().map(|path| {
        *next_clip += 1;
        (*next_clip, path)
    });
    if let Some((id, _)) = clip {
        write!(f, r#" clip-path="url(#clip{id})""#)?;
    }
    f.write_str(">")?;

    if let Some((id, path)) = clip {
        write!(f, r#"<clipPath id="clip{id}"><path d="{path}"/></clipPath>"#)?;
    }
    write_shapes(f, &group.children, next_clip)?;
    f.write_str("</g>")
}

fn write_shapes(f: &mut fmt::Formatter<'_>, shapes: &[Shape], next_clip: &mut usize) -> fmt::Result {
    for shape in shapes {
        match shape {
            Shape::Rect {
                width,
                height,
                corner_radius,
                fill,
            } => write!(
                f,
                r#"<rect width="{}" height="{}" rx="{}" fill="{}"/>"#,
                fmt_num(*width),
                fmt_num(*height),
                fmt_num(*corner_radius),
                paint(*fill)
            )?,
            Shape::Path { path, fill, stroke } => write!(
                f,
                r#"<path d="{path}"{}{}/>"#,
                fill_attr(*fill),
                stroke_attr(*stroke)
            )?,
            Shape::Line { from, to, stroke } => write!(
                f,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                fmt_num(from.x),
                fmt_num(from.y),
                fmt_num(to.x),
                fmt_num(to.y),
                stroke_attr(Some(*stroke))
            )?,
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => write!(
                f,
                r#"<circle cx="{}" cy="{}" r="{}"{}{}/>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius),
                fill_attr(*fill),
                stroke_attr(*stroke)
            )?,
            Shape::Text(text) => write_text(f, text)?,
            Shape::Group(group) => write_group(f, group, next_clip)?,
        }
    }
    Ok(())
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.0;
        let (w, h) = (fmt_num(scene.width), fmt_num(scene.height));
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        let mut next_clip = 0;
        write_shapes(f, &scene.shapes, &mut next_clip)?;
        f.write_str("</svg>\n")
    }
}
