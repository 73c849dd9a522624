//! Label placement inside ring segments.

use crate::geom::{Point, polar};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Vertical offset from the anchor, before rotation.
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Middle,
    Alphabetic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub anchor: Point,
    /// Degrees, clockwise, about `anchor`.
    pub rotation: f64,
    pub baseline: Baseline,
    pub lines: Vec<TextLine>,
}

/// Splits a label into one or two lines.
///
/// Two lines only when the label has more than one word and is longer than
/// `wrap_after` characters. The first line gets `ceil(words / 2)` words.
pub fn split_label(text: &str, wrap_after: Option<usize>) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let too_long = wrap_after.is_some_and(|limit| text.chars().count() > limit);

    if words.len() <= 1 || !too_long {
        return vec![text.to_string()];
    }

    let mid = words.len().div_ceil(2);
    vec![words[..mid].join(" "), words[mid..].join(" ")]
}

/// Lays out `text` centered at `anchor` and rotated by the segment's
/// mid-angle so it stays tangent to the ring.
pub fn layout_label(
    text: &str,
    anchor: Point,
    mid_angle: f64,
    font_size: f64,
    wrap_after: Option<usize>,
) -> LabelLayout {
    let mut lines = split_label(text, wrap_after);

    if lines.len() == 1 {
        return LabelLayout {
            anchor,
            rotation: mid_angle,
            baseline: Baseline::Middle,
            lines: vec![TextLine {
                text: lines.remove(0),
                dy: 0.0,
            }],
        };
    }

    let lh = font_size * LINE_HEIGHT;
    let offsets = [-lh * 0.4, lh * 0.6];
    LabelLayout {
        anchor,
        rotation: mid_angle,
        baseline: Baseline::Alphabetic,
        lines: lines
            .into_iter()
            .zip(offsets)
            .map(|(text, dy)| TextLine { text, dy })
            .collect(),
    }
}

/// Label anchor for a segment: mid-angle, mid-radius. Pie segments
/// (`inner <= 0`) use three quarters of the outer radius instead.
pub fn segment_anchor(center: Point, outer: f64, inner: f64, mid_angle: f64) -> Point {
    let radius = if inner > 0.0 {
        (outer + inner) / 2.0
    } else {
        outer * 0.75
    };
    polar(center, radius, mid_angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_never_wraps() {
        assert_eq!(split_label("translated", Some(9)), vec!["translated"]);
    }

    #[test]
    fn test_short_phrase_stays_on_one_line() {
        assert_eq!(split_label("has been", Some(9)), vec!["has been"]);
        assert_eq!(split_label("The house", Some(9)), vec!["The house"]);
    }

    #[test]
    fn test_long_phrase_splits_at_half() {
        assert_eq!(
            split_label("by the government", Some(9)),
            vec!["by the", "government"]
        );
        assert_eq!(
            split_label("is believed to", Some(9)),
            vec!["is believed", "to"]
        );
        assert_eq!(
            split_label("during the lesson", Some(9)),
            vec!["during the", "lesson"]
        );
    }

    #[test]
    fn test_no_threshold_never_wraps() {
        assert_eq!(split_label("R1C1 with words", None).len(), 1);
    }

    #[test]
    fn test_layout_two_lines_offsets() {
        let layout = layout_label("by the teacher", Point::new(0.0, 0.0), 22.5, 10.0, Some(9));
        assert_eq!(layout.baseline, Baseline::Alphabetic);
        assert_eq!(layout.lines.len(), 2);
        assert!((layout.lines[0].dy + 5.0).abs() < 1e-9);
        assert!((layout.lines[1].dy - 7.5).abs() < 1e-9);
        assert_eq!(layout.rotation, 22.5);
    }

    #[test]
    fn test_layout_single_line_is_centered() {
        let layout = layout_label("R1C1", Point::new(5.0, 5.0), 60.0, 16.0, None);
        assert_eq!(layout.baseline, Baseline::Middle);
        assert_eq!(layout.lines[0].dy, 0.0);
    }

    #[test]
    fn test_pie_anchor_uses_three_quarters() {
        let c = Point::new(0.0, 0.0);
        let anchor = segment_anchor(c, 100.0, 0.0, 90.0);
        assert!((anchor.x - 75.0).abs() < 1e-9);
        let anchor = segment_anchor(c, 100.0, 50.0, 90.0);
        assert!((anchor.x - 75.0).abs() < 1e-9);
        let anchor = segment_anchor(c, 100.0, 60.0, 90.0);
        assert!((anchor.x - 80.0).abs() < 1e-9);
    }
}
