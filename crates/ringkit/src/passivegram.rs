//! PassiveGram: four concentric word rings that assemble passive sentences.

use crate::color::HexColor;
use crate::geom::{Point, normalize_degrees};
use crate::rotation::{DragSession, RotationController};
use crate::vocab::{Phrase, VocabError, VocabularySet, sample_distinct};
use rand::Rng;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumCount, EnumIter, EnumString, IntoEnumIterator};

pub const CANVAS_SIZE: f64 = 900.0;
pub const SEGMENTS: usize = 8;
/// Labels longer than this wrap onto two lines.
pub const WRAP_AFTER: usize = 9;
/// Labels longer than this are drawn at 80 % of the base font size.
pub const SHRINK_AFTER: usize = 15;
pub const REVEAL_DELAY: Duration = Duration::from_millis(800);
pub const UNLOCK_DELAY: Duration = Duration::from_millis(800);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[strum(to_string = "standard", serialize = "std")]
    Standard,
    #[strum(to_string = "reporting", serialize = "rep")]
    Reporting,
    #[strum(to_string = "causative", serialize = "caus")]
    Causative,
}

impl Mode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Reporting => "Reporting",
            Self::Causative => "Causative",
        }
    }
}

/// Layers from the center outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, StrumDisplay)]
pub enum Layer {
    #[strum(to_string = "Subject")]
    Subject,
    #[strum(to_string = "Auxiliary Verb")]
    Auxiliary,
    #[strum(to_string = "Past Participle")]
    Participle,
    #[strum(to_string = "Agent")]
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub color: HexColor,
    pub thickness: f64,
    pub base_font_size: f64,
}

/// Whole-turn spin played while a draw is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinProfile {
    pub degrees: f64,
    pub duration: Duration,
}

impl SpinProfile {
    /// Rotation offset `elapsed` into the spin, eased in and out. Zero once the
    /// spin is over, which is visually identical to its end.
    pub fn offset(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.duration || self.duration.is_zero() {
            return 0.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = if t < 0.5 {
            2.0 * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
        };
        self.degrees * eased
    }
}

impl Layer {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn style(&self) -> LayerStyle {
        let (color, thickness, base_font_size) = match self {
            Self::Subject => (HexColor::rgb(0xd4, 0xa3, 0x73), 140.0, 11.0),
            Self::Auxiliary => (HexColor::rgb(0x7f, 0xb0, 0xc8), 80.0, 12.0),
            Self::Participle => (HexColor::rgb(0x80, 0xb1, 0x92), 95.0, 13.0),
            Self::Agent => (HexColor::rgb(0xc9, 0x92, 0x9e), 90.0, 14.0),
        };
        LayerStyle {
            color,
            thickness,
            base_font_size,
        }
    }

    /// `(outer, inner)` radius; layers are stacked from the center outward.
    pub fn bounds(&self) -> (f64, f64) {
        let inner: f64 = Self::iter()
            .take(self.index())
            .map(|layer| layer.style().thickness)
            .sum();
        (inner + self.style().thickness, inner)
    }

    pub fn spin(&self) -> SpinProfile {
        let (degrees, millis) = match self {
            Self::Subject => (1080.0, 1400),
            Self::Auxiliary => (-1440.0, 1500),
            Self::Participle => (1800.0, 1300),
            Self::Agent => (-1080.0, 1600),
        };
        SpinProfile {
            degrees,
            duration: Duration::from_millis(millis),
        }
    }

    pub fn outermost_radius() -> f64 {
        Self::iter().map(|layer| layer.style().thickness).sum()
    }

    pub fn center() -> Point {
        Point::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0)
    }

    pub fn at(point: Point) -> Option<Self> {
        let dist = Self::center().distance_to(point);
        Self::iter().find(|layer| {
            let (outer, inner) = layer.bounds();
            dist >= inner && dist <= outer
        })
    }

    fn vocabulary<'a>(&self, vocab: &'a VocabularySet, mode: Mode) -> (&'static str, &'a [Phrase]) {
        match self {
            Self::Subject => ("subjects", vocab.subjects.as_slice()),
            Self::Auxiliary => ("auxiliaries", vocab.auxiliaries(mode)),
            Self::Participle => ("participles", vocab.participles.as_slice()),
            Self::Agent => ("agents", vocab.agents.as_slice()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    /// Input locked, segments still show the previous draw.
    Spinning,
    /// New phrases are visible, input still locked.
    Revealed,
}

pub struct PassiveGram {
    mode: Option<Mode>,
    values: [Vec<Phrase>; Layer::COUNT],
    angles: [f64; Layer::COUNT],
    phase: DrawPhase,
    has_rotated: bool,
    vocabulary: VocabularySet,
    drag: RotationController<Layer>,
}

impl Default for PassiveGram {
    fn default() -> Self {
        Self::new(VocabularySet::default())
    }
}

impl PassiveGram {
    pub fn new(vocabulary: VocabularySet) -> Self {
        Self {
            mode: None,
            values: std::array::from_fn(|_| vec![Phrase::default(); SEGMENTS]),
            angles: [0.0; Layer::COUNT],
            phase: DrawPhase::Idle,
            has_rotated: false,
            vocabulary,
            drag: RotationController::new(),
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != DrawPhase::Idle
    }

    pub fn has_rotated(&self) -> bool {
        self.has_rotated
    }

    pub fn values(&self, layer: Layer) -> &[Phrase] {
        &self.values[layer.index()]
    }

    pub fn angle(&self, layer: Layer) -> f64 {
        self.angles[layer.index()]
    }

    pub fn set_angle(&mut self, layer: Layer, angle: f64) {
        self.angles[layer.index()] = normalize_degrees(angle);
    }

    pub fn vocabulary(&self) -> &VocabularySet {
        &self.vocabulary
    }

    /// Swaps the word lists. Phrases already on the wheel stay until the next
    /// draw.
    pub fn set_vocabulary(&mut self, vocabulary: VocabularySet) {
        self.vocabulary = vocabulary;
    }

    pub fn can_rotate(&self) -> bool {
        self.mode.is_some() && !self.is_spinning()
    }

    pub fn rotate_label(&self) -> &'static str {
        if self.is_spinning() {
            "Spinning..."
        } else if self.mode.is_none() {
            "Select Mode"
        } else {
            "Rotate"
        }
    }

    /// Picks a mode. After the first draw the auxiliary ring is redrawn from
    /// the new mode's list right away; the other rings keep their phrases.
    /// A failed redraw leaves both the mode and the wheel unchanged.
    pub fn select_mode<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) -> Result<(), VocabError> {
        if self.has_rotated {
            let layer = Layer::Auxiliary;
            let (name, list) = layer.vocabulary(&self.vocabulary, mode);
            self.values[layer.index()] = sample_distinct(name, list, SEGMENTS, rng)?;
            log::debug!("Redrew auxiliaries for {} mode", mode);
        }
        self.mode = Some(mode);
        Ok(())
    }

    /// Locks input for a new draw. Refused without a mode or while a draw is
    /// already running.
    pub fn begin_draw(&mut self) -> bool {
        if !self.can_rotate() {
            return false;
        }
        self.phase = DrawPhase::Spinning;
        true
    }

    /// Replaces every segment at once with fresh phrases, auxiliaries from the
    /// mode selected now.
    pub fn reveal_draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), VocabError> {
        let Some(mode) = self.mode else {
            return Ok(());
        };
        if self.phase != DrawPhase::Spinning {
            return Ok(());
        }

        let mut drawn: [Vec<Phrase>; Layer::COUNT] = Default::default();
        for layer in Layer::iter() {
            let (name, list) = layer.vocabulary(&self.vocabulary, mode);
            drawn[layer.index()] = sample_distinct(name, list, SEGMENTS, rng)?;
        }

        self.values = drawn;
        self.has_rotated = true;
        self.phase = DrawPhase::Revealed;
        log::info!("Drew a new {} wheel", mode);
        Ok(())
    }

    /// Unlocks input after the spin.
    pub fn finish_draw(&mut self) {
        self.phase = DrawPhase::Idle;
    }

    pub fn layer_at(&self, point: Point) -> Option<Layer> {
        Layer::at(point)
    }

    pub fn begin_drag(&mut self, pointer: Point) -> Option<Layer> {
        if self.is_spinning() {
            return None;
        }
        let layer = self.layer_at(pointer)?;
        let session = DragSession::new(layer, Layer::center(), pointer, self.angle(layer));
        self.drag.begin(session).then_some(layer)
    }

    pub fn drag_to(&mut self, pointer: Point) -> bool {
        match self.drag.update(pointer) {
            Some((layer, angle)) => {
                self.set_angle(layer, angle);
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) -> Option<Layer> {
        self.drag.end()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}
