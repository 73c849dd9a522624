// GtkColorButton is deprecated since 4.10; its replacement needs the v4_10 feature.
#![allow(deprecated)]

use crate::config::PuzzleConfig;
use crate::gui::canvas::CanvasTransform;
use crate::gui::painter;
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringkit::color::HexColor;
use ringkit::geom::Point;
use ringkit::puzzle::{self, CellKey, CellPatch, Puzzle};
use ringkit::scene::puzzle_scene;
use std::cell::RefCell;
use std::rc::Rc;

/// Pointer travel, in pixels, below which a press and release is a click.
const CLICK_SLOP: f64 = 4.0;
const NO_SELECTION: &str = "Click a cell to edit it";

pub fn hex_from_rgba(color: &gdk::RGBA) -> HexColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    HexColor::rgb(
        channel(color.red()),
        channel(color.green()),
        channel(color.blue()),
    )
}

pub fn rgba_from_hex(color: HexColor) -> gdk::RGBA {
    gdk::RGBA::new(
        color.red as f32 / 255.0,
        color.green as f32 / 255.0,
        color.blue as f32 / 255.0,
        1.0,
    )
}

fn range_spin(range: (f64, f64), value: f64) -> gtk::SpinButton {
    let spin = gtk::SpinButton::with_range(range.0, range.1, 1.0);
    spin.set_value(value);
    spin
}

/// Widgets of the cell editor panel.
pub struct Editor {
    text: gtk::Entry,
    background: gtk::ColorButton,
    text_color: gtk::ColorButton,
    font_size: gtk::SpinButton,
}

impl Editor {
    fn new() -> Self {
        Self {
            text: gtk::Entry::new(),
            background: gtk::ColorButton::new(),
            text_color: gtk::ColorButton::new(),
            font_size: range_spin(
                (*puzzle::FONT_SIZE_RANGE.start(), *puzzle::FONT_SIZE_RANGE.end()),
                16.0,
            ),
        }
    }
}

pub struct PuzzlePage {
    state: Rc<RefCell<Puzzle>>,
    drawing_area: gtk::DrawingArea,
    rings: gtk::SpinButton,
    segments: gtk::SpinButton,
    editor: Editor,
    drag_start: Option<(f64, f64)>,
    has_selection: bool,
    selection_label: String,
}

#[derive(Debug)]
pub enum PuzzleMsg {
    DragBegin(f64, f64),
    DragUpdate(f64, f64),
    DragEnd(f64, f64),
    DragCancel,
    Shuffle,
    SetRings(usize),
    SetSegments(usize),
    EditText(String),
    EditBackground(HexColor),
    EditTextColor(HexColor),
    EditFontSize(f64),
    Configure(PuzzleConfig),
}

#[relm4::component(pub)]
impl SimpleComponent for PuzzlePage {
    type Init = PuzzleConfig;
    type Input = PuzzleMsg;
    type Output = ();

    view! {
        #[root]
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 12,

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_content_width: puzzle::CANVAS_SIZE as i32,
                set_content_height: puzzle::CANVAS_SIZE as i32,
                add_css_class: "wheel-canvas",

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(PuzzleMsg::DragBegin(x, y));
                    },
                    connect_drag_update[sender] => move |_, dx, dy| {
                        sender.input(PuzzleMsg::DragUpdate(dx, dy));
                    },
                    connect_drag_end[sender] => move |_, dx, dy| {
                        sender.input(PuzzleMsg::DragEnd(dx, dy));
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(PuzzleMsg::DragCancel);
                    },
                },
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 6,
                set_width_request: 240,
                add_css_class: "editor",

                gtk::Label {
                    set_label: "Rings",
                    set_xalign: 0.0,
                    add_css_class: "caption",
                },
                #[local_ref]
                rings_spin -> gtk::SpinButton {
                    connect_value_changed[sender] => move |spin| {
                        sender.input(PuzzleMsg::SetRings(spin.value_as_int() as usize));
                    },
                },

                gtk::Label {
                    set_label: "Segments per ring",
                    set_xalign: 0.0,
                    add_css_class: "caption",
                },
                #[local_ref]
                segments_spin -> gtk::SpinButton {
                    connect_value_changed[sender] => move |spin| {
                        sender.input(PuzzleMsg::SetSegments(spin.value_as_int() as usize));
                    },
                },

                gtk::Button {
                    set_label: "Shuffle",
                    set_margin_top: 6,
                    connect_clicked => PuzzleMsg::Shuffle,
                },

                gtk::Separator {
                    set_margin_top: 12,
                    set_margin_bottom: 6,
                },

                gtk::Label {
                    #[watch]
                    set_label: &model.selection_label,
                    set_xalign: 0.0,
                    set_wrap: true,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 6,
                    #[watch]
                    set_sensitive: model.has_selection,

                    gtk::Label {
                        set_label: "Text",
                        set_xalign: 0.0,
                        add_css_class: "caption",
                    },
                    #[local_ref]
                    text_entry -> gtk::Entry {
                        connect_changed[sender] => move |entry| {
                            sender.input(PuzzleMsg::EditText(entry.text().to_string()));
                        },
                    },

                    gtk::Label {
                        set_label: "Background",
                        set_xalign: 0.0,
                        add_css_class: "caption",
                    },
                    #[local_ref]
                    background_button -> gtk::ColorButton {
                        connect_color_set[sender] => move |button| {
                            sender.input(PuzzleMsg::EditBackground(hex_from_rgba(&button.rgba())));
                        },
                    },

                    gtk::Label {
                        set_label: "Text color",
                        set_xalign: 0.0,
                        add_css_class: "caption",
                    },
                    #[local_ref]
                    text_color_button -> gtk::ColorButton {
                        connect_color_set[sender] => move |button| {
                            sender.input(PuzzleMsg::EditTextColor(hex_from_rgba(&button.rgba())));
                        },
                    },

                    gtk::Label {
                        set_label: "Font size",
                        set_xalign: 0.0,
                        add_css_class: "caption",
                    },
                    #[local_ref]
                    font_size_spin -> gtk::SpinButton {
                        connect_value_changed[sender] => move |spin| {
                            sender.input(PuzzleMsg::EditFontSize(spin.value()));
                        },
                    },
                },
            },
        }
    }

    fn init(
        config: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let dims = config.dimensions();
        let as_f64 = |r: &std::ops::RangeInclusive<usize>| (*r.start() as f64, *r.end() as f64);

        let model = PuzzlePage {
            state: Rc::new(RefCell::new(Puzzle::new(dims))),
            drawing_area: gtk::DrawingArea::default(),
            rings: range_spin(as_f64(&puzzle::RING_RANGE), dims.rings as f64),
            segments: range_spin(as_f64(&puzzle::SEGMENT_RANGE), dims.segments as f64),
            editor: Editor::new(),
            drag_start: None,
            has_selection: false,
            selection_label: NO_SELECTION.to_string(),
        };

        let rings_spin = &model.rings;
        let segments_spin = &model.segments;
        let text_entry = &model.editor.text;
        let background_button = &model.editor.background;
        let text_color_button = &model.editor.text_color;
        let font_size_spin = &model.editor.font_size;
        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                CanvasTransform::fit(width as f64, height as f64, puzzle::CANVAS_SIZE).apply(cr);
                let scene = puzzle_scene(&state_draw.borrow());
                if let Err(e) = painter::paint(cr, &scene) {
                    log::error!("Drawing error: {}", e);
                }
            });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            PuzzleMsg::DragBegin(x, y) => {
                self.drag_start = Some((x, y));
                let point = self.to_logical(x, y);
                if let Some(ring) = self.state.borrow_mut().begin_drag(point) {
                    log::trace!("Rotating {}", ring);
                }
            }
            PuzzleMsg::DragUpdate(dx, dy) => {
                let Some((x, y)) = self.drag_start else {
                    return;
                };
                let point = self.to_logical(x + dx, y + dy);
                if self.state.borrow_mut().drag_to(point) {
                    self.drawing_area.queue_draw();
                }
            }
            PuzzleMsg::DragEnd(dx, dy) => {
                self.state.borrow_mut().end_drag();
                if let Some((x, y)) = self.drag_start.take()
                    && dx.hypot(dy) < CLICK_SLOP
                {
                    let key = self.state.borrow().cell_at(self.to_logical(x, y));
                    self.select(key);
                }
                self.drawing_area.queue_draw();
            }
            PuzzleMsg::DragCancel => {
                self.drag_start = None;
                self.state.borrow_mut().end_drag();
            }
            PuzzleMsg::Shuffle => {
                self.state.borrow_mut().shuffle(&mut rand::thread_rng());
                self.drawing_area.queue_draw();
            }
            PuzzleMsg::SetRings(rings) => {
                let changed = self.state.borrow_mut().set_rings(rings);
                if changed {
                    self.after_reset();
                }
            }
            PuzzleMsg::SetSegments(segments) => {
                let changed = self.state.borrow_mut().set_segments(segments);
                if changed {
                    self.after_reset();
                }
            }
            PuzzleMsg::EditText(text) => self.patch(CellPatch {
                text: Some(text),
                ..Default::default()
            }),
            PuzzleMsg::EditBackground(color) => self.patch(CellPatch {
                background: Some(color),
                ..Default::default()
            }),
            PuzzleMsg::EditTextColor(color) => self.patch(CellPatch {
                text_color: Some(color),
                ..Default::default()
            }),
            PuzzleMsg::EditFontSize(size) => self.patch(CellPatch {
                font_size: Some(size),
                ..Default::default()
            }),
            PuzzleMsg::Configure(config) => {
                let dims = config.dimensions();
                self.rings.set_value(dims.rings as f64);
                self.segments.set_value(dims.segments as f64);
                let changed = self
                    .state
                    .borrow_mut()
                    .reconfigure(dims.rings, dims.segments);
                if changed {
                    self.after_reset();
                }
            }
        }
    }
}

impl PuzzlePage {
    fn to_logical(&self, x: f64, y: f64) -> Point {
        CanvasTransform::fit(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
            puzzle::CANVAS_SIZE,
        )
        .to_logical(x, y)
    }

    fn after_reset(&mut self) {
        self.select(None);
        self.drawing_area.queue_draw();
    }

    fn patch(&mut self, patch: CellPatch) {
        let selected = self.state.borrow().selected;
        let Some(key) = selected else {
            return;
        };
        if self.state.borrow_mut().update_cell(key, patch) {
            self.drawing_area.queue_draw();
        }
    }

    /// Selects a cell and loads it into the editor.
    fn select(&mut self, key: Option<CellKey>) {
        let cell = {
            let mut state = self.state.borrow_mut();
            state.select(key);
            state.selected_cell().cloned()
        };

        self.has_selection = cell.is_some();
        let Some(cell) = cell else {
            self.selection_label = NO_SELECTION.to_string();
            return;
        };

        self.selection_label = format!("{}, segment {}", cell.key.ring, cell.key.segment + 1);
        self.editor.text.set_text(&cell.text);
        self.editor.background.set_rgba(&rgba_from_hex(cell.background));
        self.editor.text_color.set_rgba(&rgba_from_hex(cell.text_color));
        self.editor.font_size.set_value(cell.font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion_round_trips() {
        let color = HexColor::rgb(0xff, 0xeb, 0x3b);
        assert_eq!(hex_from_rgba(&rgba_from_hex(color)), color);
    }

    #[test]
    fn test_out_of_gamut_channels_are_clamped() {
        let rgba = gdk::RGBA::new(1.5, -0.2, 0.5, 1.0);
        assert_eq!(hex_from_rgba(&rgba), HexColor::rgb(0xff, 0x00, 0x80));
    }
}
