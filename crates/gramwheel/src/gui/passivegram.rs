use crate::config::PassiveGramConfig;
use crate::gui::canvas::CanvasTransform;
use crate::gui::painter;
use crate::gui::theme::swatch_markup;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringkit::passivegram::{self, Layer, Mode, PassiveGram};
use ringkit::scene::passivegram_scene;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

pub struct PassiveGramPage {
    state: Rc<RefCell<PassiveGram>>,
    /// Set while the spin animation runs.
    spin_started: Rc<Cell<Option<Instant>>>,
    drawing_area: gtk::DrawingArea,
    drag_start: Option<(f64, f64)>,
    reveal_delay: Duration,
    unlock_delay: Duration,
    rotate_label: &'static str,
    can_rotate: bool,
}

#[derive(Debug)]
pub enum PassiveGramMsg {
    SelectMode(Mode),
    Rotate,
    Reveal,
    Unlock,
    DragBegin(f64, f64),
    DragUpdate(f64, f64),
    DragEnd,
    Configure(PassiveGramConfig),
}

#[relm4::component(pub)]
impl SimpleComponent for PassiveGramPage {
    type Init = PassiveGramConfig;
    type Input = PassiveGramMsg;
    type Output = ();

    view! {
        #[root]
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 8,

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 12,
                set_margin_top: 8,
                set_margin_start: 12,
                set_margin_end: 12,

                #[name = "mode_box"]
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    add_css_class: "linked",
                },

                gtk::Button {
                    set_hexpand: true,
                    set_halign: gtk::Align::Center,
                    add_css_class: "rotate-button",
                    add_css_class: "suggested-action",
                    #[watch]
                    set_label: model.rotate_label,
                    #[watch]
                    set_sensitive: model.can_rotate,
                    connect_clicked => PassiveGramMsg::Rotate,
                },

                #[name = "legend"]
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 12,
                    add_css_class: "legend",
                },
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_content_width: passivegram::CANVAS_SIZE as i32,
                set_content_height: passivegram::CANVAS_SIZE as i32,
                add_css_class: "wheel-canvas",

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(PassiveGramMsg::DragBegin(x, y));
                    },
                    connect_drag_update[sender] => move |_, dx, dy| {
                        sender.input(PassiveGramMsg::DragUpdate(dx, dy));
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(PassiveGramMsg::DragEnd);
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(PassiveGramMsg::DragEnd);
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
        let mut wheel = PassiveGram::new(config.vocabulary.clone());
        if let Some(mode) = config.mode
            && let Err(e) = wheel.select_mode(mode, &mut rand::thread_rng())
        {
            log::error!("Failed to preselect {} mode: {}", mode, e);
        }

        let model = PassiveGramPage {
            rotate_label: wheel.rotate_label(),
            can_rotate: wheel.can_rotate(),
            state: Rc::new(RefCell::new(wheel)),
            spin_started: Rc::new(Cell::new(None)),
            drawing_area: gtk::DrawingArea::default(),
            drag_start: None,
            reveal_delay: config.reveal_delay(),
            unlock_delay: config.unlock_delay(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let mut group: Option<gtk::ToggleButton> = None;
        for mode in Mode::iter() {
            let button = gtk::ToggleButton::with_label(mode.title());
            button.set_group(group.as_ref());
            button.set_active(config.mode == Some(mode));
            let sender = sender.clone();
            // clicked, not toggled: picking the active mode again redraws
            // its auxiliaries
            button.connect_clicked(move |button| {
                if button.is_active() {
                    sender.input(PassiveGramMsg::SelectMode(mode));
                }
            });
            widgets.mode_box.append(&button);
            group.get_or_insert(button);
        }

        for layer in Layer::iter() {
            let label = gtk::Label::new(None);
            label.set_markup(&swatch_markup(
                &layer.style().color.to_string(),
                &layer.to_string(),
            ));
            widgets.legend.append(&label);
        }

        let state_draw = model.state.clone();
        let started = model.spin_started.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                CanvasTransform::fit(width as f64, height as f64, passivegram::CANVAS_SIZE)
                    .apply(cr);
                let elapsed = started.get().map(|t| t.elapsed());
                let scene = passivegram_scene(&state_draw.borrow(), elapsed);
                if let Err(e) = painter::paint(cr, &scene) {
                    log::error!("Drawing error: {}", e);
                }
            });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            PassiveGramMsg::SelectMode(mode) => {
                let result = self
                    .state
                    .borrow_mut()
                    .select_mode(mode, &mut rand::thread_rng());
                if let Err(e) = result {
                    log::error!("Failed to switch to {} mode: {}", mode, e);
                }
                self.drawing_area.queue_draw();
            }
            PassiveGramMsg::Rotate => {
                if !self.state.borrow_mut().begin_draw() {
                    return;
                }
                self.start_spin();
                glib::timeout_add_local_once(self.reveal_delay, move || {
                    sender.input(PassiveGramMsg::Reveal);
                });
            }
            PassiveGramMsg::Reveal => {
                let result = self.state.borrow_mut().reveal_draw(&mut rand::thread_rng());
                if let Err(e) = result {
                    log::error!("Draw failed: {}", e);
                }
                // unlock even after a failed draw
                glib::timeout_add_local_once(self.unlock_delay, move || {
                    sender.input(PassiveGramMsg::Unlock);
                });
                self.drawing_area.queue_draw();
            }
            PassiveGramMsg::Unlock => {
                self.state.borrow_mut().finish_draw();
                self.drawing_area.queue_draw();
            }
            PassiveGramMsg::DragBegin(x, y) => {
                self.drag_start = Some((x, y));
                let point = self.to_logical(x, y);
                if let Some(layer) = self.state.borrow_mut().begin_drag(point) {
                    log::trace!("Rotating {}", layer);
                }
            }
            PassiveGramMsg::DragUpdate(dx, dy) => {
                let Some((x, y)) = self.drag_start else {
                    return;
                };
                let point = self.to_logical(x + dx, y + dy);
                if self.state.borrow_mut().drag_to(point) {
                    self.drawing_area.queue_draw();
                }
            }
            PassiveGramMsg::DragEnd => {
                self.drag_start = None;
                self.state.borrow_mut().end_drag();
            }
            PassiveGramMsg::Configure(config) => {
                self.reveal_delay = config.reveal_delay();
                self.unlock_delay = config.unlock_delay();
                self.state.borrow_mut().set_vocabulary(config.vocabulary);
            }
        }

        let state = self.state.borrow();
        self.rotate_label = state.rotate_label();
        self.can_rotate = state.can_rotate();
    }
}

impl PassiveGramPage {
    fn to_logical(&self, x: f64, y: f64) -> ringkit::geom::Point {
        CanvasTransform::fit(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
            passivegram::CANVAS_SIZE,
        )
        .to_logical(x, y)
    }

    /// Redraws every frame until the draw unlocks.
    fn start_spin(&self) {
        self.spin_started.set(Some(Instant::now()));
        let state = self.state.clone();
        let started = self.spin_started.clone();
        self.drawing_area.add_tick_callback(move |area, _| {
            area.queue_draw();
            if state.borrow().is_spinning() {
                glib::ControlFlow::Continue
            } else {
                started.set(None);
                glib::ControlFlow::Break
            }
        });
    }
}
