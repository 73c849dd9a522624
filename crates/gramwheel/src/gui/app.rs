use crate::config::{self, Config, Screen};
use crate::events::AppEvent;
use crate::gui::passivegram::{PassiveGramMsg, PassiveGramPage};
use crate::gui::puzzle::{PuzzleMsg, PuzzlePage};
use crate::gui::theme;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use strum::IntoEnumIterator;

pub struct AppModel {
    puzzle: Controller<PuzzlePage>,
    passivegram: Controller<PassiveGramPage>,
}

#[derive(Debug)]
pub enum AppMsg {
    OpenSettings,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Gramwheel"),
            set_default_size: (1100, 820),

            #[wrap(Some)]
            set_titlebar = &gtk::HeaderBar {
                #[wrap(Some)]
                set_title_widget = &gtk::StackSwitcher {
                    set_stack: Some(&stack),
                },

                pack_end = &gtk::Button {
                    set_icon_name: "emblem-system-symbolic",
                    set_tooltip_text: Some("Open settings file"),
                    connect_clicked => AppMsg::OpenSettings,
                },
            },

            #[name = "stack"]
            gtk::Stack {
                set_transition_type: gtk::StackTransitionType::Crossfade,
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let model = AppModel {
            puzzle: PuzzlePage::builder().launch(config.puzzle).detach(),
            passivegram: PassiveGramPage::builder()
                .launch(config.passivegram.clone())
                .detach(),
        };

        let widgets = view_output!();

        for screen in Screen::iter() {
            let name = screen.to_string();
            match screen {
                Screen::Puzzle => {
                    widgets
                        .stack
                        .add_titled(model.puzzle.widget(), Some(name.as_str()), screen.title());
                }
                Screen::PassiveGram => {
                    widgets
                        .stack
                        .add_titled(model.passivegram.widget(), Some(name.as_str()), screen.title());
                }
            }
        }
        widgets
            .stack
            .set_visible_child_name(&config.window.screen.to_string());

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::OpenSettings => match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            },
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.puzzle.emit(PuzzleMsg::Configure(new_config.puzzle));
                    self.passivegram
                        .emit(PassiveGramMsg::Configure(new_config.passivegram));
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
