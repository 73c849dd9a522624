use gtk::gdk;
use gtk4 as gtk;

const CSS: &str = "
.wheel-canvas {
    background-color: #10101c;
}

.editor {
    padding: 12px;
}

.editor label.caption {
    font-weight: bold;
    opacity: 0.7;
}

.legend {
    font-size: 0.9em;
}

.rotate-button {
    font-weight: bold;
    min-width: 140px;
}
";

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

/// Pango markup for a legend entry: a color swatch followed by the name.
pub fn swatch_markup(hex: &str, name: &str) -> String {
    format!(
        "<span foreground=\"{}\">\u{25a0}</span> {}",
        hex,
        glib::markup_escape_text(name)
    )
}
