use gettextrs::gettext;
use gtk4 as gtk;

use super::state::AppState;

pub const STATUS_FONT_CLASS: &str = "status-label";

pub fn status_text(attempts: u32, high_score: u32) -> String {
    format!(
        "{}: {} | {}: {}",
        gettext("Attempts"),
        attempts,
        gettext("High Score"),
        high_score
    )
}

pub(super) fn build_status_label(st: &AppState) -> gtk::Label {
    gtk::Label::builder()
        .label(status_text(st.game.attempts(), st.high_scores.read()))
        .css_classes(vec![STATUS_FONT_CLASS])
        .halign(gtk::Align::Center)
        .margin_top(6)
        .build()
}

pub(super) fn update_status(st: &AppState) {
    if let Some(label) = &st.status_label {
        label.set_text(&status_text(st.game.attempts(), st.high_scores.read()));
    }
}
