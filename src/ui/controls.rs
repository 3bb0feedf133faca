use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::state::Card;

pub const CARD_WIDTH: i32 = 91;
pub const CARD_HEIGHT: i32 = 131;

/// A styled rectangular control that reacts to clicks.
pub trait ClickableControl {
    fn button(&self) -> &gtk::Button;

    fn connect_activated<F: Fn() + 'static>(&self, f: F) -> glib::SignalHandlerId {
        self.button().connect_clicked(move |_| f())
    }

    fn set_interactive(&self, interactive: bool) {
        self.button().set_sensitive(interactive);
    }

    fn widget(&self) -> gtk::Widget {
        self.button().clone().upcast()
    }
}

pub struct CardButton {
    index: usize,
    button: gtk::Button,
    area: gtk::DrawingArea,
}

impl CardButton {
    pub fn new(index: usize) -> Self {
        let area = gtk::DrawingArea::builder()
            .content_width(CARD_WIDTH)
            .content_height(CARD_HEIGHT)
            .build();
        let button = gtk::Button::builder()
            .css_classes(vec!["memory-card"])
            .child(&area)
            .build();
        button.set_size_request(CARD_WIDTH, CARD_HEIGHT);

        CardButton {
            index,
            button,
            area,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn area(&self) -> &gtk::DrawingArea {
        &self.area
    }

    /// Mirrors `card` onto the widget: style classes, sensitivity and artwork.
    pub fn sync(&self, card: &Card) {
        if card.is_face_up() {
            self.button.add_css_class("face-up");
        } else {
            self.button.remove_css_class("face-up");
        }
        if card.is_matched() {
            self.button.add_css_class("matched");
        } else {
            self.button.remove_css_class("matched");
        }
        self.set_interactive(card.is_interactive());
        self.area.queue_draw();
    }
}

impl ClickableControl for CardButton {
    fn button(&self) -> &gtk::Button {
        &self.button
    }
}

pub struct ResetButton {
    button: gtk::Button,
}

impl ResetButton {
    pub fn new(label: &str) -> Self {
        let button = gtk::Button::builder()
            .label(label)
            .css_classes(vec!["reset-button", "pill"])
            .halign(gtk::Align::Center)
            .build();
        ResetButton { button }
    }
}

impl ClickableControl for ResetButton {
    fn button(&self) -> &gtk::Button {
        &self.button
    }
}
