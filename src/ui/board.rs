use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::handle_card_click;
use super::controls::{CARD_HEIGHT, CARD_WIDTH, CardButton, ClickableControl};
use super::state::{AppState, CARD_COUNT, Card, GRID_SIZE, PAIR_COUNT};

pub const CARD_GAP: i32 = 5;

pub fn face_image_path(assets_dir: &Path, pair_id: u8) -> PathBuf {
    assets_dir.join("images").join(format!("card_{pair_id}.png"))
}

pub fn back_image_path(assets_dir: &Path) -> PathBuf {
    assets_dir.join("images").join("card_back.png")
}

/// Card faces and back, pre-scaled to the cell size. Missing images are drawn
/// as text instead.
pub struct CardArt {
    faces: Vec<Option<Pixbuf>>,
    back: Option<Pixbuf>,
}

impl CardArt {
    pub fn load(assets_dir: &Path) -> Self {
        let faces = (1..=PAIR_COUNT as u8)
            .map(|pair_id| load_scaled(&face_image_path(assets_dir, pair_id)))
            .collect();
        CardArt {
            faces,
            back: load_scaled(&back_image_path(assets_dir)),
        }
    }

    pub fn face(&self, pair_id: u8) -> Option<&Pixbuf> {
        let slot = usize::from(pair_id).checked_sub(1)?;
        self.faces.get(slot)?.as_ref()
    }

    pub fn back(&self) -> Option<&Pixbuf> {
        self.back.as_ref()
    }

    fn for_card(&self, card: &Card) -> Option<&Pixbuf> {
        if card.is_face_up() {
            self.face(card.pair_id())
        } else {
            self.back()
        }
    }
}

fn load_scaled(path: &Path) -> Option<Pixbuf> {
    match Pixbuf::from_file_at_scale(path, CARD_WIDTH, CARD_HEIGHT, false) {
        Ok(pixbuf) => Some(pixbuf),
        Err(err) => {
            log::warn!("Could not load card image {}: {err}", path.display());
            None
        }
    }
}

fn draw_card(
    area: &gtk::DrawingArea,
    cr: &cairo::Context,
    width: i32,
    height: i32,
    card: &Card,
    art: &CardArt,
) {
    if let Some(pixbuf) = art.for_card(card) {
        let x = f64::from(width - pixbuf.width()) / 2.0;
        let y = f64::from(height - pixbuf.height()) / 2.0;
        cr.set_source_pixbuf(pixbuf, x, y);
        if let Err(err) = cr.paint() {
            log::warn!("Could not paint card: {err}");
        }
        return;
    }

    let text = if card.is_face_up() {
        card.pair_id().to_string()
    } else {
        "?".to_string()
    };
    let min_dim = f64::from(width.min(height));

    cr.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    font_desc.set_weight(pango::Weight::Bold);
    font_desc.set_size((min_dim * 0.4 * f64::from(pango::SCALE)) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(&text);

    #[allow(deprecated)]
    let fg = area.style_context().color();
    cr.set_source_rgba(
        f64::from(fg.red()),
        f64::from(fg.green()),
        f64::from(fg.blue()),
        f64::from(fg.alpha()),
    );

    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        f64::from(width - text_width) / 2.0,
        f64::from(height - text_height) / 2.0,
    );
    pangocairo::functions::show_layout(cr, &layout);
}

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("memory-board");
    grid.set_row_spacing(CARD_GAP as u32);
    grid.set_column_spacing(CARD_GAP as u32);
    grid.set_halign(gtk::Align::Center);
    grid.set_valign(gtk::Align::Center);

    let mut buttons = Vec::with_capacity(CARD_COUNT);

    for index in 0..CARD_COUNT {
        let card_button = CardButton::new(index);

        let state_draw = Rc::downgrade(state);
        card_button
            .area()
            .set_draw_func(move |area, cr, width, height| {
                let Some(state) = state_draw.upgrade() else {
                    return;
                };
                let Ok(st) = state.try_borrow() else {
                    return;
                };
                if let Some(card) = st.game.card(index) {
                    draw_card(area, cr, width, height, card, &st.art);
                }
            });

        let state_click = Rc::downgrade(state);
        card_button.connect_activated(move || {
            if let Some(state) = state_click.upgrade() {
                handle_card_click(&state, index);
            }
        });

        if let Some(card) = state.borrow().game.card(index) {
            card_button.sync(card);
        }

        let col = (index % GRID_SIZE) as i32;
        let row = (index / GRID_SIZE) as i32;
        grid.attach(&card_button.widget(), col, row, 1, 1);
        buttons.push(card_button);
    }

    state.borrow_mut().card_buttons = buttons;

    grid
}
