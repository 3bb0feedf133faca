use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::board::build_board_grid;
use super::config::{APP_ID, GameSettings};
use super::controls::{ClickableControl, ResetButton};
use super::dialogs::{show_about_dialog, show_instructions_dialog, show_win_dialog};
use super::hud::{build_status_label, update_status};
use super::sound::Clip;
use super::state::{AppState, ClickOutcome, PAIR_COUNT};

fn sync_card(st: &AppState, index: usize) {
    if let (Some(button), Some(card)) = (st.card_buttons.get(index), st.game.card(index)) {
        button.sync(card);
    }
}

fn sync_all_cards(st: &AppState) {
    for button in &st.card_buttons {
        sync_card(st, button.index());
    }
}

pub fn handle_card_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let mut st = state.borrow_mut();

    let outcome = st.game.click(index);
    if outcome == ClickOutcome::Ignored {
        return;
    }

    st.sounds.play_clip(&st.settings.assets_dir, Clip::Flip);
    sync_all_cards(&st);
    update_status(&st);

    match outcome {
        ClickOutcome::Ignored => {}
        ClickOutcome::FirstPick => {
            log::debug!("Picked card {index}");
        }
        ClickOutcome::Matched => {
            log::debug!(
                "Matched pair, {} of {} found",
                st.game.pairs_found(),
                PAIR_COUNT
            );
        }
        ClickOutcome::Mismatched => {
            log::debug!("Mismatch on attempt {}", st.game.attempts());
            schedule_mismatch_reset(state, &mut st);
        }
        ClickOutcome::Won { attempts } => {
            log::info!("Board cleared in {attempts} attempts");
            st.sounds.play_clip(&st.settings.assets_dir, Clip::Win);
            let new_record = st.high_scores.record_win(attempts);
            update_status(&st);
            let window = st.window.clone();
            drop(st);
            show_win_dialog(window.as_ref(), attempts, new_record);
        }
    }
}

fn schedule_mismatch_reset(state: &Rc<RefCell<AppState>>, st: &mut AppState) {
    let generation = st.game.generation();
    let state_weak = Rc::downgrade(state);
    let handle = glib::timeout_add_local_once(st.settings.mismatch_delay(), move || {
        let Some(state) = state_weak.upgrade() else {
            return;
        };
        let mut st = state.borrow_mut();
        st.mismatch_timer.fired();
        if let Some((first, second)) = st.game.resolve_mismatch(generation) {
            sync_card(&st, first);
            sync_card(&st, second);
        }
    });
    st.mismatch_timer.arm(handle);
}

pub(super) fn reset_game(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    st.mismatch_timer.cancel();
    st.game.reset(&mut rand::rng());
    sync_all_cards(&st);
    update_status(&st);
    log::debug!("New game (generation {})", st.game.generation());
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("memory-match.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/basshift/MemoryMatch/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
    root.add_css_class("game-root");

    let status_label = build_status_label(&state.borrow());
    let board_grid = build_board_grid(state);

    let reset_button = ResetButton::new(&gettext("Reset Game"));
    reset_button.connect_activated({
        let state = state.clone();
        move || reset_game(&state)
    });

    root.append(&status_label);
    root.append(&board_grid);
    root.append(&reset_button.widget());

    state.borrow_mut().status_label = Some(status_label);

    root
}

fn add_app_actions(app: &adw::Application, state: &Rc<RefCell<AppState>>) {
    let new_game_action = SimpleAction::new("new-game", None);
    new_game_action.connect_activate({
        let state = state.clone();
        move |_, _| reset_game(&state)
    });
    app.add_action(&new_game_action);
    app.set_accels_for_action("app.new-game", &["<Control>r"]);

    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_instructions_dialog(&app);
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(&app);
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<Control>q"]);
}

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder()
        .application_id(APP_ID)
        .build();

    app.connect_activate(move |app| {
        load_css();

        let settings = GameSettings::load();
        log::debug!(
            "Assets in {}, high score in {}",
            settings.assets_dir.display(),
            settings.high_score_path.display()
        );
        let state = Rc::new(RefCell::new(AppState::new(settings)));

        add_app_actions(app, &state);

        let menu_model = gio::Menu::new();
        for (label, action) in [
            ("New Game", "app.new-game"),
            ("How to Play", "app.instructions"),
            ("About Memory Match", "app.about"),
            ("Quit", "app.quit"),
        ] {
            menu_model.append(Some(gettext(label).as_str()), Some(action));
        }
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let header = adw::HeaderBar::new();
        header.add_css_class("flat");
        header.pack_end(&menu_button);

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title(gettext("Memory Match"))
            .resizable(false)
            .content(&toolbar)
            .build();

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                state.borrow_mut().mismatch_timer.cancel();
                glib::Propagation::Proceed
            }
        });

        state.borrow_mut().window = Some(win.clone());
        win.present();
    });

    app.run()
}
