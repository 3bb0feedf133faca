use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn win_message(attempts: u32) -> String {
    gettext("You won! It took you {} attempts.").replace("{}", &attempts.to_string())
}

pub fn show_win_dialog(
    parent: Option<&adw::ApplicationWindow>,
    attempts: u32,
    new_record: bool,
) -> adw::AlertDialog {
    let mut body = win_message(attempts);
    if new_record {
        body.push('\n');
        body.push_str(&gettext("That's a new high score!"));
    }
    let heading = gettext("Congratulations!");
    let dialog = adw::AlertDialog::new(Some(heading.as_str()), Some(body.as_str()));
    dialog.add_response("ok", &gettext("OK"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(parent);
    dialog
}

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let heading = gettext("How to Play");
    let body = gettext(
        "Flip two cards at a time to find matching pairs.\n\
Cards that don't match turn back over after a moment.\n\
Clear the board in as few attempts as you can.",
    );
    let dialog = adw::AlertDialog::new(Some(heading.as_str()), Some(body.as_str()));
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Memory Match")
        .application_icon("io.basshift.MemoryMatch")
        .developer_name("Basshift")
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Find all the pairs in as few attempts as possible."))
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_message_mentions_attempts() {
        assert_eq!(win_message(14), "You won! It took you 14 attempts.");
    }
}
