use animal_match::ui;
use gtk4::prelude::*;
use gtk4::Application;

const APP_ID: &str = "org.animalmatch.AnimalMatch";

fn init_logging() {
    env_logger::init();
}

fn main() -> glib::ExitCode {
    init_logging();

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(ui::window::build_ui);
    app.run()
}
