use crate::destroyable::Destroyable;
use crate::events::Channel;
use crate::game::best_time::{BestTimeRecorder, JsonFileStore};
use crate::game::game_engine::GameEngine;
use crate::game::settings::Settings;
use crate::model::{animal_pools, GameEngineCommand, GameEngineEvent};
use gio::SimpleAction;
use gtk4::gdk::Display;
use gtk4::{
    prelude::*, Align, Application, ApplicationWindow, CssProvider, HeaderBar, Orientation,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::path::PathBuf;
use std::rc::Rc;

use super::card_grid_ui::CardGridUI;
use super::game_info_ui::GameInfoUI;
use super::glib_scheduler::GlibScheduler;

const DATA_DIR_NAME: &str = "animal-match";

const STYLE: &str = "
.card {
    font-size: 28px;
    min-width: 72px;
    min-height: 72px;
}
.card.face-down {
    background-image: none;
    background-color: lightblue;
}
.card.face-up {
    background-image: none;
    background-color: orange;
}
.card.matched {
    background-image: none;
    background-color: lightblue;
    opacity: 0.6;
}
.timer, .best-time {
    font-family: monospace;
}
";

fn data_dir() -> PathBuf {
    glib::user_data_dir().join(DATA_DIR_NAME)
}

fn load_css() {
    let Some(display) = Display::default() else {
        log::warn!(target: "window", "No display; skipping stylesheet");
        return;
    };
    let provider = CssProvider::new();
    provider.load_from_string(STYLE);
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

pub fn build_ui(app: &Application) {
    let (game_engine_command_emitter, game_engine_command_observer) =
        Channel::<GameEngineCommand>::new();
    let (game_engine_event_emitter, game_engine_event_observer) =
        Channel::<GameEngineEvent>::new();

    let data_dir = data_dir();
    let settings = Settings::load_from(&data_dir.join("settings.json"));
    let best_time =
        BestTimeRecorder::load(Box::new(JsonFileStore::new(data_dir.join("preferences.json"))));
    let scheduler = Rc::new(GlibScheduler::new(game_engine_command_emitter.clone()));

    let game_engine = match GameEngine::new(
        &settings,
        animal_pools(),
        scheduler,
        best_time,
        game_engine_command_observer,
        game_engine_event_emitter,
        Settings::seed_from_env(),
    ) {
        Ok(game_engine) => game_engine,
        Err(e) => {
            log::error!(target: "window", "Invalid game configuration: {}", e);
            app.quit();
            return;
        }
    };

    load_css();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Animal Match")
        .resizable(true)
        .default_width(420)
        .default_height(560)
        .build();
    window.set_titlebar(Some(&HeaderBar::new()));

    let (initial_timer, initial_best_label, slot_count) = {
        let engine = game_engine.borrow();
        (
            engine.state().timer,
            engine.best_time_label(),
            engine.slot_count(),
        )
    };

    let game_info_ui = GameInfoUI::new(
        &window,
        &initial_timer,
        &initial_best_label,
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );
    let card_grid_ui = CardGridUI::new(
        slot_count,
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );

    let main_box = gtk4::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .margin_top(12)
        .margin_bottom(12)
        .margin_start(12)
        .margin_end(12)
        .halign(Align::Center)
        .build();
    main_box.append(&game_info_ui.borrow().info_box);
    main_box.append(&card_grid_ui.borrow().grid);
    main_box.append(&game_info_ui.borrow().play_button);
    window.set_child(Some(&main_box));

    let action_new_game = SimpleAction::new("new-game", None);
    action_new_game.connect_activate({
        let game_engine_command_emitter = game_engine_command_emitter.clone();
        move |_, _| {
            game_engine_command_emitter.emit(GameEngineCommand::NewGame);
        }
    });
    window.add_action(&action_new_game);
    app.set_accels_for_action("win.new-game", &["<Control>n"]);

    window.connect_close_request(move |_| {
        log::trace!(target: "window", "Destroying window");
        game_engine.borrow_mut().destroy();
        game_info_ui.borrow_mut().destroy();
        card_grid_ui.borrow_mut().destroy();
        glib::signal::Propagation::Proceed
    });

    window.present();
}
