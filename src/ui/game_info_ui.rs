// clock, best time and the play button

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{AlertDialog, ApplicationWindow, Button, Label, Orientation};
use log::debug;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::game::best_time::best_time_label;
use crate::model::{GameEngineCommand, GameEngineEvent, GameOutcome, RecordResult, TimerState};

pub struct GameInfoUI {
    pub info_box: gtk4::Box,
    pub play_button: Button,
    elapsed_label: Label,
    remaining_label: Label,
    best_label: Label,
    window: ApplicationWindow,
    game_engine_event_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for GameInfoUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_event_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameInfoUI {
    pub fn new(
        window: &ApplicationWindow,
        initial_timer: &TimerState,
        initial_best_label: &str,
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let elapsed_label = Label::builder()
            .label(initial_timer.elapsed_label())
            .css_classes(["timer"])
            .build();
        let remaining_label = Label::builder()
            .label(initial_timer.remaining_label())
            .css_classes(["timer"])
            .build();
        let best_label = Label::builder()
            .label(initial_best_label)
            .css_classes(["best-time"])
            .build();

        let info_box = gtk4::Box::builder()
            .name("game-info")
            .orientation(Orientation::Vertical)
            .spacing(4)
            .build();
        info_box.append(&elapsed_label);
        info_box.append(&remaining_label);
        info_box.append(&best_label);

        let play_button = Button::builder()
            .label("Start")
            .css_classes(["play-button", "suggested-action"])
            .build();
        play_button.connect_clicked(move |_| {
            game_engine_command_emitter.emit(GameEngineCommand::NewGame);
        });

        let game_info = Rc::new(RefCell::new(Self {
            info_box,
            play_button,
            elapsed_label,
            remaining_label,
            best_label,
            window: window.clone(),
            game_engine_event_subscription: None,
        }));
        GameInfoUI::bind_observer(&game_info, game_engine_event_observer);
        game_info
    }

    fn bind_observer(
        game_info: &Rc<RefCell<Self>>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) {
        let game_info_weak = Rc::downgrade(game_info);
        let subscription = game_engine_event_observer.subscribe(move |event| {
            if let Some(game_info) = game_info_weak.upgrade() {
                game_info.borrow().handle_game_engine_event(event);
            }
        });
        game_info.borrow_mut().game_engine_event_subscription = Some(subscription);
    }

    fn handle_game_engine_event(&self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::GameStarted { .. } => {
                self.play_button.set_visible(false);
            }
            GameEngineEvent::TimerUpdated(timer_state) => {
                self.update_timer_labels(timer_state);
            }
            GameEngineEvent::BestTimeChanged { best_seconds, .. } => {
                self.best_label.set_text(&best_time_label(*best_seconds));
            }
            GameEngineEvent::GameOver { outcome, record } => {
                self.show_game_over(*outcome, *record);
            }
            _ => {}
        }
    }

    fn update_timer_labels(&self, timer_state: &TimerState) {
        self.elapsed_label.set_text(&timer_state.elapsed_label());
        self.remaining_label.set_text(&timer_state.remaining_label());
    }

    fn show_game_over(&self, outcome: GameOutcome, record: Option<RecordResult>) {
        self.play_button.set_label("Play Again");
        self.play_button.set_visible(true);

        let Some((title, detail)) = outcome.summary(record) else {
            return;
        };
        debug!(target: "game_info_ui", "Game over: {}", title);
        let dialog = AlertDialog::builder()
            .modal(true)
            .message(title)
            .detail(detail)
            .build();
        dialog.show(Some(&self.window));
    }
}
