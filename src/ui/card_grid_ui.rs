use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{Align, Button, Grid};

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{CardFace, CardView, GameEngineCommand, GameEngineEvent, CARD_BACK};

const COLUMNS: usize = 4;
const FACE_CLASSES: [&str; 3] = ["face-down", "face-up", "matched"];

fn face_class(face: CardFace) -> &'static str {
    match face {
        CardFace::FaceDown => "face-down",
        CardFace::FaceUp => "face-up",
        CardFace::Matched => "matched",
    }
}

/// The board: one button per slot, laid out four to a row.
pub struct CardGridUI {
    pub grid: Grid,
    buttons: Vec<Button>,
    game_engine_event_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for CardGridUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_event_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl CardGridUI {
    pub fn new(
        slot_count: usize,
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let grid = Grid::builder()
            .name("card-grid")
            .css_classes(["card-grid"])
            .row_spacing(8)
            .column_spacing(8)
            .halign(Align::Center)
            .visible(false)
            .build();

        let buttons = (0..slot_count)
            .map(|index| {
                let button = Button::builder()
                    .label(CARD_BACK)
                    .css_classes(["card", "face-down"])
                    .width_request(72)
                    .height_request(72)
                    .build();
                let emitter = game_engine_command_emitter.clone();
                button.connect_clicked(move |_| {
                    emitter.emit(GameEngineCommand::CardTapped(index));
                });
                grid.attach(
                    &button,
                    (index % COLUMNS) as i32,
                    (index / COLUMNS) as i32,
                    1,
                    1,
                );
                button
            })
            .collect();

        let card_grid = Rc::new(RefCell::new(Self {
            grid,
            buttons,
            game_engine_event_subscription: None,
        }));
        CardGridUI::bind_observer(&card_grid, game_engine_event_observer);
        card_grid
    }

    fn bind_observer(
        card_grid: &Rc<RefCell<Self>>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) {
        let card_grid_weak = Rc::downgrade(card_grid);
        let subscription = game_engine_event_observer.subscribe(move |event| {
            if let Some(card_grid) = card_grid_weak.upgrade() {
                card_grid.borrow().handle_game_engine_event(event);
            }
        });
        card_grid.borrow_mut().game_engine_event_subscription = Some(subscription);
    }

    fn handle_game_engine_event(&self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::GameStarted { .. } => self.grid.set_visible(true),
            GameEngineEvent::BoardUpdated(views) => self.update_cards(views),
            GameEngineEvent::GameOver { .. } => self.grid.set_visible(false),
            _ => {}
        }
    }

    fn update_cards(&self, views: &[CardView]) {
        for (button, view) in self.buttons.iter().zip(views) {
            button.set_label(&view.label);
            for class in FACE_CLASSES {
                button.remove_css_class(class);
            }
            button.add_css_class(face_class(view.face));
            button.set_sensitive(view.face != CardFace::Matched);
        }
    }
}
