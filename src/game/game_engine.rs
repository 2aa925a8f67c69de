use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

use super::best_time::BestTimeRecorder;
use super::deck_builder::DeckBuilder;
use super::error::ConfigurationError;
use super::game_state::{Effect, GameState, Transition};
use super::scheduler::{Scheduler, TaskHandle};
use super::settings::{Settings, TICK_INTERVAL};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    tenths_from_duration, GameEngineCommand, GameEngineEvent, GameOutcome, SymbolPool,
};

/// Drives a [`GameState`] from taps and timer ticks, owns the scheduled tasks that
/// feed it, and reports every change to the presentation layer.
pub struct GameEngine {
    state: GameState,
    deck_builder: DeckBuilder,
    rng: StdRng,
    time_limit_tenths: u32,
    mismatch_delay: Duration,
    scheduler: Rc<dyn Scheduler>,
    ticker: Option<TaskHandle>,
    pending_hide: Option<TaskHandle>,
    best_time: BestTimeRecorder,
    debug_mode: bool,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        self.cancel_tasks();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, command: &GameEngineCommand) {
        self.handle_command(command.clone());
    }
}

impl GameEngine {
    /// Validates the board against the pools up front; a bad configuration is fatal
    /// here and cannot surface later during play. No game is running until
    /// [`GameEngine::start`].
    pub fn new(
        settings: &Settings,
        pools: Vec<SymbolPool>,
        scheduler: Rc<dyn Scheduler>,
        best_time: BestTimeRecorder,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        seed: Option<u64>,
    ) -> Result<Rc<RefCell<Self>>, ConfigurationError> {
        let deck_builder = DeckBuilder::new(pools, settings.board_slots)?;
        let seed = seed.unwrap_or_else(rand::random);
        info!(target: "game_engine", "Random seed: {}", seed);

        let time_limit_tenths = tenths_from_duration(settings.time_limit);
        let engine = Self {
            state: GameState::idle(time_limit_tenths),
            deck_builder,
            rng: StdRng::seed_from_u64(seed),
            time_limit_tenths,
            mismatch_delay: settings.mismatch_delay,
            scheduler,
            ticker: None,
            pending_hide: None,
            best_time,
            debug_mode: Settings::is_debug_mode(),
            game_engine_event_emitter,
            subscription: None,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        Ok(refcell)
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = Rc::downgrade(&engine);
        let subscription = game_engine_command_observer.subscribe(move |command| {
            if let Some(engine) = engine_handler.upgrade() {
                engine.borrow_mut().handle_event(command);
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::NewGame => self.start(),
            GameEngineCommand::CardTapped(index) => self.tap(index),
            GameEngineCommand::Tick => self.tick(),
            GameEngineCommand::HideMismatch(playthrough_id) => self.hide_mismatch(playthrough_id),
        }
    }

    /// Deals a fresh game. Whatever was running before (clock, pending hide) is
    /// cancelled first, and exactly one clock is running afterwards.
    pub fn start(&mut self) {
        self.cancel_tasks();

        let deck = self.deck_builder.deal(&mut self.rng);
        if self.debug_mode {
            debug!(target: "game_engine", "Deck: {:?}", deck);
        }
        self.state = GameState::new(deck, self.time_limit_tenths);
        info!(
            target: "game_engine",
            "New game {}; {} pairs, {:.1}s limit",
            self.state.playthrough_id,
            self.state.pair_count,
            self.state.timer.remaining_seconds()
        );

        self.ticker = Some(
            self.scheduler
                .schedule_repeating(TICK_INTERVAL, GameEngineCommand::Tick),
        );

        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameStarted {
                playthrough_id: self.state.playthrough_id,
                slot_count: self.state.cards.len(),
            });
        self.sync_board_display();
        self.sync_timer_display();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::BestTimeChanged {
                best_seconds: self.best_time.current_best(),
                new_record: false,
            });
    }

    pub fn tap(&mut self, index: usize) {
        let transition = self.state.apply_tap(index);
        self.apply(transition);
    }

    pub fn tick(&mut self) {
        let transition = self.state.apply_tick();
        self.apply(transition);
    }

    /// Applies a deferred hide, provided it was scheduled by the current game.
    pub fn hide_mismatch(&mut self, playthrough_id: Uuid) {
        if playthrough_id != self.state.playthrough_id {
            trace!(target: "game_engine", "Dropping hide from stale game {}", playthrough_id);
            return;
        }
        self.pending_hide = None;
        let transition = self.state.apply_hide();
        self.apply(transition);
    }

    fn apply(&mut self, transition: Transition) {
        let Transition { state, effect } = transition;
        self.state = state;
        trace!(target: "game_engine", "Effect: {:?}", effect);

        match effect {
            Effect::Ignored => {}
            Effect::Ticked => self.sync_timer_display(),
            Effect::Revealed { .. } | Effect::Matched { .. } | Effect::MismatchHidden { .. } => {
                self.sync_board_display()
            }
            Effect::Mismatched { .. } => {
                self.pending_hide = Some(self.scheduler.schedule_once(
                    self.mismatch_delay,
                    GameEngineCommand::HideMismatch(self.state.playthrough_id),
                ));
                self.sync_board_display();
            }
            Effect::Won { finish_seconds } => {
                self.cancel_tasks();
                let record = self.best_time.record_if_better(finish_seconds);
                info!(
                    target: "game_engine",
                    "Won game {} in {:.1}s",
                    self.state.playthrough_id,
                    finish_seconds
                );
                self.sync_board_display();
                self.sync_timer_display();
                if record.updated {
                    self.game_engine_event_emitter
                        .emit(GameEngineEvent::BestTimeChanged {
                            best_seconds: Some(record.new_best),
                            new_record: true,
                        });
                }
                self.game_engine_event_emitter
                    .emit(GameEngineEvent::GameOver {
                        outcome: GameOutcome::Won { finish_seconds },
                        record: Some(record),
                    });
            }
            Effect::Lost { abandoned } => {
                self.cancel_tasks();
                info!(
                    target: "game_engine",
                    "Lost game {} with {}/{} pairs; abandoned {:?}",
                    self.state.playthrough_id,
                    self.state.match_count,
                    self.state.pair_count,
                    abandoned
                );
                self.sync_board_display();
                self.sync_timer_display();
                self.game_engine_event_emitter
                    .emit(GameEngineEvent::GameOver {
                        outcome: GameOutcome::Lost,
                        record: None,
                    });
            }
        }
    }

    fn cancel_tasks(&mut self) {
        if let Some(handle) = self.pending_hide.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.ticker.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn sync_board_display(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::BoardUpdated(self.state.card_views()));
    }

    fn sync_timer_display(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::TimerUpdated(self.state.timer));
    }

    /// In [`TurnPhase::Idle`](crate::model::TurnPhase::Idle) until the first `start()`.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn outcome(&self) -> GameOutcome {
        self.state.outcome()
    }

    pub fn best_time(&self) -> Option<f64> {
        self.best_time.current_best()
    }

    pub fn best_time_label(&self) -> String {
        self.best_time.label()
    }

    pub fn slot_count(&self) -> usize {
        self.deck_builder.slot_count()
    }

    pub fn is_clock_running(&self) -> bool {
        self.ticker.is_some()
    }
}
