use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use glib::{timeout_add_local, timeout_add_local_once, ControlFlow, SourceId};
use log::trace;

use crate::events::EventEmitter;
use crate::game::scheduler::{Scheduler, TaskHandle};
use crate::model::GameEngineCommand;

type Sources = Rc<RefCell<HashMap<TaskHandle, SourceId>>>;

/// Runs scheduled commands on the GTK main loop, feeding them back through the
/// engine's command channel.
pub struct GlibScheduler {
    game_engine_command_emitter: EventEmitter<GameEngineCommand>,
    next_handle: Cell<u64>,
    sources: Sources,
}

impl GlibScheduler {
    pub fn new(game_engine_command_emitter: EventEmitter<GameEngineCommand>) -> Self {
        Self {
            game_engine_command_emitter,
            next_handle: Cell::new(0),
            sources: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn next_handle(&self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        handle
    }
}

impl Scheduler for GlibScheduler {
    fn schedule_repeating(&self, period: Duration, command: GameEngineCommand) -> TaskHandle {
        let handle = self.next_handle();
        let emitter = self.game_engine_command_emitter.clone();
        let source = timeout_add_local(period, move || {
            emitter.emit(command.clone());
            ControlFlow::Continue
        });
        self.sources.borrow_mut().insert(handle, source);
        trace!(target: "glib_scheduler", "{:?} repeating every {:?}", handle, period);
        handle
    }

    fn schedule_once(&self, delay: Duration, command: GameEngineCommand) -> TaskHandle {
        let handle = self.next_handle();
        let emitter = self.game_engine_command_emitter.clone();
        let sources = Rc::downgrade(&self.sources);
        let source = timeout_add_local_once(delay, move || {
            // the source is finished once this returns; forget it so cancel won't remove it
            if let Some(sources) = sources.upgrade() {
                sources.borrow_mut().remove(&handle);
            }
            emitter.emit(command);
        });
        self.sources.borrow_mut().insert(handle, source);
        trace!(target: "glib_scheduler", "{:?} once after {:?}", handle, delay);
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        let source = self.sources.borrow_mut().remove(&handle);
        if let Some(source) = source {
            trace!(target: "glib_scheduler", "Cancelling {:?}", handle);
            source.remove();
        }
    }
}

impl Drop for GlibScheduler {
    fn drop(&mut self) {
        for (_, source) in self.sources.borrow_mut().drain() {
            source.remove();
        }
    }
}
