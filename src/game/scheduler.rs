use log::trace;
use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::model::GameEngineCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// Delivers engine commands later, once or periodically.
///
/// Cancelling a handle that already fired, or was never issued, does nothing.
pub trait Scheduler {
    fn schedule_repeating(&self, period: Duration, command: GameEngineCommand) -> TaskHandle;
    fn schedule_once(&self, delay: Duration, command: GameEngineCommand) -> TaskHandle;
    fn cancel(&self, handle: TaskHandle);
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    handle: TaskHandle,
    due: Duration,
    period: Option<Duration>,
    command: GameEngineCommand,
}

/// Scheduler driven by a virtual clock; nothing fires until [`ManualScheduler::advance`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_handle: Cell<u64>,
    tasks: RefCell<Vec<ScheduledTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn repeating_count(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|task| task.period.is_some())
            .count()
    }

    /// Moves the clock forward by `by`, handing each due command to `dispatch` in due
    /// order. Tasks are fired one at a time with no borrow held, so `dispatch` may
    /// schedule or cancel tasks and see the effect within the same advance.
    pub fn advance<F>(&self, by: Duration, mut dispatch: F)
    where
        F: FnMut(GameEngineCommand),
    {
        let target = self.now.get() + by;
        while let Some(command) = self.fire_next(target) {
            dispatch(command);
        }
        self.now.set(target);
    }

    fn fire_next(&self, target: Duration) -> Option<GameEngineCommand> {
        let mut tasks = self.tasks.borrow_mut();
        let (position, _) = tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= target)
            .min_by_key(|(_, task)| (task.due, task.handle))?;

        let ScheduledTask {
            handle,
            due,
            period,
            ref command,
        } = tasks[position];
        let command = command.clone();
        self.now.set(due);
        trace!(target: "scheduler", "{:?} fired {:?} at {:?}", handle, command, due);
        match period {
            Some(period) => tasks[position].due += period,
            None => {
                tasks.remove(position);
            }
        }
        Some(command)
    }

    fn push(
        &self,
        due_in: Duration,
        period: Option<Duration>,
        command: GameEngineCommand,
    ) -> TaskHandle {
        let handle = TaskHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.tasks.borrow_mut().push(ScheduledTask {
            handle,
            due: self.now.get() + due_in,
            period,
            command,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, command: GameEngineCommand) -> TaskHandle {
        self.push(period, Some(period), command)
    }

    fn schedule_once(&self, delay: Duration, command: GameEngineCommand) -> TaskHandle {
        self.push(delay, None, command)
    }

    fn cancel(&self, handle: TaskHandle) {
        self.tasks.borrow_mut().retain(|task| task.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn test_repeating_task_fires_each_period() {
        let scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(TICK, GameEngineCommand::Tick);

        let mut fired = 0;
        scheduler.advance(Duration::from_millis(1050), |_| fired += 1);
        assert_eq!(fired, 10);
        assert_eq!(scheduler.now(), Duration::from_millis(1050));
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_once_task_fires_once_in_due_order() {
        let scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(Duration::from_millis(300), GameEngineCommand::Tick);
        scheduler.schedule_once(Duration::from_millis(500), GameEngineCommand::CardTapped(3));

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_millis(700), |command| fired.push(command));
        assert_eq!(
            fired,
            vec![
                GameEngineCommand::Tick,
                GameEngineCommand::CardTapped(3),
                GameEngineCommand::Tick
            ]
        );
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_cancel_during_dispatch_takes_effect() {
        let scheduler = ManualScheduler::new();
        let ticker = scheduler.schedule_repeating(TICK, GameEngineCommand::Tick);

        let mut fired = 0;
        scheduler.advance(Duration::from_secs(1), |_| {
            fired += 1;
            if fired == 3 {
                scheduler.cancel(ticker);
            }
        });
        assert_eq!(fired, 3);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_unknown_handle_is_noop() {
        let scheduler = ManualScheduler::new();
        let once = scheduler.schedule_once(TICK, GameEngineCommand::NewGame);
        scheduler.advance(TICK, |_| {});
        scheduler.cancel(once);
        scheduler.cancel(TaskHandle(1234));
        assert_eq!(scheduler.pending_count(), 0);
    }
}
