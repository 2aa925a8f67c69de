//! Typed single-threaded channels between the engine and the presentation layer.
mod channel;
mod event_handler;

pub use channel::{Callback, Channel, EventEmitter, EventObserver, SubscriptionId, Unsubscriber};
pub use event_handler::EventHandler;
