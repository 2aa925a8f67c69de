/// Something that consumes events of type `T` pushed at it by a channel subscription.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
