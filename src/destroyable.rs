// implemented by components holding scheduled tasks or subscriptions that form reference
// cycles; `destroy` breaks them so the component can be dropped
pub trait Destroyable {
    fn destroy(&mut self);
}
