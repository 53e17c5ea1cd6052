/// Hook called by a solver after each iteration.
///
/// The solver hands over an event `E` describing its progress. Returning
/// `Some(action)` asks the solver to act on `A` (for the ALM driver, stop
/// early); returning `None` leaves the iteration alone.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer and `()` observes
/// nothing. Wrap a borrowed observer in [`ByRef`] to let it follow several
/// solves.
pub trait Observer<E, A> {
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

/// Forwards to the borrowed observer.
pub struct ByRef<'o, O: ?Sized>(pub &'o mut O);

impl<E, A, O: Observer<E, A> + ?Sized> Observer<E, A> for ByRef<'_, O> {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.0.observe(event)
    }
}
