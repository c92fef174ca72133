/// Response-context slot for a request.
///
/// A request adapter stores the value produced by the access layer here (as a
/// request extension); the final route stage takes it out and serializes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged<T>(pub T);

impl<T> Staged<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}
