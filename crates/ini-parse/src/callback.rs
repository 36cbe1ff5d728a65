//! Push-style consumption of parser events.

use crate::Event;

/// Receives events from [`Parser::parse`](crate::Parser::parse).
pub trait ParseCallback<'src> {
    /// Handle one event. Return `false` to stop parsing early.
    fn event(&mut self, event: Event<'src>) -> bool;
}

impl<'src> ParseCallback<'src> for Vec<Event<'src>> {
    fn event(&mut self, event: Event<'src>) -> bool {
        self.push(event);
        true
    }
}
