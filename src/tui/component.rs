use std::io;

use super::screen::Screen;
use super::surface::Layout;

/// A region of the display surface that knows how to paint itself.
///
/// Components receive data via props (struct fields) and write straight to
/// the `Screen` at absolute positions taken from the `Layout`. A component
/// only touches its own rows; saving and restoring the cursor is the
/// surface's job.
pub trait Component {
    fn render(&self, screen: &mut dyn Screen, layout: &Layout) -> io::Result<()>;
}

/// A component that handles key presses.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `KeyInput` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::KeyInput) -> Option<Self::Event>;
}
