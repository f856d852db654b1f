//! # StatusLine Component
//!
//! The divider between the log pane and the prompt: a fixed marker with the
//! process id, filled out to the full width and drawn in its own colour.
//!
//! ```text
//! -[48213]-----------------------------------------------
//! ```
//!
//! Stateless. The colour is reset after drawing so nothing written later
//! inherits it.

use std::io;

use ratatui::layout::Position;
use ratatui::style::Color;

use super::pad_to_width;
use crate::tui::component::Component;
use crate::tui::screen::Screen;
use crate::tui::surface::Layout;

pub struct StatusLine {
    pub label: String,
    pub fill: char,
    pub color: Color,
}

impl StatusLine {
    /// Status line labelled with the current process id.
    pub fn for_process(fill: char, color: Color) -> Self {
        Self {
            label: format!("-[{}]", std::process::id()),
            fill,
            color,
        }
    }
}

impl Component for StatusLine {
    fn render(&self, screen: &mut dyn Screen, layout: &Layout) -> io::Result<()> {
        screen.set_foreground(self.color)?;
        screen.move_to(Position::new(0, layout.status_row()))?;
        screen.print(&pad_to_width(&self.label, layout.width, self.fill))?;
        screen.reset_color()
    }
}
