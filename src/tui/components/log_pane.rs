//! # LogPane Component
//!
//! Draws the scroll buffer bottom-anchored in the upper region: the newest
//! line sits on the last pane row and older lines stack above it. Each row
//! is blanked to the full width before its line is written, so a shorter
//! line never leaves the tail of the one it replaced behind.

use std::io;

use ratatui::layout::Position;

use super::fit_to_width;
use crate::core::state::ScrollBuffer;
use crate::tui::component::Component;
use crate::tui::screen::Screen;
use crate::tui::surface::Layout;

pub struct LogPane<'a> {
    pub buffer: &'a ScrollBuffer,
}

impl Component for LogPane<'_> {
    fn render(&self, screen: &mut dyn Screen, layout: &Layout) -> io::Result<()> {
        let blank = " ".repeat(usize::from(layout.width));
        let first = self.buffer.first_row(layout.pane_height);

        for (row, line) in (first..layout.pane_height).zip(self.buffer.iter()) {
            screen.move_to(Position::new(0, row))?;
            screen.print(&blank)?;
            if !line.is_empty() {
                screen.move_to(Position::new(0, row))?;
                screen.print(fit_to_width(line, layout.width))?;
            }
        }
        Ok(())
    }
}
