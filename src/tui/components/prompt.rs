//! # Prompt Components
//!
//! `PromptLine` paints the bottom row: blank, then the prompt glyph.
//!
//! `InputLine` is the accumulator behind it. It never draws anything itself;
//! it tells the surface what each key press means for the visible tail of
//! the row (`LineEvent`), and the surface does the drawing under its lock.
//!
//! ## Overflow
//!
//! The last column is never written, so the cursor never sits in the
//! terminal's pending-wrap state. Characters that do not fit are still
//! accumulated but not echoed, and backspacing over them erases nothing.

use std::io;

use ratatui::layout::Position;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::fit_to_width;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::KeyInput;
use crate::tui::screen::Screen;
use crate::tui::surface::Layout;

pub struct PromptLine {
    pub glyph: String,
}

impl PromptLine {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self { glyph: glyph.into() }
    }

    /// Glyph as drawn on a row of `width` cells (one column kept free).
    fn visible_glyph(&self, width: u16) -> &str {
        fit_to_width(&self.glyph, width.saturating_sub(1))
    }

    /// Cells left for echoed input after the glyph.
    pub fn room(&self, width: u16) -> u16 {
        let glyph = u16::try_from(self.visible_glyph(width).width()).unwrap_or(u16::MAX);
        width.saturating_sub(1).saturating_sub(glyph)
    }
}

impl Component for PromptLine {
    /// Leaves the cursor right after the glyph, where typing continues.
    fn render(&self, screen: &mut dyn Screen, layout: &Layout) -> io::Result<()> {
        let row = layout.input_row();
        screen.move_to(Position::new(0, row))?;
        screen.print(&" ".repeat(usize::from(layout.width)))?;
        screen.move_to(Position::new(0, row))?;
        screen.print(self.visible_glyph(layout.width))
    }
}

/// What a key press means for the prompt row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Show this character at the cursor.
    Echo(char),
    /// Blank this many cells immediately left of the cursor.
    Erase(u16),
    /// Enter: the completed line.
    Submit(String),
    /// Ctrl+C.
    Interrupt,
}

/// Accumulated text of the line being typed.
#[derive(Debug)]
pub struct InputLine {
    text: String,
    /// Cell widths of the echoed characters, in order.
    echoed: Vec<u16>,
    /// Characters accumulated after the row filled up.
    hidden: usize,
    room: u16,
}

impl InputLine {
    pub fn new(room: u16) -> Self {
        Self {
            text: String::new(),
            echoed: Vec::new(),
            hidden: 0,
            room,
        }
    }

    #[cfg(test)]
    fn text(&self) -> &str {
        &self.text
    }

    /// Give up on the line, returning whatever was typed.
    pub fn abandon(&mut self) -> String {
        self.echoed.clear();
        self.hidden = 0;
        std::mem::take(&mut self.text)
    }

    fn used(&self) -> u16 {
        self.echoed.iter().sum()
    }
}

impl EventHandler for InputLine {
    type Event = LineEvent;

    fn handle_event(&mut self, event: &KeyInput) -> Option<Self::Event> {
        match event {
            KeyInput::Char(c) => {
                self.text.push(*c);
                let width = u16::try_from(c.width().unwrap_or(0)).unwrap_or(u16::MAX);
                if self.hidden == 0 && self.used().saturating_add(width) <= self.room {
                    self.echoed.push(width);
                    Some(LineEvent::Echo(*c))
                } else {
                    self.hidden += 1;
                    None
                }
            }
            KeyInput::Backspace => {
                self.text.pop()?;
                if self.hidden > 0 {
                    self.hidden -= 1;
                    None
                } else {
                    self.echoed.pop().map(LineEvent::Erase)
                }
            }
            KeyInput::Enter => {
                self.echoed.clear();
                self.hidden = 0;
                Some(LineEvent::Submit(std::mem::take(&mut self.text)))
            }
            KeyInput::Interrupt => Some(LineEvent::Interrupt),
        }
    }
}
