//! Character-grid output.
//!
//! `Screen` is the narrow set of absolute-positioned operations the display
//! surface needs. `CrosstermScreen` drives a real terminal; `VirtualScreen`
//! keeps an in-memory grid so rendering can be asserted cell by cell.
//!
//! Both track the cursor themselves instead of asking the terminal, so saving
//! and restoring it around a redraw never costs a round-trip.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

pub trait Screen: Send {
    /// Grid dimensions, fixed for the lifetime of the screen.
    fn size(&self) -> Size;

    fn cursor(&self) -> Position;

    fn move_to(&mut self, position: Position) -> io::Result<()>;

    /// Write `text` at the cursor, advancing it. Text is never wrapped.
    fn print(&mut self, text: &str) -> io::Result<()>;

    fn set_foreground(&mut self, color: Color) -> io::Result<()>;

    fn reset_color(&mut self) -> io::Result<()>;

    /// Blank the whole grid and home the cursor.
    fn clear(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Cursor column after writing `text` from `x` on a `width`-column grid.
///
/// Terminals hold the cursor on the last column after writing into it, so
/// the result is clamped there.
fn advance(x: u16, text: &str, width: u16) -> u16 {
    let cells = u16::try_from(text.width()).unwrap_or(u16::MAX);
    x.saturating_add(cells).min(width.saturating_sub(1))
}

// ============================================================================
// Crossterm
// ============================================================================

pub struct CrosstermScreen<W: Write> {
    out: W,
    size: Size,
    cursor: Position,
}

impl<W: Write + Send> CrosstermScreen<W> {
    /// Wrap `out`, sizing the grid from the controlling terminal.
    pub fn new(out: W) -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::with_size(out, Size::new(width, height)))
    }

    pub fn with_size(out: W, size: Size) -> Self {
        Self {
            out,
            size,
            cursor: Position::ORIGIN,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Screen for CrosstermScreen<W> {
    fn size(&self) -> Size {
        self.size
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn move_to(&mut self, position: Position) -> io::Result<()> {
        queue!(self.out, MoveTo(position.x, position.y))?;
        self.cursor = position;
        Ok(())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))?;
        self.cursor.x = advance(self.cursor.x, text, self.size.width);
        Ok(())
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        queue!(self.out, SetForegroundColor(to_crossterm(color)))
    }

    fn reset_color(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.cursor = Position::ORIGIN;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn to_crossterm(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Reset => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::Gray => C::Grey,
        Color::DarkGray => C::DarkGrey,
        Color::LightRed => C::Red,
        Color::LightGreen => C::Green,
        Color::LightYellow => C::Yellow,
        Color::LightBlue => C::Blue,
        Color::LightMagenta => C::Magenta,
        Color::LightCyan => C::Cyan,
        Color::White => C::White,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        Color::Indexed(i) => C::AnsiValue(i),
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// A screen that draws into a `ratatui` buffer.
///
/// Records which rows were written since the last `take_touched_rows`, which
/// is how tests check that a redraw left the other regions alone.
pub struct VirtualScreen {
    grid: Buffer,
    cursor: Position,
    foreground: Color,
    touched: BTreeSet<u16>,
    flushes: usize,
}

impl VirtualScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            grid: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: Position::ORIGIN,
            foreground: Color::Reset,
            touched: BTreeSet::new(),
            flushes: 0,
        }
    }

    /// Row `y` with trailing blanks removed.
    pub fn row(&self, y: u16) -> String {
        (0..self.grid.area.width)
            .filter_map(|x| self.grid.cell(Position::new(x, y)))
            .map(|cell| cell.symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// Every row, top to bottom, trailing blanks removed.
    pub fn rows(&self) -> Vec<String> {
        (0..self.grid.area.height).map(|y| self.row(y)).collect()
    }

    pub fn foreground_at(&self, x: u16, y: u16) -> Option<Color> {
        self.grid.cell(Position::new(x, y)).map(|cell| cell.fg)
    }

    pub fn take_touched_rows(&mut self) -> Vec<u16> {
        std::mem::take(&mut self.touched).into_iter().collect()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Screen for VirtualScreen {
    fn size(&self) -> Size {
        self.grid.area.as_size()
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn move_to(&mut self, position: Position) -> io::Result<()> {
        if !self.grid.area.contains(position) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cursor position {position:?} outside {:?}", self.grid.area),
            ));
        }
        self.cursor = position;
        Ok(())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        let Position { x, y } = self.cursor;
        let room = usize::from(self.grid.area.width.saturating_sub(x));
        self.grid
            .set_stringn(x, y, text, room, Style::default().fg(self.foreground));
        self.touched.insert(y);
        self.cursor.x = advance(x, text, self.grid.area.width);
        Ok(())
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.foreground = color;
        Ok(())
    }

    fn reset_color(&mut self) -> io::Result<()> {
        self.foreground = Color::Reset;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.grid.reset();
        self.touched.extend(0..self.grid.area.height);
        self.cursor = Position::ORIGIN;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
