//! # Display Surface
//!
//! Owns the screen and the scroll buffer and is the only thing that writes
//! to either.
//!
//! ## Layout
//!
//! ```text
//! row 0              ┐
//! ...                │ log pane (pane_height rows, bottom-anchored)
//! row pane_height-1  ┘
//! row pane_height      spacer
//! row pane_height+1    -[pid]-------------------------------
//! row pane_height+2    > typed text_
//! ```
//!
//! ## Locking
//!
//! Screen and buffer sit behind one mutex. Every write sequence (full
//! redraw, prompt reset, echo, backspace erase) runs while holding it, so a
//! redraw triggered by the display loop can never interleave with the echo
//! of a key press. Redraws save the cursor first and put it back after, so
//! the user's typing position survives them.
//!
//! ## Breakable read
//!
//! `read_input` waits on two sources at once: the next key event and the
//! shutdown flag. Whichever fires first wins, so a shutdown request ends a
//! pending read immediately even when no key ever arrives.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use crossterm::event::Event;
use futures::{Stream, StreamExt};
use log::{debug, info};
use ratatui::layout::{Position, Size};

use crate::core::config::DisplaySettings;
use crate::core::relay::{LineSink, LineSource};
use crate::core::state::{ScrollBuffer, ShutdownFlag};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{InputLine, LineEvent, LogPane, PromptLine, StatusLine};
use crate::tui::event::translate;
use crate::tui::screen::Screen;

/// Row geometry for a terminal of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    /// Rows available to the log pane.
    pub pane_height: u16,
}

impl Layout {
    pub const MIN_WIDTH: u16 = 3;
    /// Pane, spacer, status and input rows.
    pub const MIN_HEIGHT: u16 = 4;

    pub fn for_size(size: Size) -> io::Result<Self> {
        if size.width < Self::MIN_WIDTH || size.height < Self::MIN_HEIGHT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "terminal is {}x{}, need at least {}x{}",
                    size.width,
                    size.height,
                    Self::MIN_WIDTH,
                    Self::MIN_HEIGHT
                ),
            ));
        }
        Ok(Self {
            width: size.width,
            pane_height: size.height - 3,
        })
    }

    pub fn status_row(&self) -> u16 {
        self.pane_height + 1
    }

    pub fn input_row(&self) -> u16 {
        self.pane_height + 2
    }
}

struct Inner<S> {
    screen: S,
    buffer: ScrollBuffer,
}

type ShutdownCallback = Box<dyn Fn() + Send + Sync>;

pub struct DisplaySurface<S: Screen> {
    inner: Mutex<Inner<S>>,
    layout: Layout,
    status: StatusLine,
    prompt: PromptLine,
    shutdown: ShutdownFlag,
    on_shutdown: ShutdownCallback,
}

impl<S: Screen> DisplaySurface<S> {
    /// Clear the screen, buffer the preamble and draw everything.
    ///
    /// `on_shutdown` runs every time a shutdown is triggered through this
    /// surface (Ctrl+C, end of input, or a platform signal forwarded to
    /// `trigger_shutdown`).
    pub fn initialize<I, L, F>(
        mut screen: S,
        settings: &DisplaySettings,
        preamble: I,
        shutdown: ShutdownFlag,
        on_shutdown: F,
    ) -> io::Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
        F: Fn() + Send + Sync + 'static,
    {
        let layout = Layout::for_size(screen.size())?;
        let pane = usize::from(layout.pane_height);
        let capacity = settings.capacity.map_or(pane, |cap| cap.min(pane));
        info!(
            "Initializing display surface: {}x{}, buffer capacity {}",
            layout.width,
            screen.size().height,
            capacity
        );

        screen.clear()?;
        let mut buffer = ScrollBuffer::new(capacity);
        for line in preamble {
            buffer.push(line);
        }

        let surface = Self {
            inner: Mutex::new(Inner { screen, buffer }),
            layout,
            status: StatusLine::for_process(settings.status_fill, settings.status_color),
            prompt: PromptLine::new(settings.prompt.clone()),
            shutdown,
            on_shutdown: Box::new(on_shutdown),
        };

        // The prompt is drawn on its own; redraws never touch the input row,
        // so text being typed survives incoming messages.
        surface.reset_prompt()?;
        surface.render()?;
        Ok(surface)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn shutdown_flag(&self) -> &ShutdownFlag {
        &self.shutdown
    }

    /// Append a message to the scroll buffer and redraw.
    pub fn display(&self, message: &str) -> io::Result<()> {
        let mut inner = self.lock();
        if let Some(evicted) = inner.buffer.push(message) {
            debug!("Evicted oldest line ({} bytes)", evicted.len());
        }
        self.render_locked(&mut inner)
    }

    /// Redraw the status line and the log pane.
    pub fn render(&self) -> io::Result<()> {
        let mut inner = self.lock();
        self.render_locked(&mut inner)
    }

    /// Raise the shutdown flag and run the registered callback.
    pub fn trigger_shutdown(&self) {
        if self.shutdown.request() {
            info!("Shutdown requested");
        } else {
            debug!("Shutdown requested again");
        }
        (self.on_shutdown)();
    }

    /// Read one line from `keys`.
    ///
    /// Returns the typed text when Enter is pressed. If shutdown is requested
    /// first (by anyone, including Ctrl+C here or the key stream ending),
    /// whatever was typed is discarded and an empty string comes back.
    pub async fn read_input<K>(&self, keys: &mut K) -> io::Result<String>
    where
        K: Stream<Item = io::Result<Event>> + Unpin,
    {
        enum Wake {
            Shutdown,
            Key(Option<io::Result<Event>>),
        }

        let mut line = InputLine::new(self.prompt.room(self.layout.width));
        loop {
            let wake = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => Wake::Shutdown,
                event = keys.next() => Wake::Key(event),
            };

            let event = match wake {
                Wake::Shutdown => return Ok(discard(line)),
                Wake::Key(None) => {
                    info!("Key stream ended");
                    self.trigger_shutdown();
                    return Ok(discard(line));
                }
                Wake::Key(Some(event)) => event?,
            };

            let Some(key) = translate(&event) else {
                continue;
            };
            match line.handle_event(&key) {
                Some(LineEvent::Echo(c)) => self.echo(c)?,
                Some(LineEvent::Erase(cells)) => self.erase(cells)?,
                Some(LineEvent::Submit(text)) => {
                    self.reset_prompt()?;
                    return Ok(text);
                }
                Some(LineEvent::Interrupt) => {
                    self.trigger_shutdown();
                    return Ok(discard(line));
                }
                None => {}
            }
        }
    }

    /// Blank the prompt row and leave the cursor at its start, ready for
    /// whatever the shell prints after exit.
    pub fn close(&self) -> io::Result<()> {
        let mut inner = self.lock();
        let row = self.layout.input_row();
        inner.screen.move_to(Position::new(0, row))?;
        inner.screen.print(&" ".repeat(usize::from(self.layout.width)))?;
        inner.screen.move_to(Position::new(0, row))?;
        inner.screen.flush()
    }

    /// Snapshot of the scroll buffer, oldest first.
    pub fn buffered_lines(&self) -> Vec<String> {
        self.lock().buffer.iter().map(str::to_string).collect()
    }

    /// Run `f` against the screen, e.g. to inspect a `VirtualScreen`.
    pub fn with_screen<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().screen)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_locked(&self, inner: &mut Inner<S>) -> io::Result<()> {
        let Inner { screen, buffer } = inner;
        let saved = screen.cursor();

        self.status.render(&mut *screen, &self.layout)?;
        LogPane { buffer: &*buffer }.render(&mut *screen, &self.layout)?;

        screen.move_to(saved)?;
        screen.flush()
    }

    fn reset_prompt(&self) -> io::Result<()> {
        let mut inner = self.lock();
        self.prompt.render(&mut inner.screen, &self.layout)?;
        inner.screen.flush()
    }

    fn echo(&self, c: char) -> io::Result<()> {
        let mut inner = self.lock();
        inner.screen.print(c.encode_utf8(&mut [0; 4]))?;
        inner.screen.flush()
    }

    /// Blank `cells` cells left of the cursor and step back over them.
    fn erase(&self, cells: u16) -> io::Result<()> {
        if cells == 0 {
            return Ok(());
        }
        let mut inner = self.lock();
        let Position { x, y } = inner.screen.cursor();
        let target = Position::new(x.saturating_sub(cells), y);
        inner.screen.move_to(target)?;
        inner.screen.print(&" ".repeat(usize::from(cells)))?;
        inner.screen.move_to(target)?;
        inner.screen.flush()
    }
}

fn discard(mut line: InputLine) -> String {
    let partial = line.abandon();
    if !partial.is_empty() {
        debug!(
            "Discarding {} character(s) of partial input on shutdown",
            partial.chars().count()
        );
    }
    String::new()
}

impl<S: Screen> LineSink for DisplaySurface<S> {
    fn display(&self, line: &str) -> io::Result<()> {
        DisplaySurface::display(self, line)
    }
}

/// Pairs a shared surface with the key stream it reads from.
pub struct SurfaceReader<S: Screen, K> {
    surface: Arc<DisplaySurface<S>>,
    keys: K,
}

impl<S: Screen, K> SurfaceReader<S, K> {
    pub fn new(surface: Arc<DisplaySurface<S>>, keys: K) -> Self {
        Self { surface, keys }
    }
}

#[async_trait]
impl<S, K> LineSource for SurfaceReader<S, K>
where
    S: Screen + 'static,
    K: Stream<Item = io::Result<Event>> + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<String> {
        self.surface.read_input(&mut self.keys).await
    }
}
