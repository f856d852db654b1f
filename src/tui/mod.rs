//! # TUI Adapter
//!
//! The crossterm-specific layer. Puts the terminal in raw mode, owns the
//! display surface and wires it to the core relay loops.
//!
//! This is the only module that knows about crossterm. The core only sees
//! `LineSource` and `LineSink`.
//!
//! ## Redraw Strategy
//!
//! Nothing is redrawn on a timer. The screen changes only when:
//!
//! - a message is displayed: status line and log pane are repainted, the
//!   input row is left alone and the cursor is put back where it was;
//! - a key is typed: one character is echoed, or one cell is erased;
//! - a line is submitted: the input row is blanked and the prompt redrawn.

mod component;
pub mod components;
pub mod event;
pub mod screen;
pub mod signals;
pub mod surface;

use log::{info, warn};
use std::io::{self, stdout};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::event::EventStream;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::core::action::{Action, Effect, Phase, update};
use crate::core::config::ResolvedConfig;
use crate::core::relay::run_loops;
use crate::core::state::ShutdownFlag;
use crate::tui::screen::CrosstermScreen;
use crate::tui::surface::{DisplaySurface, SurfaceReader};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Raw mode: keys arrive one at a time and nothing is echoed for us
        enable_raw_mode()?;
        info!("Terminal raw mode enabled");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn dispatch(phase: &Mutex<Phase>, action: Action) -> Effect {
    let mut phase = phase.lock().unwrap_or_else(PoisonError::into_inner);
    update(&mut phase, action)
}

pub async fn run(config: ResolvedConfig) -> io::Result<()> {
    let phase = Arc::new(Mutex::new(Phase::default()));
    let shutdown = ShutdownFlag::new();

    let _terminal_mode_guard = TerminalModeGuard::new()?;
    let screen = CrosstermScreen::new(stdout())?;

    let on_shutdown = {
        let phase = phase.clone();
        move || {
            if dispatch(&phase, Action::ShutdownRequested) == Effect::StopLoops {
                info!("Stopping input and display loops");
            }
        }
    };
    let surface = Arc::new(DisplaySurface::initialize(
        screen,
        &config.display,
        config.preamble.iter().cloned(),
        shutdown.clone(),
        on_shutdown,
    )?);
    dispatch(&phase, Action::Initialized);

    let listener = {
        let surface = surface.clone();
        signals::spawn_listener(move || surface.trigger_shutdown())
    };

    let reader = SurfaceReader::new(surface.clone(), EventStream::new());
    let outcome = run_loops(reader, surface.clone(), shutdown, config.poll_interval).await;
    listener.abort();

    if dispatch(&phase, Action::LoopsFinished) == Effect::Exit {
        info!("Both loops finished");
    }

    if let Err(failure) = outcome {
        warn!("Loops failed: {}", failure);
        surface.display(&format!("Exception thrown: {failure}"))?;
    }

    surface.close()
}
