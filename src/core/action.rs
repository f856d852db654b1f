//! # Actions
//!
//! The console's lifecycle is a tiny state machine:
//!
//! ```text
//! Initializing ──Initialized──▶ Running ──ShutdownRequested──▶ ShuttingDown
//!                                  │                               │
//!                                  └──────────LoopsFinished────────┴──▶ Stopped
//! ```
//!
//! `update()` takes the current phase and an action, moves the phase and
//! returns the `Effect` the caller should carry out. No I/O happens here.

/// Where the console is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Initializing,
    Running,
    ShuttingDown,
    Stopped,
}

/// Everything that moves the lifecycle forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The display surface is drawn and ready.
    Initialized,
    /// Interrupt, close signal, Ctrl+C or end of input.
    ShutdownRequested,
    /// Both loops have returned.
    LoopsFinished,
}

/// What the caller should do after an `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    StopLoops,
    Exit,
}

pub fn update(phase: &mut Phase, action: Action) -> Effect {
    let (next, effect) = match (*phase, action) {
        (Phase::Initializing, Action::Initialized) => (Phase::Running, Effect::None),
        (Phase::Running, Action::ShutdownRequested) => (Phase::ShuttingDown, Effect::StopLoops),
        // A loop can die on an I/O error without anybody asking it to.
        (Phase::Running | Phase::ShuttingDown, Action::LoopsFinished) => {
            (Phase::Stopped, Effect::Exit)
        }
        (current, _) => (current, Effect::None),
    };

    if next != *phase {
        log::info!("Lifecycle: {:?} -> {:?} ({:?})", phase, next, action);
    }
    *phase = next;
    effect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut phase = Phase::default();
        assert_eq!(update(&mut phase, Action::Initialized), Effect::None);
        assert_eq!(phase, Phase::Running);
        assert_eq!(update(&mut phase, Action::ShutdownRequested), Effect::StopLoops);
        assert_eq!(phase, Phase::ShuttingDown);
        assert_eq!(update(&mut phase, Action::LoopsFinished), Effect::Exit);
        assert_eq!(phase, Phase::Stopped);
    }

    #[test]
    fn test_repeated_shutdown_is_noop() {
        let mut phase = Phase::Running;
        update(&mut phase, Action::ShutdownRequested);
        assert_eq!(update(&mut phase, Action::ShutdownRequested), Effect::None);
        assert_eq!(phase, Phase::ShuttingDown);
    }

    #[test]
    fn test_loops_dying_early_still_stops() {
        let mut phase = Phase::Running;
        assert_eq!(update(&mut phase, Action::LoopsFinished), Effect::Exit);
        assert_eq!(phase, Phase::Stopped);
    }

    #[test]
    fn test_shutdown_before_initialized_is_ignored() {
        let mut phase = Phase::Initializing;
        assert_eq!(update(&mut phase, Action::ShutdownRequested), Effect::None);
        assert_eq!(phase, Phase::Initializing);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut phase = Phase::Stopped;
        for action in [Action::Initialized, Action::ShutdownRequested, Action::LoopsFinished] {
            assert_eq!(update(&mut phase, action), Effect::None);
            assert_eq!(phase, Phase::Stopped);
        }
    }
}
