use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key presses the prompt cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    /// Ctrl+C. Raw mode turns the interrupt signal into a plain key press.
    Interrupt,
}

/// Translate a terminal event, dropping everything the prompt ignores.
pub fn translate(event: &Event) -> Option<KeyInput> {
    match event {
        Event::Key(key_event) => translate_key(key_event),
        _ => None,
    }
}

fn translate_key(key_event: &KeyEvent) -> Option<KeyInput> {
    // Terminals with keyboard enhancement report releases too
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::trace!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(KeyInput::Interrupt),
        // AltGr arrives as CONTROL | ALT on Windows, so only bare Ctrl chords are dropped
        (m, KeyCode::Char(_))
            if m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            None
        }
        (_, KeyCode::Char(c)) if !c.is_control() => Some(KeyInput::Char(c)),
        (_, KeyCode::Backspace) => Some(KeyInput::Backspace),
        (_, KeyCode::Enter) => Some(KeyInput::Enter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_plain_and_shifted_chars() {
        assert_eq!(
            translate(&key(KeyCode::Char('h'), KeyModifiers::NONE)),
            Some(KeyInput::Char('h'))
        );
        assert_eq!(
            translate(&key(KeyCode::Char('H'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('H'))
        );
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(
            translate(&key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(KeyInput::Backspace)
        );
        assert_eq!(
            translate(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyInput::Enter)
        );
    }

    #[test]
    fn test_altgr_chars_are_typed() {
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for c in ['@', '{', '\\'] {
            assert_eq!(translate(&key(KeyCode::Char(c), altgr)), Some(KeyInput::Char(c)));
        }
    }

    #[test]
    fn test_alt_chars_are_typed() {
        assert_eq!(
            translate(&key(KeyCode::Char('x'), KeyModifiers::ALT)),
            Some(KeyInput::Char('x'))
        );
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Interrupt)
        );
    }

    #[test]
    fn test_other_chords_are_ignored() {
        assert_eq!(translate(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
        assert_eq!(
            translate(&key(KeyCode::Char('X'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            None
        );
        assert_eq!(translate(&key(KeyCode::Up, KeyModifiers::NONE)), None);
        assert_eq!(translate(&key(KeyCode::Char('\t'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_releases_and_non_key_events_are_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind_and_state(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        ));
        assert_eq!(translate(&release), None);
        assert_eq!(translate(&Event::Resize(80, 24)), None);
        assert_eq!(translate(&Event::FocusGained), None);
    }
}
