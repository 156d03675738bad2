use crossterm::event::KeyEvent;

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    HalfPageDown,
    HalfPageUp,
    JumpToTop,
    // Pointer simulation
    NextTarget,
    PrevTarget,
    Activate,
    ClickOutside,
    Escape,
    // Platform simulation
    ToggleReducedMotion,
    Widen,
    Narrow,
    ToggleHelp,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::from_event(&key);

    if app.mode == Mode::Help {
        // Quit still works; any other key closes the overlay
        return match keymap.get(&binding) {
            Some(Action::Quit) => Action::Quit,
            _ => Action::ExitMode,
        };
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pagechrome_core::{AppConfig, PageLayout};

    fn app() -> App {
        App::new(PageLayout::default(), AppConfig::default())
    }

    #[test]
    fn test_normal_mode_uses_keymap() {
        let app = app();
        let keymap = Keymap::default();

        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(handle_key_event(tab, &app, &keymap), Action::NextTarget);

        let unknown = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(unknown, &app, &keymap), Action::None);
    }

    #[test]
    fn test_help_mode_swallows_keys() {
        let mut app = app();
        app.mode = Mode::Help;
        let keymap = Keymap::default();

        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(j, &app, &keymap), Action::ExitMode);

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(q, &app, &keymap), Action::Quit);
    }
}
