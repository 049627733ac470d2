//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Key lists per action, as written in `[keybindings]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_pane: Vec<String>,
    pub prev_pane: Vec<String>,
    pub select: Vec<String>,
    pub back: Vec<String>,
    pub search: Vec<String>,
    pub next_category: Vec<String>,
    pub prev_category: Vec<String>,
    pub cycle_sort: Vec<String>,
    pub cycle_country: Vec<String>,
    pub load_more: Vec<String>,
    pub toggle_bookmark: Vec<String>,
    pub toggle_sidebar: Vec<String>,
    pub remove_bookmark: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub share: Vec<String>,
    pub toggle_theme: Vec<String>,
    pub reset_filters: Vec<String>,
    pub retry: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            next_page: keys(&["PageDown"]),
            prev_page: keys(&["PageUp"]),
            next_pane: keys(&["Tab"]),
            prev_pane: keys(&["BackTab", "Shift+Tab"]),
            select: keys(&["Enter"]),
            back: keys(&["Esc"]),
            search: keys(&["/"]),
            next_category: keys(&["c"]),
            prev_category: keys(&["C"]),
            cycle_sort: keys(&["s"]),
            cycle_country: keys(&["g"]),
            load_more: keys(&["n"]),
            toggle_bookmark: keys(&["b"]),
            toggle_sidebar: keys(&["B"]),
            remove_bookmark: keys(&["d", "Delete"]),
            open_in_browser: keys(&["o"]),
            share: keys(&["y"]),
            toggle_theme: keys(&["t"]),
            reset_filters: keys(&["x"]),
            retry: keys(&["R"]),
        }
    }
}

impl KeybindingConfig {
    /// Resolve a key event to an action. Earlier entries win on conflicts.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 23] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.next_pane, Action::NextPane),
            (&self.prev_pane, Action::PrevPane),
            (&self.select, Action::Select),
            (&self.back, Action::Back),
            (&self.search, Action::Search),
            (&self.next_category, Action::NextCategory),
            (&self.prev_category, Action::PrevCategory),
            (&self.cycle_sort, Action::CycleSort),
            (&self.cycle_country, Action::CycleCountry),
            (&self.load_more, Action::LoadMore),
            (&self.toggle_bookmark, Action::ToggleBookmark),
            (&self.toggle_sidebar, Action::ToggleSidebar),
            (&self.remove_bookmark, Action::RemoveBookmark),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.share, Action::Share),
            (&self.toggle_theme, Action::ToggleTheme),
            (&self.reset_filters, Action::ResetFilters),
            (&self.retry, Action::Retry),
        ];

        table
            .iter()
            .find(|(bindings, _)| matches_any(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }
}

fn matches_any(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|b| parse_key_string(b).ok())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored for bindings that don't ask for it, since uppercase
    /// characters already carry it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse "j", "Enter", "F5", "Ctrl+c" or "Ctrl+Shift+a" into a [`KeyBinding`].
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    // A lone "+" is a key, not a separator
    let (mods, key_part) = match s.rsplit_once('+') {
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.into_iter().flat_map(|m| m.split('+')) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_char() {
        let binding = parse_key_string("/").unwrap();
        assert_eq!(binding.code, KeyCode::Char('/'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = parse_key_string("+").unwrap();
        assert_eq!(binding.code, KeyCode::Char('+'));
    }

    #[test]
    fn test_parse_special_and_function_keys() {
        assert_eq!(parse_key_string("Esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_string("PageDown").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_string("F12").unwrap().code, KeyCode::F(12));
        assert!(parse_key_string("F13").is_err());
        assert!(parse_key_string("Hyper").is_err());
    }

    #[test]
    fn test_parse_modifiers() {
        let binding = parse_key_string("Ctrl+Shift+a").unwrap();
        assert_eq!(binding.code, KeyCode::Char('a'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert!(parse_key_string("Meta+a").is_err());
    }

    #[test]
    fn test_uppercase_matches_with_shift() {
        let binding = parse_key_string("B").unwrap();
        let key = KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert!(binding.matches(&key));
    }

    #[test]
    fn test_default_actions() {
        let config = KeybindingConfig::default();
        let press = |code, mods| config.get_action(&KeyEvent::new(code, mods));

        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::NONE), Action::Quit);
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::NONE), Action::NextCategory);
        assert_eq!(press(KeyCode::Char('C'), KeyModifiers::SHIFT), Action::PrevCategory);
        assert_eq!(press(KeyCode::Char('/'), KeyModifiers::NONE), Action::Search);
        assert_eq!(press(KeyCode::Char('b'), KeyModifiers::NONE), Action::ToggleBookmark);
        assert_eq!(press(KeyCode::Char('B'), KeyModifiers::SHIFT), Action::ToggleSidebar);
        assert_eq!(press(KeyCode::Delete, KeyModifiers::NONE), Action::RemoveBookmark);
        assert_eq!(press(KeyCode::Char('z'), KeyModifiers::NONE), Action::None);
    }
}
