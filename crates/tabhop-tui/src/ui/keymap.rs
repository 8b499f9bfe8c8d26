//! Declarative keymap for the popup.
//!
//! Every shortcut lives in [`KEY_BINDINGS`]; commit modifiers live in
//! [`COMMIT_BINDINGS`]. Help text is generated from the same tables, so what
//! the overlay shows is what the resolver does.
//!
//! # Layers
//!
//! - `Standard`: always active
//! - `Vi`: checked first while the vi keyboard mode is selected, then the
//!   standard layer applies as a fallback

use crossterm::event::{KeyCode, KeyModifiers};
use tabhop_core::dispatcher::OpenTarget;
use tabhop_core::models::KeyboardMode;
use tabhop_core::navigator::Movement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Move(Movement),
    /// Commit the active row; the open target comes from the modifiers
    Commit,
    ToggleCloseMark,
    CloseActiveTab,
    ClosePopup,
    Help,
    ToggleKeyboardMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeymapLayer {
    Standard,
    Vi,
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub layer: KeymapLayer,
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    /// When false the binding fires whatever modifiers are held
    pub exact_modifiers: bool,
    pub action: KeyAction,
    pub label: &'static str,
    pub section: &'static str,
}

impl KeyBinding {
    pub const fn new(
        layer: KeymapLayer,
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        label: &'static str,
        section: &'static str,
    ) -> Self {
        Self {
            layer,
            key,
            modifiers,
            exact_modifiers: true,
            action,
            label,
            section,
        }
    }

    /// Standard-layer binding without modifiers
    pub const fn plain(key: KeyCode, action: KeyAction, label: &'static str, section: &'static str) -> Self {
        Self::new(KeymapLayer::Standard, key, KeyModifiers::NONE, action, label, section)
    }

    pub const fn ctrl(key: KeyCode, action: KeyAction, label: &'static str, section: &'static str) -> Self {
        Self::new(KeymapLayer::Standard, key, KeyModifiers::CONTROL, action, label, section)
    }

    pub const fn alt(key: KeyCode, action: KeyAction, label: &'static str, section: &'static str) -> Self {
        Self::new(KeymapLayer::Standard, key, KeyModifiers::ALT, action, label, section)
    }

    pub const fn shift(key: KeyCode, action: KeyAction, label: &'static str, section: &'static str) -> Self {
        Self::new(KeymapLayer::Standard, key, KeyModifiers::SHIFT, action, label, section)
    }

    pub const fn vi(mut self) -> Self {
        self.layer = KeymapLayer::Vi;
        self
    }

    pub const fn any_modifiers(mut self) -> Self {
        self.exact_modifiers = false;
        self
    }

    pub fn matches(&self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.key == key && (!self.exact_modifiers || self.modifiers == modifiers)
    }

    pub fn key_display(&self) -> String {
        if matches!(self.key, KeyCode::BackTab) {
            return "Shift+Tab".to_string();
        }

        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }

        let key = match self.key {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => "?".to_string(),
        };
        parts.push(key);
        parts.join("+")
    }
}

const fn ch(c: char) -> KeyCode {
    KeyCode::Char(c)
}

pub static KEY_BINDINGS: &[KeyBinding] = &[
    // === Navigation ===
    KeyBinding::plain(KeyCode::Down, KeyAction::Move(Movement::Next), "Next row", "Navigation"),
    KeyBinding::plain(KeyCode::Tab, KeyAction::Move(Movement::Next), "Next row", "Navigation"),
    KeyBinding::plain(KeyCode::Up, KeyAction::Move(Movement::Previous), "Previous row", "Navigation"),
    KeyBinding::shift(KeyCode::BackTab, KeyAction::Move(Movement::Previous), "Previous row", "Navigation"),
    KeyBinding::plain(KeyCode::PageUp, KeyAction::Move(Movement::PageUp), "Page up", "Navigation"),
    KeyBinding::plain(KeyCode::PageDown, KeyAction::Move(Movement::PageDown), "Page down", "Navigation"),
    KeyBinding::plain(KeyCode::Home, KeyAction::Move(Movement::Home), "First row", "Navigation"),
    KeyBinding::plain(KeyCode::End, KeyAction::Move(Movement::End), "Last row", "Navigation"),
    // === Actions ===
    KeyBinding::plain(KeyCode::Enter, KeyAction::Commit, "Open row", "Actions").any_modifiers(),
    KeyBinding::ctrl(ch('w'), KeyAction::CloseActiveTab, "Close tab now", "Actions"),
    KeyBinding::ctrl(ch('c'), KeyAction::ToggleCloseMark, "Mark tab for closing", "Actions"),
    KeyBinding::alt(ch('c'), KeyAction::ToggleCloseMark, "Mark tab for closing", "Actions"),
    // === Popup ===
    KeyBinding::plain(KeyCode::Esc, KeyAction::ClosePopup, "Close popup", "Popup"),
    KeyBinding::plain(KeyCode::F(1), KeyAction::Help, "Show keys", "Popup"),
    KeyBinding::plain(KeyCode::F(2), KeyAction::ToggleKeyboardMode, "Switch keyboard mode", "Popup"),
    // === Vi overlay ===
    KeyBinding::ctrl(ch('j'), KeyAction::Move(Movement::Next), "Next row", "Navigation").vi(),
    KeyBinding::ctrl(ch('k'), KeyAction::Move(Movement::Previous), "Previous row", "Navigation").vi(),
    KeyBinding::ctrl(ch('d'), KeyAction::Move(Movement::PageDown), "Page down", "Navigation").vi(),
    KeyBinding::ctrl(ch('u'), KeyAction::Move(Movement::PageUp), "Page up", "Navigation").vi(),
    KeyBinding::ctrl(ch('g'), KeyAction::Move(Movement::Home), "First row", "Navigation").vi(),
    KeyBinding::shift(ch('G'), KeyAction::Move(Movement::End), "Last row", "Navigation").vi(),
];

/// Modifier combination that turns a commit into a specific open target
#[derive(Debug, Clone, Copy)]
pub struct CommitBinding {
    pub mode: KeyboardMode,
    pub modifiers: KeyModifiers,
    pub target: OpenTarget,
    pub label: &'static str,
}

const CTRL_SHIFT: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::SHIFT);
const ALT_SHIFT: KeyModifiers = KeyModifiers::ALT.union(KeyModifiers::SHIFT);

pub static COMMIT_BINDINGS: &[CommitBinding] = &[
    CommitBinding {
        mode: KeyboardMode::Standard,
        modifiers: KeyModifiers::CONTROL,
        target: OpenTarget::NewTab { background: true },
        label: "Open in background tab",
    },
    CommitBinding {
        mode: KeyboardMode::Standard,
        modifiers: KeyModifiers::ALT,
        target: OpenTarget::NewTab { background: false },
        label: "Open in new tab",
    },
    CommitBinding {
        mode: KeyboardMode::Standard,
        modifiers: KeyModifiers::SHIFT,
        target: OpenTarget::NewWindow,
        label: "Open in new window",
    },
    CommitBinding {
        mode: KeyboardMode::Standard,
        modifiers: CTRL_SHIFT,
        target: OpenTarget::ForceCurrentTab,
        label: "Open in this tab",
    },
    CommitBinding {
        mode: KeyboardMode::Vi,
        modifiers: KeyModifiers::ALT,
        target: OpenTarget::NewTab { background: true },
        label: "Open in background tab",
    },
    CommitBinding {
        mode: KeyboardMode::Vi,
        modifiers: KeyModifiers::CONTROL,
        target: OpenTarget::NewTab { background: false },
        label: "Open in new tab",
    },
    CommitBinding {
        mode: KeyboardMode::Vi,
        modifiers: KeyModifiers::SHIFT,
        target: OpenTarget::NewWindow,
        label: "Open in new window",
    },
    CommitBinding {
        mode: KeyboardMode::Vi,
        modifiers: ALT_SHIFT,
        target: OpenTarget::ForceCurrentTab,
        label: "Open in this tab",
    },
];

/// Fold the different ways terminals report shifted keys into one.
///
/// Legacy terminals send `G` with or without SHIFT, while the kitty
/// protocol can send `g` plus SHIFT. Both come out as `G` plus SHIFT.
pub fn normalize(key: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match key {
        KeyCode::BackTab => (key, modifiers | KeyModifiers::SHIFT),
        KeyCode::Char(c) if c.is_uppercase() => (key, modifiers | KeyModifiers::SHIFT),
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) && c.is_lowercase() => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => (KeyCode::Char(u), modifiers),
                _ => (key, modifiers),
            }
        }
        _ => (key, modifiers),
    }
}

fn layers(mode: KeyboardMode) -> &'static [KeymapLayer] {
    match mode {
        KeyboardMode::Standard => &[KeymapLayer::Standard],
        KeyboardMode::Vi => &[KeymapLayer::Vi, KeymapLayer::Standard],
    }
}

/// Find the action bound to a key event in `mode`
pub fn resolve(mode: KeyboardMode, key: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    let (key, modifiers) = normalize(key, modifiers);
    layers(mode).iter().find_map(|layer| {
        KEY_BINDINGS
            .iter()
            .filter(|b| b.layer == *layer)
            .find(|b| b.matches(key, modifiers))
            .map(|b| b.action)
    })
}

/// Open target for a commit made with `modifiers` held. Unmapped
/// combinations fall back to the default target.
pub fn commit_target(mode: KeyboardMode, modifiers: KeyModifiers) -> OpenTarget {
    let modifiers = modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
    COMMIT_BINDINGS
        .iter()
        .find(|b| b.mode == mode && b.modifiers == modifiers)
        .map(|b| b.target)
        .unwrap_or(OpenTarget::Default)
}

/// Bindings in effect for `mode`, vi overlay first
pub fn bindings_for_mode(mode: KeyboardMode) -> Vec<&'static KeyBinding> {
    layers(mode)
        .iter()
        .flat_map(|layer| KEY_BINDINGS.iter().filter(move |b| b.layer == *layer))
        .collect()
}

/// Order of the help overlay's sections
const HELP_SECTIONS: &[&str] = &["Navigation", "Actions", "Popup"];

/// `(keys, label)` pairs for the help overlay, grouped under a heading line
/// per section. Heading lines have an empty label.
pub fn generate_help(mode: KeyboardMode) -> Vec<(String, String)> {
    let commits = COMMIT_BINDINGS.iter().filter(|b| b.mode == mode).map(|binding| {
        let enter = KeyBinding::new(
            KeymapLayer::Standard,
            KeyCode::Enter,
            binding.modifiers,
            KeyAction::Commit,
            binding.label,
            "Actions",
        );
        let mut keys = enter.key_display();
        keys.push_str(" / click");
        (enter.section, keys, binding.label.to_string())
    });
    let entries: Vec<(&str, String, String)> = bindings_for_mode(mode)
        .iter()
        .map(|b| (b.section, b.key_display(), b.label.to_string()))
        .chain(commits)
        .collect();

    let mut help = Vec::with_capacity(entries.len() + HELP_SECTIONS.len());
    for section in HELP_SECTIONS {
        let mut rows = entries.iter().filter(|(s, _, _)| s == section).peekable();
        if rows.peek().is_none() {
            continue;
        }
        help.push((section.to_string(), String::new()));
        help.extend(rows.map(|(_, keys, label)| (keys.clone(), label.clone())));
    }
    help
}

/// Pairs of bindings in the same layer that react to the same key
pub fn find_conflicts() -> Vec<(KeyAction, KeyAction)> {
    let mut conflicts = Vec::new();
    for (i, a) in KEY_BINDINGS.iter().enumerate() {
        for b in KEY_BINDINGS.iter().skip(i + 1) {
            if a.layer == b.layer && a.key == b.key && a.modifiers == b.modifiers {
                conflicts.push((a.action, b.action));
            }
        }
    }
    conflicts
}
