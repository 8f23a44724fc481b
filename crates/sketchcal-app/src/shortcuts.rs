//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut handled by the input router.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self { key, description }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("ArrowRight", "Next page (creates one after the last)"),
            Shortcut::new("PageDown", "Next page (creates one after the last)"),
            Shortcut::new("ArrowLeft", "Previous page"),
            Shortcut::new("PageUp", "Previous page"),
            Shortcut::new("Escape", "Clear selection"),
            Shortcut::new("Delete", "Delete selected card instance"),
            Shortcut::new("Backspace", "Delete selected card instance"),
        ]
    }

    /// Format all shortcuts as help text.
    pub fn help() -> String {
        let mut help = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::all() {
            help.push_str(&format!("  {:12} {}\n", shortcut.key, shortcut.description));
        }
        help
    }
}
