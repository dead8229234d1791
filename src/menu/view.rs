use crate::selector::ProcessingMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: String,
    pub description: String,
}

/// Render-ready snapshot of the menu. Rendering itself belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub title: String,
    pub entries: Vec<MenuEntry>,
    pub highlighted: usize,
    pub visible: bool,
    pub keyboard_open: bool,
    pub freeform_override: Option<ProcessingMode>,
}

impl MenuView {
    pub fn highlighted_entry(&self) -> Option<&MenuEntry> {
        self.entries.get(self.highlighted)
    }
}
