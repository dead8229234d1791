use crate::registry::CategoryId;

/// Where the menu currently is. Back from any category returns to `Root`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Root,
    Category(CategoryId),
}

impl MenuState {
    pub fn is_root(&self) -> bool {
        matches!(self, MenuState::Root)
    }

    pub fn category(&self) -> Option<&CategoryId> {
        match self {
            MenuState::Root => None,
            MenuState::Category(id) => Some(id),
        }
    }
}

/// What a confirm press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Hidden menu or keyboard already open.
    Ignored,
    Entered(CategoryId),
    Queued,
    KeyboardOpened,
}

/// What a keyboard answer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardOutcome {
    Queued,
    /// Cancelled or blank text; nothing queued.
    Discarded,
}
