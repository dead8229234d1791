//! Menu state machine: `Root` lists categories, each category lists options.
//!
//! Navigation, confirm and back are suspended while the menu is hidden or the
//! keyboard is open; cursor positions survive hiding but not leaving a
//! category.

mod machine;
mod state;
mod view;

pub use machine::MenuStateMachine;
pub use state::{ConfirmOutcome, KeyboardOutcome, MenuState};
pub use view::{MenuEntry, MenuView};
