pub use crate::navigator::DEFAULT_NAV_DEADZONE;

pub const DEFAULT_NAV_COOLDOWN_MS: u64 = 200;
pub const MAX_NAV_COOLDOWN_MS: u64 = 2_000;
pub(super) const CATEGORY_TABLE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
/// Script path meaning "read frames from stdin".
pub const STDIN_SCRIPT: &str = "-";
