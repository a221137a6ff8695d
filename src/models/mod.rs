pub mod palette;
pub mod shortcut;
