pub mod icon;
pub mod icon_search;
pub mod shortcut;
pub mod signing;

pub use icon::IconResolver;
pub use icon_search::NounProjectClient;
pub use shortcut::ShortcutService;
