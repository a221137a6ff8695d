pub mod object;
pub mod shortcut;

pub use object::ObjectStore;
pub use shortcut::ShortcutRepository;
