pub mod jump_list;
pub mod project;
pub mod terminal;

// Re-exports
pub use jump_list::*;
pub use project::*;
pub use terminal::*;
