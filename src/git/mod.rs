pub mod refstore;
pub mod resolver;

// Re-exports
pub use refstore::*;
pub use resolver::*;
