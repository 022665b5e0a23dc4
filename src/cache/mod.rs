// Cache module for session state.
// Provides the session key-value store and on-disk locations.

pub mod paths;
pub mod store;

pub use store::{FileStore, MemoryStore, SessionStore};
