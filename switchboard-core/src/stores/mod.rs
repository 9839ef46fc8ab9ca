mod memory;

pub use memory::{InMemorySessionStore, InMemoryTaskStore};
