pub mod memory;
pub mod repo;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repo::*;
pub use sqlite::SqliteStore;
