pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use repository::{CityInfoRepository, PendingPoint};
pub use sqlite::SqliteStore;
pub use store::{Change, EntityStore};
