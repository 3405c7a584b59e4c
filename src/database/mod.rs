pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::ValidationError;
pub use postgres::PgDocumentStore;
pub use repository::{Document, Repository};
pub use store::{Collection, DocumentFilter, DocumentStore};
