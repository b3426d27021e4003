pub mod connection;
pub mod contact_repository;

pub use connection::{connect_pool, init_contacts_db};
pub use contact_repository::SqliteRecordStore;
