//! SQLite persistence for the lookup server

mod books;
mod init;

pub use books::SqliteStore;
pub use init::init_database;
