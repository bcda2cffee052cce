//! HTTP API handlers for shelf-sv

pub mod books;
pub mod health;
pub mod lookup;

pub use books::{contribute_book, delete_book, get_book, list_books, update_book};
pub use health::health_routes;
pub use lookup::lookup_book;
