//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, repository functions for
//! the `folders` and `flows` tables, and the keyset pagination helper used to
//! page through folders.  No business logic lives here.

pub mod error;
pub mod pagination;
pub mod pool;
pub mod repository;
pub mod models;

pub use pool::DbPool;
pub use error::DbError;
pub use pagination::{PaginationError, SeekPage};
