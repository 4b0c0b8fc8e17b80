//! Database access.
//!
//! # Design Decisions
//! - Pools connect lazily; nothing touches the network until first use
//! - Every transaction runs at SERIALIZABLE isolation

pub mod postgres;

pub use postgres::{DbError, PostgresDatabaseClient};
