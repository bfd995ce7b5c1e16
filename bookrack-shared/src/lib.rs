//! # Bookrack Shared Library
//!
//! This crate contains the data layer and authentication primitives shared
//! by the Bookrack web server and any future tooling (catalog loaders,
//! admin utilities).
//!
//! ## Module Organization
//!
//! - `models`: Database models and their query operations
//! - `auth`: Password hashing
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Bookrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
