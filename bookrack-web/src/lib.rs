//! # Bookrack Web Server Library
//!
//! This library provides the Bookrack web application: server-rendered
//! pages for registration, login, catalog search, and book reviews, plus a
//! small JSON API for aggregate rating data.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `lookup`: Best-effort external review-count lookup
//! - `routes`: Route handlers
//! - `session`: Session gate and current-user context
//! - `views`: Minimal HTML page rendering

pub mod app;
pub mod config;
pub mod error;
pub mod lookup;
pub mod routes;
pub mod session;
pub mod views;
