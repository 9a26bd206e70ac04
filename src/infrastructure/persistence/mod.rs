//! Repository implementations.
//!
//! PostgreSQL repositories use SQLx with runtime-checked queries, so the crate
//! builds without a live database. The in-memory store implements both traits
//! over a single mutex and is used for local runs and HTTP tests.
//!
//! # Repositories
//!
//! - [`PgShortUrlRepository`] - Short URL records
//! - [`PgClickRepository`] - Click log and windowed counting
//! - [`InMemoryStore`] - Process-local implementation of both

mod db_error;
pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_short_url_repository;

pub use memory_store::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
