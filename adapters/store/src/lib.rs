#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! HTTP level store that persists level documents for the Board Maker editor.
//!
//! The store exposes three routes under a configurable prefix:
//!
//! - `POST {prefix}/levels` saves a level document
//! - `GET {prefix}/levels` lists `{level_id, name}` summaries, newest first
//! - `GET {prefix}/levels/{id}` returns a full level document

pub mod repository;
pub mod routes;
pub mod server;

pub use repository::{JsonFileRepository, LevelRepository, MemoryRepository, RepositoryError};
pub use routes::{route, ApiResponse};
pub use server::{ServerError, StoreServer};
