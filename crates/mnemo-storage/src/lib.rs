// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Mnemo memory engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the two external stores the
//! engine consumes: the per-thread Exchange Log and the Memory Store with
//! cosine-similarity search.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod search;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use search::cosine_similarity;
