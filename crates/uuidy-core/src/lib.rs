//! # uuidy core
//!
//! Runtime-agnostic logic for identifying unknown 128-bit identifiers,
//! with an emphasis on Bluetooth Low Energy service UUIDs.
//!
//! This crate contains no tokio runtime, sqlx, or HTTP client. Storage and
//! web search are reached through the [`store::Store`] and
//! [`search::SearchProvider`] traits, which the `uuidy` application crate
//! implements with SQLite and SerpAPI.
//!
//! ## Pipeline
//!
//! ```text
//! raw id ──▶ normalize ──▶ cache.get ──hit──▶ record (cached = true)
//!                              │
//!                             miss
//!                              ▼
//!                        search.query ──▶ Classifier ──▶ cache.save ──▶ record (cached = false)
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`identifier`] | Format validation and canonical rendering |
//! | [`knowledge`] | Known GATT services, indicator keywords, trusted domains |
//! | [`classify`] | Heuristic classification engine |
//! | [`models`] | Search results, sources, drafts, and persisted records |
//! | [`store`] | Storage trait and in-memory backend |
//! | [`cache`] | Cache gateway with normalization-tolerant lookups |
//! | [`search`] | Search provider trait |
//! | [`resolve`] | Cache → search → classify → save orchestration |

pub mod cache;
pub mod classify;
pub mod error;
pub mod identifier;
pub mod knowledge;
pub mod models;
pub mod resolve;
pub mod search;
pub mod store;

pub use error::{Error, Result};
pub use identifier::{normalize, FormatError};
