//! # uuidy
//!
//! Identify unknown 128-bit identifiers, with an emphasis on Bluetooth Low
//! Energy service UUIDs.
//!
//! This crate is the native application around [`uuidy_core`]: it supplies a
//! SQLite-backed [`Store`](uuidy_core::store::Store), a SerpAPI
//! [`SearchProvider`](uuidy_core::search::SearchProvider), TOML
//! configuration, the HTTP server, and the `uuidy` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────┐
//! │   CLI    │──▶│   Resolver    │──▶│  SQLite   │
//! │  HTTP    │   │ (uuidy-core)  │   │  cache    │
//! └──────────┘   └──────┬────────┘   └──────────┘
//!                       │ miss
//!                       ▼
//!                ┌──────────────┐   ┌────────────┐
//!                │   SerpAPI    │──▶│ Classifier │
//!                └──────────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! uuidy init                                          # create database
//! uuidy classify 6e400001-b5a3-f393-e0a9-e50e24dcca9e # classify one UUID
//! uuidy get 6e400001b5a3f393e0a9e50e24dcca9e          # read it back from the cache
//! uuidy serve                                         # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite storage backend |
//! | [`search`] | SerpAPI and disabled search providers |
//! | [`classify`] | `uuidy classify` |
//! | [`get`] | `uuidy get` |
//! | [`known`] | `uuidy known` |
//! | [`server`] | HTTP API server |

pub mod classify;
pub mod config;
pub mod db;
pub mod get;
pub mod known;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;
