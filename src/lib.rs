//! # Hoops
//!
//! A basketball scoreboard service: game clock, quarters, scores and fouls
//! behind a small HTTP API. Usable both as a standalone binary and as a
//! library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! hoops = { version = "0.0", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hoops::config::GameRules;
//! use hoops::server::{AppState, create_router};
//! use hoops::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/hoops.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), GameRules::default()));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `hoops` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod server;
pub mod store;
pub mod types;
