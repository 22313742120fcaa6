//! HTTP game server for Advent.
//!
//! A thin Axum surface over one [`advent_engine::GameSession`]:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/status` | Day counter and full game state |
//! | `POST` | `/api/command` | Process one player action |
//! | `POST` | `/api/new-game` | Start over with a name and role |
//! | `POST` | `/api/save` | Persist the session to disk |
//! | `POST` | `/api/load` | Restore the session from disk |
//!
//! The session lives behind a write lock, which serializes turn
//! commits: with a multithreaded runtime this is the explicit mutual
//! exclusion the single-writer state model requires.

pub mod error;
pub mod handlers;
pub mod persistence;
pub mod router;
pub mod server;
pub mod settings;
pub mod state;
