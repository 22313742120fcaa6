//! Shared application state for the game API server.

use std::path::PathBuf;
use std::sync::Arc;

use advent_engine::GameSession;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// session sits behind a read-write lock: status reads take the read
/// half, turn commits take the write half, which serializes turns --
/// the explicit mutual exclusion the single-writer model requires once
/// real threads are in play.
pub struct AppState {
    /// The one game session this process serves.
    pub session: RwLock<GameSession>,
    /// Identifier for this server run.
    pub session_id: Uuid,
    /// When this server run started.
    pub started_at: DateTime<Utc>,
    /// Where `/api/save` and `/api/load` read and write the save file.
    pub save_path: PathBuf,
}

impl AppState {
    /// Wrap a session for serving.
    pub fn new(session: GameSession, save_path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            session: RwLock::new(session),
            session_id: Uuid::now_v7(),
            started_at: Utc::now(),
            save_path,
        })
    }
}
