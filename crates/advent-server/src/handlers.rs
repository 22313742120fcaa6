//! REST endpoint handlers for the game API.

use std::sync::Arc;

use advent_engine::TurnError;
use advent_types::{GameSave, GameState, MAX_DAYS, PlayerRole, TurnResult};
use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::ServerError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of `POST /api/command`.
#[derive(Debug, Deserialize, Validate)]
pub struct CommandRequest {
    /// The player's free-text action.
    #[validate(length(min = 1, max = 500, message = "command must be 1..=500 characters"))]
    pub command: String,
}

/// Body of `POST /api/new-game`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewGameRequest {
    /// The player's name.
    #[validate(length(min = 1, max = 50, message = "player name must be 1..=50 characters"))]
    pub player_name: String,
    /// The chosen role.
    pub role: PlayerRole,
}

/// Response of `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Current in-game day.
    pub day: u32,
    /// The final day of the countdown.
    pub max_days: u32,
    /// True once the final day has been reached.
    pub game_over: bool,
    /// Identifier of this server run.
    pub session_id: String,
    /// The full game state.
    pub state: GameState,
}

/// Response of `POST /api/save`.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// The day that was saved.
    pub day: u32,
    /// Where the save was written.
    pub path: String,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the countdown and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let game = session.state();
    let day = game.current_day;
    let remaining = MAX_DAYS.saturating_sub(day);
    let role = game.player_role.local_name();
    let reputation = game.stats.reputation;
    let wealth = game.stats.wealth;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="utf-8">
    <title>Advent</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 720px;
            margin: 0 auto;
        }}
        h1 {{ color: #f85149; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 110px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #f85149; font-size: 1.5rem; font-weight: bold; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; color: #58a6ff; }}
    </style>
</head>
<body>
    <h1>30日後の魔王襲来</h1>
    <p class="subtitle">Advent game server</p>
    <div>
        <div class="metric"><div class="label">Day</div><div class="value">{day}/{max}</div></div>
        <div class="metric"><div class="label">残り</div><div class="value">{remaining}日</div></div>
        <div class="metric"><div class="label">役割</div><div class="value">{role}</div></div>
        <div class="metric"><div class="label">評判</div><div class="value">{reputation}</div></div>
        <div class="metric"><div class="label">所持金</div><div class="value">{wealth}G</div></div>
    </div>
    <ul>
        <li>GET /api/status</li>
        <li>POST /api/command</li>
        <li>POST /api/new-game</li>
        <li>POST /api/save · POST /api/load</li>
    </ul>
</body>
</html>"#,
        max = MAX_DAYS,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Report the day counter and the full game state.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    Json(StatusResponse {
        day: session.state().current_day,
        max_days: MAX_DAYS,
        game_over: session.game_over(),
        session_id: state.session_id.to_string(),
        state: session.state().clone(),
    })
}

// ---------------------------------------------------------------------------
// POST /api/command
// ---------------------------------------------------------------------------

/// Process one player action into a full turn result.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<TurnResult>, ServerError> {
    request
        .validate()
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    let mut session = state.session.write().await;
    let result = session
        .process_action(&request.command)
        .await
        .map_err(|e| match e {
            TurnError::EmptyAction => ServerError::Validation(e.to_string()),
            TurnError::GameOver => ServerError::Conflict(e.to_string()),
        })?;
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// POST /api/new-game
// ---------------------------------------------------------------------------

/// Start a fresh game with the given name and role.
pub async fn post_new_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewGameRequest>,
) -> Result<Json<StatusResponse>, ServerError> {
    request
        .validate()
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    let mut session = state.session.write().await;
    session
        .reset(&request.player_name, request.role)
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    info!(player = request.player_name, role = ?request.role, "new game started");
    Ok(Json(StatusResponse {
        day: session.state().current_day,
        max_days: MAX_DAYS,
        game_over: session.game_over(),
        session_id: state.session_id.to_string(),
        state: session.state().clone(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/save and /api/load
// ---------------------------------------------------------------------------

/// Persist the session to the configured save file.
pub async fn post_save(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SaveResponse>, ServerError> {
    let session = state.session.read().await;
    let save = GameSave {
        day: session.state().current_day,
        state: session.state().clone(),
        saved_at: Utc::now(),
    };
    crate::persistence::save(&state.save_path, &save)?;

    info!(day = save.day, path = %state.save_path.display(), "game saved");
    Ok(Json(SaveResponse {
        day: save.day,
        path: state.save_path.display().to_string(),
    }))
}

/// Restore the session from the configured save file.
pub async fn post_load(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ServerError> {
    let save = crate::persistence::load(&state.save_path)?;
    let mut session = state.session.write().await;
    session.restore(save);

    info!(day = session.state().current_day, "game loaded");
    Ok(Json(StatusResponse {
        day: session.state().current_day,
        max_days: MAX_DAYS,
        game_over: session.game_over(),
        session_id: state.session_id.to_string(),
        state: session.state().clone(),
    }))
}
