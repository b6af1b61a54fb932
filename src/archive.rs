use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::game::MatchState;
use crate::types::{FrameRecord, PerPlayer, Player};

/// Identifiers the player registry assigns; the scorer never invents them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchIds {
    pub match_id: String,
    pub player1_id: String,
    pub player2_id: String,
}

/// Durable summary of a finished match, written to history and statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub id: String,
    pub player1_id: String,
    pub player2_id: String,
    pub player1_name: String,
    pub player2_name: String,
    pub player1_image_url: Option<String>,
    pub player2_image_url: Option<String>,
    pub frames_won: PerPlayer<u32>,
    pub best_of_frames: u32,
    /// Milliseconds since the Unix epoch.
    pub recorded_at_ms: u64,
    pub frame_history: Vec<FrameRecord>,
    pub match_winner: Player,
}

impl CompletedMatch {
    /// Returns `None` until the match has a winner.
    pub fn from_state(state: &MatchState, ids: MatchIds) -> Option<Self> {
        Self::from_state_at(state, ids, now_ms())
    }

    pub fn from_state_at(state: &MatchState, ids: MatchIds, recorded_at_ms: u64) -> Option<Self> {
        let match_winner = state.match_winner?;
        let MatchIds {
            match_id,
            player1_id,
            player2_id,
        } = ids;

        Some(Self {
            id: match_id,
            player1_id,
            player2_id,
            player1_name: state.players.player1.name.clone(),
            player2_name: state.players.player2.name.clone(),
            player1_image_url: state.players.player1.image_url.clone(),
            player2_image_url: state.players.player2.image_url.clone(),
            frames_won: state.frames_won,
            best_of_frames: state.best_of_frames,
            recorded_at_ms,
            frame_history: state.frame_history.clone(),
            match_winner,
        })
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
