use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod archive;
pub mod ball;
pub mod event;
pub mod game;
pub mod snapshot;
pub mod types;

pub use archive::{CompletedMatch, MatchIds};
pub use ball::Ball;
pub use event::MatchEvent;
pub use game::{MatchState, apply_event, points_remaining};
pub use types::{FrameRecord, MatchSetup, PerPlayer, Phase, Player, PlayerInfo, SetupError};

/// Scoreboard handle exposed to the browser UI.
#[wasm_bindgen]
pub struct Scoreboard {
    state: MatchState,
}

#[wasm_bindgen]
impl Scoreboard {
    /// Opens a match from a `MatchSetup` object.
    #[wasm_bindgen(constructor)]
    pub fn new(setup: JsValue) -> Result<Scoreboard, JsError> {
        let setup: MatchSetup = serde_wasm_bindgen::from_value(setup)?;
        let state = MatchState::new(setup)?;
        Ok(Self { state })
    }

    /// Resumes from saved snapshot bytes, starting fresh if they are unusable.
    pub fn restore(bytes: &[u8]) -> Scoreboard {
        Self {
            state: snapshot::restore_or_default(bytes),
        }
    }

    /// Applies a `MatchEvent` object. Returns `false` when it was ignored.
    pub fn apply(&mut self, event: JsValue) -> Result<bool, JsError> {
        let event: MatchEvent = serde_wasm_bindgen::from_value(event)?;
        Ok(self.state.apply(event))
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.state)
    }

    #[wasm_bindgen(js_name = pointsRemaining)]
    pub fn points_remaining(&self) -> u32 {
        self.state.points_remaining()
    }

    pub fn prompt(&self) -> String {
        self.state.prompt()
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, JsError> {
        Ok(snapshot::encode(&self.state)?)
    }

    /// The archive record for a finished match, `null` while play continues.
    #[wasm_bindgen(js_name = completedMatch)]
    pub fn completed_match(
        &self,
        match_id: String,
        player1_id: String,
        player2_id: String,
    ) -> Result<JsValue, JsError> {
        let ids = MatchIds {
            match_id,
            player1_id,
            player2_id,
        };
        match CompletedMatch::from_state(&self.state, ids) {
            Some(record) => to_js(&record),
            None => Ok(JsValue::NULL),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}
