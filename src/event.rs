use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::types::Player;

/// Everything the referee can declare at the table.
///
/// Dialog handling and long-press disambiguation live in the UI; the
/// machine only receives the resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    Pot { ball: Ball },
    /// Several reds in one stroke.
    PotReds { count: u8 },
    /// Miss or safety: the visit ends without penalty.
    EndTurn,
    Foul { points: u32 },
    /// Foul committed by potting `ball`; worth its value, minimum four.
    FoulOnPot { ball: Ball },
    StartFreeBall,
    ConcedeFrame,
    /// `breaker` overrides the usual alternation.
    StartNextFrame {
        #[serde(default)]
        breaker: Option<Player>,
    },
    RestartMatch,
}
