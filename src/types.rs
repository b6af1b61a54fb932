use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Player1,
    Player2,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }
}

/// A value held for each seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub player1: T,
    pub player2: T,
}

impl<T> PerPlayer<T> {
    pub const fn new(player1: T, player2: T) -> Self {
        Self { player1, player2 }
    }
}

impl<T> Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        match player {
            Player::Player1 => &self.player1,
            Player::Player2 => &self.player2,
        }
    }
}

impl<T> IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::Player1 => &mut self.player1,
            Player::Player2 => &mut self.player2,
        }
    }
}

/// Where the current frame or match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    RedsAvailable,
    ColorsSequence,
    FrameOver,
    MatchOver,
}

impl Phase {
    pub const fn is_live(self) -> bool {
        matches!(self, Phase::RedsAvailable | Phase::ColorsSequence)
    }
}

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_number: u32,
    pub scores: PerPlayer<u32>,
    pub highest_breaks: PerPlayer<u32>,
    /// `None` for a frame that ended level.
    pub winner: Option<Player>,
}

/// Display snapshot of a player taken at match setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PlayerInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
        }
    }
}

pub const DEFAULT_BEST_OF_FRAMES: u32 = 5;

/// Everything needed to open a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub player1: PlayerInfo,
    pub player2: PlayerInfo,
    pub best_of_frames: u32,
    pub first_to_break: Player,
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self {
            player1: PlayerInfo::named("Player 1"),
            player2: PlayerInfo::named("Player 2"),
            best_of_frames: DEFAULT_BEST_OF_FRAMES,
            first_to_break: Player::Player1,
        }
    }
}

impl MatchSetup {
    pub fn validate(&self) -> Result<(), SetupError> {
        for (player, info) in [
            (Player::Player1, &self.player1),
            (Player::Player2, &self.player2),
        ] {
            if info.name.trim().is_empty() {
                return Err(SetupError::EmptyPlayerName(player));
            }
        }
        if self.best_of_frames == 0 || self.best_of_frames % 2 == 0 {
            return Err(SetupError::InvalidBestOf(self.best_of_frames));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("{0:?} needs a name")]
    EmptyPlayerName(Player),
    #[error("best of {0} frames: must be an odd number of at least 1")]
    InvalidBestOf(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_player_indexes_by_seat() {
        let mut scores = PerPlayer::new(3, 9);
        scores[Player::Player2] += 1;

        assert_eq!(scores[Player::Player1], 3);
        assert_eq!(scores[Player::Player2], 10);
        assert_eq!(Player::Player1.opponent(), Player::Player2);
    }

    #[test]
    fn setup_rejects_even_or_zero_best_of() {
        let mut setup = MatchSetup::default();
        assert_eq!(setup.validate(), Ok(()));

        setup.best_of_frames = 4;
        assert_eq!(setup.validate(), Err(SetupError::InvalidBestOf(4)));

        setup.best_of_frames = 0;
        assert_eq!(setup.validate(), Err(SetupError::InvalidBestOf(0)));
    }

    #[test]
    fn setup_rejects_blank_names() {
        let setup = MatchSetup {
            player2: PlayerInfo::named("   "),
            ..MatchSetup::default()
        };

        assert_eq!(
            setup.validate(),
            Err(SetupError::EmptyPlayerName(Player::Player2))
        );
    }
}
