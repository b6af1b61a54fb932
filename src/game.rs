use std::cmp::Ordering;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::ball::{
    ALL_COLORS_VALUE_SUM, Ball, COLORS_IN_SEQUENCE, FOUL_POINTS, INITIAL_REDS, POINTS_PER_RED,
    colors_value_from,
};
use crate::event::MatchEvent;
use crate::types::{FrameRecord, MatchSetup, PerPlayer, Phase, Player, PlayerInfo, SetupError};

const SEQUENCE_LEN: u8 = COLORS_IN_SEQUENCE.len() as u8;

/// Full state of one match in progress.
///
/// Serializable as a whole so the caller can persist it between events.
/// All changes go through [`MatchState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub players: PerPlayer<PlayerInfo>,
    pub scores: PerPlayer<u32>,
    pub frames_won: PerPlayer<u32>,
    pub current_turn: Player,
    pub current_break: u32,
    pub highest_break_this_frame: PerPlayer<u32>,
    pub remaining_reds: u8,
    pub phase: Phase,
    /// Contract: set by a red or a free ball, cleared by the next colour or
    /// the end of the visit; never `true` once the frame is over.
    pub waiting_for_color_after_red: bool,
    /// Contract: only advances in [`Phase::ColorsSequence`], `0..=6`.
    pub next_color_index: u8,
    pub free_ball_available: bool,
    pub free_ball_active: bool,
    pub frame_winner: Option<Player>,
    pub match_winner: Option<Player>,
    pub player_to_break_next: Player,
    pub best_of_frames: u32,
    pub frame_history: Vec<FrameRecord>,
}

impl MatchState {
    pub fn new(setup: MatchSetup) -> Result<Self, SetupError> {
        setup.validate()?;
        Ok(Self::from_checked_setup(setup))
    }

    /// Caller contract: `setup` has passed [`MatchSetup::validate`].
    pub(crate) fn from_checked_setup(setup: MatchSetup) -> Self {
        let MatchSetup {
            player1,
            player2,
            best_of_frames,
            first_to_break,
        } = setup;

        Self {
            players: PerPlayer::new(player1, player2),
            scores: PerPlayer::default(),
            frames_won: PerPlayer::default(),
            current_turn: first_to_break,
            current_break: 0,
            highest_break_this_frame: PerPlayer::default(),
            remaining_reds: INITIAL_REDS,
            phase: Phase::RedsAvailable,
            waiting_for_color_after_red: false,
            next_color_index: 0,
            free_ball_available: false,
            free_ball_active: false,
            frame_winner: None,
            match_winner: None,
            player_to_break_next: first_to_break.opponent(),
            best_of_frames,
            frame_history: Vec::new(),
        }
    }

    /// Applies one event in place.
    ///
    /// Returns `false` and leaves the state untouched when the event does not
    /// apply in the current phase.
    pub fn apply(&mut self, event: MatchEvent) -> bool {
        let applied = match event {
            MatchEvent::Pot { ball } => self.pot(ball),
            MatchEvent::PotReds { count } => self.pot_reds(count),
            MatchEvent::EndTurn => self.end_turn(),
            MatchEvent::Foul { points } => self.foul(points),
            MatchEvent::FoulOnPot { ball } => self.foul(ball.foul_value()),
            MatchEvent::StartFreeBall => self.start_free_ball(),
            MatchEvent::ConcedeFrame => self.concede_frame(),
            MatchEvent::StartNextFrame { breaker } => self.start_next_frame(breaker),
            MatchEvent::RestartMatch => {
                self.restart_match();
                true
            }
        };

        if !applied {
            debug!("ignored {event:?} in {:?}", self.phase);
            return false;
        }

        self.settle();
        true
    }

    /// Frames needed to take the match.
    pub fn frames_to_win(&self) -> u32 {
        self.best_of_frames.div_ceil(2)
    }

    pub fn points_remaining(&self) -> u32 {
        points_remaining(self)
    }

    /// The ball the player at the table must play next, if a single one is on.
    pub fn ball_on(&self) -> Option<Ball> {
        match self.phase {
            Phase::RedsAvailable if !self.waiting_for_color_after_red => Some(Ball::Red),
            Phase::ColorsSequence => COLORS_IN_SEQUENCE
                .get(self.next_color_index as usize)
                .copied(),
            _ => None,
        }
    }

    /// Operator-facing hint describing what happens next.
    pub fn prompt(&self) -> String {
        let name = |player: Player| self.players[player].name.as_str();

        match self.phase {
            Phase::MatchOver => match self.match_winner {
                Some(winner) => format!(
                    "{} wins the match {} - {} (best of {}).",
                    name(winner),
                    self.frames_won.player1,
                    self.frames_won.player2,
                    self.best_of_frames
                ),
                None => "Match over.".to_string(),
            },
            Phase::FrameOver => {
                let frame = self.frame_history.len();
                match self.frame_winner {
                    Some(winner) => format!(
                        "{} wins frame {frame}. Points: {} - {}.",
                        name(winner),
                        self.scores.player1,
                        self.scores.player2
                    ),
                    None => format!(
                        "Frame {frame} ends level at {} - {}. Re-spot black is not implemented.",
                        self.scores.player1, self.scores.player2
                    ),
                }
            }
            Phase::RedsAvailable | Phase::ColorsSequence => {
                let player = name(self.current_turn);
                let mut message = if self.free_ball_active {
                    format!("{player} has a free ball. Pot any colour.")
                } else {
                    match self.ball_on() {
                        Some(ball) => format!("{player} to play. Pot {ball}."),
                        None => format!("{player} to play. Pot a colour."),
                    }
                };
                if self.free_ball_available {
                    message.push_str(" Free ball available.");
                }
                if self.current_break > 0 {
                    message.push_str(&format!(" Break: {}", self.current_break));
                }
                message
            }
        }
    }

    /// Checks the invariants that can be verified on a single snapshot.
    pub fn validate(&self) -> Result<(), String> {
        if self.best_of_frames == 0 || self.best_of_frames % 2 == 0 {
            return Err(format!("invalid best of {}", self.best_of_frames));
        }
        if self.remaining_reds > INITIAL_REDS {
            return Err(format!("{} reds on the table", self.remaining_reds));
        }
        if self.next_color_index > SEQUENCE_LEN {
            return Err(format!("colour index {} out of range", self.next_color_index));
        }

        let target = self.frames_to_win();
        if self.frames_won.player1 > target || self.frames_won.player2 > target {
            return Err("frames won exceed the match target".to_string());
        }
        if self.match_winner.is_some() != (self.phase == Phase::MatchOver) {
            return Err("match winner does not agree with phase".to_string());
        }
        if self.phase.is_live() && self.frame_winner.is_some() {
            return Err("frame winner set during a live frame".to_string());
        }
        if self.waiting_for_color_after_red && !self.phase.is_live() {
            return Err("colour obligation after the frame ended".to_string());
        }
        match self.phase {
            Phase::RedsAvailable if self.next_color_index != 0 => {
                return Err("colour sequence started during the reds phase".to_string());
            }
            Phase::ColorsSequence if self.remaining_reds != 0 => {
                return Err("colour sequence started with reds on the table".to_string());
            }
            _ => {}
        }

        for (expected, record) in (1..).zip(&self.frame_history) {
            if record.frame_number != expected {
                return Err(format!(
                    "frame history out of order: expected frame {expected}, got {}",
                    record.frame_number
                ));
            }
        }

        Ok(())
    }

    fn pot(&mut self, ball: Ball) -> bool {
        if !self.phase.is_live() {
            return false;
        }

        if self.free_ball_active {
            if ball.is_red() {
                return false;
            }
            self.free_ball_active = false;
            self.free_ball_available = false;
            self.waiting_for_color_after_red = true;
            self.add_to_break(1);
            return true;
        }

        match self.phase {
            Phase::RedsAvailable if ball.is_red() => {
                if self.waiting_for_color_after_red || self.remaining_reds == 0 {
                    return false;
                }
                self.remaining_reds -= 1;
                self.waiting_for_color_after_red = true;
            }
            Phase::RedsAvailable => {
                if !self.waiting_for_color_after_red {
                    return false;
                }
                self.waiting_for_color_after_red = false;
                if self.remaining_reds == 0 {
                    self.enter_colors_sequence();
                }
            }
            Phase::ColorsSequence => {
                if self.ball_on() != Some(ball) {
                    return false;
                }
                self.next_color_index += 1;
                self.waiting_for_color_after_red = false;
            }
            Phase::FrameOver | Phase::MatchOver => return false,
        }

        self.free_ball_available = false;
        self.add_to_break(ball.value());
        true
    }

    fn pot_reds(&mut self, count: u8) -> bool {
        if self.phase != Phase::RedsAvailable
            || self.waiting_for_color_after_red
            || self.free_ball_active
            || count == 0
            || count > self.remaining_reds
        {
            return false;
        }

        self.remaining_reds -= count;
        self.waiting_for_color_after_red = true;
        self.free_ball_available = false;
        self.add_to_break(u32::from(count));
        true
    }

    fn end_turn(&mut self) -> bool {
        if !self.phase.is_live() {
            return false;
        }

        self.hand_over(self.current_turn.opponent());
        self.free_ball_available = false;
        true
    }

    fn foul(&mut self, points: u32) -> bool {
        if !self.phase.is_live() || !FOUL_POINTS.contains(&points) {
            return false;
        }

        let benefiting = self.current_turn.opponent();
        self.scores[benefiting] += points;
        self.hand_over(benefiting);
        self.free_ball_available = true;
        true
    }

    fn start_free_ball(&mut self) -> bool {
        if !self.phase.is_live() || !self.free_ball_available {
            return false;
        }

        self.free_ball_active = true;
        self.free_ball_available = false;
        true
    }

    fn concede_frame(&mut self) -> bool {
        if !self.phase.is_live() {
            return false;
        }

        let winner = self.current_turn.opponent();
        self.close_frame(Some(winner));
        true
    }

    fn start_next_frame(&mut self, breaker: Option<Player>) -> bool {
        if self.phase != Phase::FrameOver || self.match_winner.is_some() {
            return false;
        }

        let breaker = breaker.unwrap_or(self.player_to_break_next);
        self.reset_frame(breaker);
        true
    }

    fn restart_match(&mut self) {
        self.frames_won = PerPlayer::default();
        self.frame_history.clear();
        self.match_winner = None;
        self.reset_frame(self.player_to_break_next);
    }

    /// Frame and match completion checks run after every applied event.
    fn settle(&mut self) {
        if self.phase == Phase::ColorsSequence
            && self.next_color_index >= SEQUENCE_LEN
            && self.frame_winner.is_none()
        {
            let winner = match self.scores.player1.cmp(&self.scores.player2) {
                Ordering::Greater => Some(Player::Player1),
                Ordering::Less => Some(Player::Player2),
                Ordering::Equal => None,
            };
            self.close_frame(winner);
        }

        if self.frame_winner.is_some() && self.match_winner.is_none() {
            let target = self.frames_to_win();
            self.match_winner = [Player::Player1, Player::Player2]
                .into_iter()
                .find(|&player| self.frames_won[player] == target);

            if let Some(winner) = self.match_winner {
                self.phase = Phase::MatchOver;
                info!(
                    "match won by {winner:?} {} - {}",
                    self.frames_won.player1, self.frames_won.player2
                );
            }
        }
    }

    fn close_frame(&mut self, winner: Option<Player>) {
        let record = FrameRecord {
            frame_number: self.frame_history.len() as u32 + 1,
            scores: self.scores,
            highest_breaks: self.highest_break_this_frame,
            winner,
        };
        info!(
            "frame {} over: {} - {}, winner {winner:?}",
            record.frame_number, record.scores.player1, record.scores.player2
        );
        self.frame_history.push(record);

        if let Some(winner) = winner {
            self.frames_won[winner] += 1;
        }
        self.frame_winner = winner;
        self.phase = Phase::FrameOver;
        self.current_break = 0;
        self.waiting_for_color_after_red = false;
        self.free_ball_available = false;
        self.free_ball_active = false;
    }

    /// Passes the table to `player`, discharging any pending colour.
    fn hand_over(&mut self, player: Player) {
        self.current_turn = player;
        self.current_break = 0;

        if self.waiting_for_color_after_red
            && self.remaining_reds == 0
            && self.phase == Phase::RedsAvailable
        {
            self.enter_colors_sequence();
        }
        self.waiting_for_color_after_red = false;
        self.free_ball_active = false;
    }

    fn enter_colors_sequence(&mut self) {
        self.phase = Phase::ColorsSequence;
        self.next_color_index = 0;
    }

    fn add_to_break(&mut self, points: u32) {
        let player = self.current_turn;
        self.scores[player] += points;
        self.current_break += points;
        if self.current_break > self.highest_break_this_frame[player] {
            self.highest_break_this_frame[player] = self.current_break;
        }
    }

    fn reset_frame(&mut self, breaker: Player) {
        self.scores = PerPlayer::default();
        self.current_turn = breaker;
        self.current_break = 0;
        self.highest_break_this_frame = PerPlayer::default();
        self.remaining_reds = INITIAL_REDS;
        self.phase = Phase::RedsAvailable;
        self.waiting_for_color_after_red = false;
        self.next_color_index = 0;
        self.free_ball_available = false;
        self.free_ball_active = false;
        self.frame_winner = None;
        self.player_to_break_next = breaker.opponent();
    }
}

/// Pure form of [`MatchState::apply`]: a rejected event yields an equal state.
pub fn apply_event(state: &MatchState, event: MatchEvent) -> MatchState {
    let mut next = state.clone();
    next.apply(event);
    next
}

/// Most points still available on the table, counting each red as eight.
pub fn points_remaining(state: &MatchState) -> u32 {
    match state.phase {
        Phase::FrameOver | Phase::MatchOver => 0,
        _ if state.remaining_reds > 0 => {
            u32::from(state.remaining_reds) * POINTS_PER_RED + ALL_COLORS_VALUE_SUM
        }
        Phase::ColorsSequence => colors_value_from(state.next_color_index as usize),
        Phase::RedsAvailable => ALL_COLORS_VALUE_SUM,
    }
}
