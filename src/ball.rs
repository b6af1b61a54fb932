use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const INITIAL_REDS: u8 = 15;
/// Flat value of one red for the points-remaining estimate: the red plus a black.
pub const POINTS_PER_RED: u32 = 8;
pub const MIN_FOUL_POINTS: u32 = 4;
pub const FOUL_POINTS: RangeInclusive<u32> = MIN_FOUL_POINTS..=7;

/// Colours in the order they must be cleared once the reds are gone.
pub const COLORS_IN_SEQUENCE: [Ball; 6] = [
    Ball::Yellow,
    Ball::Green,
    Ball::Brown,
    Ball::Blue,
    Ball::Pink,
    Ball::Black,
];

pub const ALL_COLORS_VALUE_SUM: u32 = 27;

/// An object ball. Reds are fungible, so only the kind is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ball {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Ball {
    pub const ALL: [Ball; 7] = [
        Ball::Red,
        Ball::Yellow,
        Ball::Green,
        Ball::Brown,
        Ball::Blue,
        Ball::Pink,
        Ball::Black,
    ];

    pub const fn value(self) -> u32 {
        match self {
            Ball::Red => 1,
            Ball::Yellow => 2,
            Ball::Green => 3,
            Ball::Brown => 4,
            Ball::Blue => 5,
            Ball::Pink => 6,
            Ball::Black => 7,
        }
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Ball::Red)
    }

    /// Position in [`COLORS_IN_SEQUENCE`], `None` for red.
    pub fn sequence_index(self) -> Option<usize> {
        COLORS_IN_SEQUENCE.iter().position(|&c| c == self)
    }

    /// Penalty for a foul committed by potting this ball.
    pub fn foul_value(self) -> u32 {
        self.value().max(MIN_FOUL_POINTS)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Ball::Red => "Red",
            Ball::Yellow => "Yellow",
            Ball::Green => "Green",
            Ball::Brown => "Brown",
            Ball::Blue => "Blue",
            Ball::Pink => "Pink",
            Ball::Black => "Black",
        }
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum of the colours from `index` to the end of the sequence.
pub fn colors_value_from(index: usize) -> u32 {
    COLORS_IN_SEQUENCE
        .iter()
        .skip(index)
        .map(|ball| ball.value())
        .sum()
}
