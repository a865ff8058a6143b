//! Rock-paper-scissors: one simultaneous round.

use crate::{EngineError, Move, Outcome, Play, Seat};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// A thrown hand.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Hand {
    /// Crushes scissors.
    Rock,
    /// Covers rock.
    Paper,
    /// Cuts paper.
    Scissors,
}

impl Hand {
    /// The hand this one defeats.
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Scissors => Hand::Paper,
            Hand::Paper => Hand::Rock,
        }
    }

    /// Emoji shown on buttons.
    pub fn emoji(self) -> &'static str {
        match self {
            Hand::Rock => "🪨",
            Hand::Paper => "📄",
            Hand::Scissors => "✂️",
        }
    }
}

/// Result of comparing two hands from the first seat's point of view.
pub fn resolve(first: Hand, second: Hand) -> Outcome {
    if first == second {
        Outcome::Draw
    } else if first.beats() == second {
        Outcome::Won(Seat::First)
    } else {
        Outcome::Won(Seat::Second)
    }
}

/// Rock-paper-scissors session payload: each seat's pending choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RpsRound {
    choices: [Option<Hand>; 2],
}

impl RpsRound {
    /// Creates a round with no choices made.
    pub fn new() -> Self {
        Self::default()
    }

    /// The choice committed by a seat, if any.
    pub fn choice(&self, seat: Seat) -> Option<Hand> {
        self.choices[seat.index()]
    }

    /// True once the seat has committed.
    pub fn has_chosen(&self, seat: Seat) -> bool {
        self.choice(seat).is_some()
    }

    /// Both hands, once both seats have committed.
    pub fn revealed(&self) -> Option<(Hand, Hand)> {
        Some((self.choices[0]?, self.choices[1]?))
    }

    pub(crate) fn validate(&self, seat: Seat, mv: &Move) -> Result<Hand, EngineError> {
        if self.has_chosen(seat) {
            return Err(EngineError::NotYourTurn);
        }
        match *mv {
            Move::Throw(hand) => Ok(hand),
            _ => Err(EngineError::invalid("choose rock, paper or scissors")),
        }
    }

    pub(crate) fn apply(&mut self, seat: Seat, hand: Hand) -> Play {
        self.choices[seat.index()] = Some(hand);
        match self.revealed() {
            Some((first, second)) => Play::Revealed { first, second },
            None => Play::Committed,
        }
    }

    /// Ongoing until both seats commit.
    pub fn evaluate(&self) -> Outcome {
        match self.revealed() {
            Some((first, second)) => resolve(first, second),
            None => Outcome::Ongoing,
        }
    }

    /// The AI commits only after its opponent has, so it never reacts to a
    /// hidden choice it could not see anyway.
    pub(crate) fn ai_reply<R: Rng + ?Sized>(&self, seat: Seat, rng: &mut R) -> Option<Move> {
        if self.has_chosen(seat) || !self.has_chosen(seat.other()) {
            return None;
        }
        let hands: Vec<Hand> = Hand::iter().collect();
        hands.choose(rng).copied().map(Move::Throw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_rule_table() {
        assert_eq!(resolve(Hand::Rock, Hand::Scissors), Outcome::Won(Seat::First));
        assert_eq!(resolve(Hand::Scissors, Hand::Paper), Outcome::Won(Seat::First));
        assert_eq!(resolve(Hand::Paper, Hand::Rock), Outcome::Won(Seat::First));
        assert_eq!(resolve(Hand::Paper, Hand::Scissors), Outcome::Won(Seat::Second));
        for hand in Hand::iter() {
            assert_eq!(resolve(hand, hand), Outcome::Draw);
        }
    }

    #[test]
    fn test_second_choice_rejected() {
        let mut round = RpsRound::new();
        round.apply(Seat::First, Hand::Rock);
        assert_eq!(
            round.validate(Seat::First, &Move::Throw(Hand::Paper)),
            Err(EngineError::NotYourTurn)
        );
        assert_eq!(round.evaluate(), Outcome::Ongoing);
    }

    #[test]
    fn test_parse_hand_names() {
        assert_eq!(Hand::from_str("paper"), Ok(Hand::Paper));
        assert_eq!(Hand::from_str("Scissors"), Ok(Hand::Scissors));
        assert!(Hand::from_str("lizard").is_err());
        assert_eq!(Hand::Rock.to_string(), "rock");
    }
}
