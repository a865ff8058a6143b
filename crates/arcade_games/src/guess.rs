//! Guess-the-number against the house.

use crate::{EngineError, GameSettings, Move, Outcome, Play, Seat};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Feedback for a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Hint {
    /// The secret is larger.
    #[display("too low")]
    TooLow,
    /// The secret is smaller.
    #[display("too high")]
    TooHigh,
    /// Found it.
    #[display("correct")]
    Correct,
}

/// Guessing-game session payload.
///
/// The player always sits in [`Seat::First`]; the house in [`Seat::Second`]
/// never moves and wins when the attempts run out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessGame {
    low: i64,
    high: i64,
    secret: i64,
    max_attempts: u32,
    guesses: Vec<(i64, Hint)>,
}

impl GuessGame {
    /// Draws a fresh secret from the configured range.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> Self {
        let (low, high) = ordered(*settings.guess_low(), *settings.guess_high());
        let secret = rng.gen_range(low..=high);
        debug!(low, high, "Secret number drawn");
        Self::with_secret(low, high, secret, *settings.guess_attempts())
    }

    /// Builds a game around a known secret.
    pub fn with_secret(low: i64, high: i64, secret: i64, max_attempts: u32) -> Self {
        let (low, high) = ordered(low, high);
        Self {
            low,
            high,
            secret: secret.clamp(low, high),
            max_attempts: max_attempts.max(1),
            guesses: Vec::new(),
        }
    }

    /// Inclusive range the secret was drawn from.
    pub fn range(&self) -> (i64, i64) {
        (self.low, self.high)
    }

    /// The number to find. Only show it once the game is over.
    pub fn secret(&self) -> i64 {
        self.secret
    }

    /// Guesses so far with their hints.
    pub fn guesses(&self) -> &[(i64, Hint)] {
        &self.guesses
    }

    /// Guesses used so far.
    pub fn attempts_used(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// Guesses remaining before the house wins.
    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used())
    }

    /// Guess cap.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Hint for the latest guess, if any.
    pub fn last_hint(&self) -> Option<Hint> {
        self.guesses.last().map(|(_, hint)| *hint)
    }

    #[instrument(skip(self))]
    pub(crate) fn validate(&self, mv: &Move) -> Result<i64, EngineError> {
        let Move::Guess(n) = *mv else {
            return Err(EngineError::invalid("type a number"));
        };
        if n < self.low || n > self.high {
            return Err(EngineError::invalid(format!(
                "pick a number between {} and {}",
                self.low, self.high
            )));
        }
        Ok(n)
    }

    pub(crate) fn apply(&mut self, guess: i64) -> Play {
        let hint = match guess.cmp(&self.secret) {
            std::cmp::Ordering::Less => Hint::TooLow,
            std::cmp::Ordering::Greater => Hint::TooHigh,
            std::cmp::Ordering::Equal => Hint::Correct,
        };
        self.guesses.push((guess, hint));
        Play::Guessed {
            guess,
            hint,
            attempts_left: self.attempts_left(),
        }
    }

    /// Correct guess wins for the player, an exhausted cap for the house.
    pub fn evaluate(&self) -> Outcome {
        match self.last_hint() {
            Some(Hint::Correct) => Outcome::Won(Seat::First),
            _ if self.attempts_left() == 0 => Outcome::Won(Seat::Second),
            _ => Outcome::Ongoing,
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hints_follow_the_secret() {
        let mut game = GuessGame::with_secret(1, 100, 25, 7);
        let hints: Vec<Hint> = [10, 50, 30, 20, 25]
            .into_iter()
            .map(|g| match game.apply(g) {
                Play::Guessed { hint, .. } => hint,
                other => panic!("unexpected play {:?}", other),
            })
            .collect();
        assert_eq!(
            hints,
            vec![
                Hint::TooLow,
                Hint::TooHigh,
                Hint::TooHigh,
                Hint::TooLow,
                Hint::Correct
            ]
        );
        assert_eq!(game.attempts_used(), 5);
        assert_eq!(game.evaluate(), Outcome::Won(Seat::First));
    }

    #[test]
    fn test_house_wins_when_attempts_run_out() {
        let mut game = GuessGame::with_secret(1, 10, 7, 2);
        game.apply(1);
        assert_eq!(game.evaluate(), Outcome::Ongoing);
        game.apply(2);
        assert_eq!(game.evaluate(), Outcome::Won(Seat::Second));
    }

    #[test]
    fn test_out_of_range_guess_is_rejected() {
        let game = GuessGame::with_secret(1, 100, 25, 7);
        assert!(matches!(
            game.validate(&Move::Guess(0)),
            Err(EngineError::InvalidMove(_))
        ));
        assert!(matches!(
            game.validate(&Move::Guess(101)),
            Err(EngineError::InvalidMove(_))
        ));
        assert_eq!(game.validate(&Move::Guess(100)), Ok(100));
    }

    #[test]
    fn test_secret_stays_in_range() {
        let settings = GameSettings::default().with_guess_low(5).with_guess_high(9);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let game = GuessGame::new(&settings, &mut rng);
            assert!((5..=9).contains(&game.secret()));
        }
    }
}
