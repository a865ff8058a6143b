//! Insult duel: trade barbs, answer with the matching retort or lose a life.
//!
//! Each round the attacker throws an insult from the shared pool and the
//! defender picks one of four retorts. The right retort costs the attacker a
//! life, a wrong one costs the defender. Roles swap every round.

use crate::{EngineError, GameSettings, Move, Outcome, Play, Seat};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// An insult and the retort that defeats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barb {
    /// Line thrown by the attacker.
    pub insult: &'static str,
    /// The only correct answer.
    pub retort: &'static str,
}

/// Every insult the duel can draw, with its retort at the same index.
pub const BARBS: [Barb; 12] = [
    Barb {
        insult: "I've seen scarecrows with better footwork.",
        retort: "Then you've been staring at your own reflection.",
    },
    Barb {
        insult: "My grandmother parries faster than you.",
        retort: "She must have learned by watching you run away.",
    },
    Barb {
        insult: "Your blade is as dull as your wit.",
        retort: "At least mine was sharpened at some point.",
    },
    Barb {
        insult: "I'll have you begging for mercy by supper.",
        retort: "Eat early, then. You'll be too busy limping later.",
    },
    Barb {
        insult: "Every sailor in port laughs at your name.",
        retort: "Funny, they stop laughing when they hear yours.",
    },
    Barb {
        insult: "You hold that sword like a soup ladle.",
        retort: "Good, because you're about to get served.",
    },
    Barb {
        insult: "I've fought goats with more courage than you.",
        retort: "I'm sure the goats taught you everything you know.",
    },
    Barb {
        insult: "Nobody has ever lasted three minutes against me.",
        retort: "Then start counting, I'm about to break your record.",
    },
    Barb {
        insult: "Your reputation smells worse than your boots.",
        retort: "Breathe deep, that's the scent of your defeat.",
    },
    Barb {
        insult: "I once disarmed a man with nothing but a glare.",
        retort: "Is that why you keep squinting at me?",
    },
    Barb {
        insult: "You'll be shark food before the tide turns.",
        retort: "The sharks already spat you out once.",
    },
    Barb {
        insult: "I've trained parrots with more bite than you.",
        retort: "And they still talk more sense than you do.",
    },
];

/// Retorts offered per round.
pub const OPTIONS_PER_ROUND: usize = 4;

/// The round currently waiting for the defender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    attacker: Seat,
    insult: usize,
    options: Vec<usize>,
}

impl Exchange {
    /// Seat that threw the insult.
    pub fn attacker(&self) -> Seat {
        self.attacker
    }

    /// Seat that must answer.
    pub fn defender(&self) -> Seat {
        self.attacker.other()
    }

    /// Index of the insult in [`BARBS`].
    pub fn insult(&self) -> usize {
        self.insult
    }

    /// Offered retorts, as indices into [`BARBS`].
    pub fn options(&self) -> &[usize] {
        &self.options
    }
}

/// A resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riposte {
    /// Seat that threw the insult.
    pub attacker: Seat,
    /// Insult index.
    pub insult: usize,
    /// Retort index chosen by the defender.
    pub retort: usize,
    /// True when the defender answered correctly.
    pub parried: bool,
}

/// Insult-duel session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    lives: [u8; 2],
    pool: Vec<usize>,
    current: Option<Exchange>,
    rounds: Vec<Riposte>,
}

impl Duel {
    /// Shuffles the pool and opens round one, with the challenger defending.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> Self {
        let mut pool: Vec<usize> = (0..BARBS.len()).collect();
        pool.shuffle(rng);
        Self::with_pool(*settings.duel_lives(), pool, rng)
    }

    /// Starts a duel drawing insults from the back of `pool`.
    pub fn with_pool<R: Rng + ?Sized>(lives: u8, pool: Vec<usize>, rng: &mut R) -> Self {
        let mut duel = Self {
            lives: [lives.max(1); 2],
            pool: pool.into_iter().filter(|i| *i < BARBS.len()).collect(),
            current: None,
            rounds: Vec::new(),
        };
        duel.open_round(Seat::Second, rng);
        duel
    }

    /// Lives left for a seat.
    pub fn lives(&self, seat: Seat) -> u8 {
        self.lives[seat.index()]
    }

    /// Insults not yet thrown.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// The open round, if the duel is still going.
    pub fn current(&self) -> Option<&Exchange> {
        self.current.as_ref()
    }

    /// Resolved rounds, oldest first.
    pub fn rounds(&self) -> &[Riposte] {
        &self.rounds
    }

    /// Seat expected to answer.
    pub fn defender(&self) -> Option<Seat> {
        self.current.as_ref().map(Exchange::defender)
    }

    fn open_round<R: Rng + ?Sized>(&mut self, attacker: Seat, rng: &mut R) {
        self.current = self.pool.pop().map(|insult| {
            let mut options: Vec<usize> = (0..BARBS.len()).filter(|i| *i != insult).collect();
            options.shuffle(rng);
            options.truncate(OPTIONS_PER_ROUND - 1);
            options.push(insult);
            options.shuffle(rng);
            debug!(?attacker, insult, "Insult thrown");
            Exchange {
                attacker,
                insult,
                options,
            }
        });
    }

    pub(crate) fn validate(&self, mv: &Move) -> Result<usize, EngineError> {
        let Move::Retort(retort) = *mv else {
            return Err(EngineError::invalid("pick a retort"));
        };
        let Some(exchange) = &self.current else {
            return Err(EngineError::GameAlreadyOver);
        };
        if !exchange.options.contains(&retort) {
            return Err(EngineError::invalid("that retort wasn't offered"));
        }
        Ok(retort)
    }

    /// Resolves the open round and, if both duelists stand, opens the next
    /// one with the defender attacking.
    pub(crate) fn apply<R: Rng + ?Sized>(&mut self, retort: usize, rng: &mut R) -> Play {
        let Some(exchange) = self.current.take() else {
            return Play::Committed;
        };
        let parried = retort == exchange.insult;
        let loser = if parried {
            exchange.attacker
        } else {
            exchange.defender()
        };
        let lives = &mut self.lives[loser.index()];
        *lives = lives.saturating_sub(1);

        let riposte = Riposte {
            attacker: exchange.attacker,
            insult: exchange.insult,
            retort,
            parried,
        };
        self.rounds.push(riposte);

        if self.lives.iter().all(|l| *l > 0) {
            self.open_round(exchange.defender(), rng);
        }
        Play::Riposte(riposte)
    }

    /// Zero lives loses; an empty pool compares lives.
    pub fn evaluate(&self) -> Outcome {
        match self.lives {
            [0, _] => Outcome::Won(Seat::Second),
            [_, 0] => Outcome::Won(Seat::First),
            [first, second] if self.current.is_none() => match first.cmp(&second) {
                std::cmp::Ordering::Greater => Outcome::Won(Seat::First),
                std::cmp::Ordering::Less => Outcome::Won(Seat::Second),
                std::cmp::Ordering::Equal => Outcome::Draw,
            },
            _ => Outcome::Ongoing,
        }
    }

    /// The AI defender knows the right retort and uses it with probability
    /// `accuracy`; otherwise it picks a wrong option at random.
    pub(crate) fn ai_reply<R: Rng + ?Sized>(
        &self,
        seat: Seat,
        accuracy: f64,
        rng: &mut R,
    ) -> Option<Move> {
        let exchange = self.current.as_ref().filter(|e| e.defender() == seat)?;
        if rng.gen_bool(accuracy.clamp(0.0, 1.0)) {
            return Some(Move::Retort(exchange.insult));
        }
        let wrong: Vec<usize> = exchange
            .options
            .iter()
            .copied()
            .filter(|i| *i != exchange.insult)
            .collect();
        wrong
            .choose(rng)
            .copied()
            .or(Some(exchange.insult))
            .map(Move::Retort)
    }
}
