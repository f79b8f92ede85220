use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Produces piece identities using a shuffled-bag randomizer.
///
/// # Bag System
///
/// 1. A "bag" holds all 7 piece kinds in shuffled order
/// 2. Pieces are drawn from the front of the queue
/// 3. Before a draw, if at most one piece is pending, a fresh shuffled bag is
///    appended behind it
///
/// Every kind appears once per bag, so two draws of the same kind are never
/// more than 13 pieces apart.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSequencer;
///
/// let mut sequencer = PieceSequencer::new();
///
/// let _first = sequencer.next();
/// let preview = sequencer.peek();
/// assert_eq!(Some(sequencer.next()), preview);
/// ```
#[derive(Debug, Clone)]
pub struct PieceSequencer {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
}

impl Default for PieceSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece sequences.
///
/// A 128-bit seed for the sequencer's random number generator. The same seed
/// yields the same sequence of pieces, which makes headless runs reproducible.
///
/// Serialized and parsed as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, PieceSequencer};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut a = PieceSequencer::with_seed(seed);
/// let mut b = PieceSequencer::with_seed(seed);
/// assert_eq!(a.next(), b.next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

/// Error returned when parsing a [`PieceSeed`] from text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParsePieceSeedError {
    #[error(not(source))]
    input: String,
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceSequencer {
    /// Creates a sequencer with a random seed and an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic sequences.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(PieceKind::LEN + 1),
        }
    }

    /// Pops the next piece kind, refilling the queue first when at most one kind is pending.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PieceKind {
        if self.queue.len() <= 1 {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
        self.queue
            .pop_front()
            .expect("piece queue is refilled before every draw")
    }

    /// Returns the kind the next call to [`Self::next`] will produce, if already queued.
    ///
    /// After the first draw the queue always holds at least one kind.
    #[must_use]
    pub fn peek(&self) -> Option<PieceKind> {
        self.queue.front().copied()
    }

    /// Returns an iterator over the queued kinds in draw order.
    pub fn pending(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> PieceSeed {
        PieceSeed(bytes)
    }

    #[test]
    fn test_fourteen_draws_yield_each_kind_twice() {
        for _ in 0..50 {
            let mut sequencer = PieceSequencer::new();
            let mut counts = HashMap::new();
            for _ in 0..14 {
                *counts.entry(sequencer.next()).or_insert(0) += 1;
            }
            assert_eq!(counts.len(), PieceKind::LEN);
            assert!(counts.values().all(|&n| n == 2), "{counts:?}");
        }
    }

    #[test]
    fn test_every_bag_is_a_permutation() {
        let mut sequencer = PieceSequencer::with_seed(seed_from_bytes([7; 16]));
        for _ in 0..10 {
            let mut bag = (0..PieceKind::LEN)
                .map(|_| sequencer.next())
                .collect::<Vec<_>>();
            bag.sort_by_key(|kind| *kind as u8);
            assert_eq!(bag, PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_queue_refills_at_one_pending() {
        let mut sequencer = PieceSequencer::with_seed(seed_from_bytes([1; 16]));
        assert_eq!(sequencer.peek(), None);

        sequencer.next();
        assert_eq!(sequencer.pending().count(), 6);
        for _ in 0..5 {
            sequencer.next();
        }
        assert_eq!(sequencer.pending().count(), 1);

        // One pending: the next draw appends a bag first.
        sequencer.next();
        assert_eq!(sequencer.pending().count(), 7);
    }

    #[test]
    fn test_peek_matches_next() {
        let mut sequencer = PieceSequencer::new();
        sequencer.next();
        for _ in 0..30 {
            let peeked = sequencer.peek();
            assert!(peeked.is_some());
            assert_eq!(peeked, Some(sequencer.next()));
        }
    }

    #[test]
    fn test_repeat_gap_is_bounded() {
        let mut sequencer = PieceSequencer::with_seed(seed_from_bytes([42; 16]));
        let mut last_seen = HashMap::new();
        for i in 0..700_usize {
            let kind = sequencer.next();
            if let Some(prev) = last_seen.insert(kind, i) {
                assert!(i - prev <= 13, "{kind} repeated after {} draws", i - prev);
            }
        }
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = seed_from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);

        let mut sequencer1 = PieceSequencer::with_seed(seed);
        let mut sequencer2 = PieceSequencer::with_seed(seed);

        for _ in 0..20 {
            assert_eq!(sequencer1.next(), sequencer2.next());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = seed_from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_parse_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex seed"));
            }
            assert!(serde_json::from_str::<PieceSeed>("\"xyz\"").is_err());
        }
    }
}
