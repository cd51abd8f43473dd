//! RNG module - piece generation
//!
//! A [`PieceSource`] hands out pieces one at a time and can report the next
//! one without consuming it. The engine keeps its own fixed-depth look-ahead
//! queue on top of a source, so a source only needs to know one piece ahead.
//!
//! [`RandomSource`] draws each piece independently and uniformly (no 7-bag),
//! from a seeded ChaCha8 stream so a seed always replays the same game.
//! [`SequenceSource`] cycles a fixed list, which is what tests and scripted
//! scenarios want.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SourceError;
use crate::types::PieceKind;

/// Anything that can feed pieces to an engine
pub trait PieceSource {
    /// Consume and return the next piece
    fn next_piece(&mut self) -> PieceKind;

    /// The piece the next `next_piece` call will return
    fn peek_piece(&self) -> PieceKind;
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_piece(&mut self) -> PieceKind {
        (**self).next_piece()
    }

    fn peek_piece(&self) -> PieceKind {
        (**self).peek_piece()
    }
}

/// Uniform random piece generator
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
    /// Pre-rolled so `peek_piece` needs no mutation
    upcoming: PieceKind,
}

impl RandomSource {
    /// Create a new generator with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let upcoming = Self::roll(&mut rng);
        Self {
            rng,
            seed,
            upcoming,
        }
    }

    /// Seed the generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn roll(rng: &mut ChaCha8Rng) -> PieceKind {
        PieceKind::ALL[rng.gen_range(0..PieceKind::ALL.len())]
    }
}

impl PieceSource for RandomSource {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.upcoming;
        self.upcoming = Self::roll(&mut self.rng);
        piece
    }

    fn peek_piece(&self) -> PieceKind {
        self.upcoming
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Repeats a fixed sequence of pieces forever
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSource {
    pieces: Vec<PieceKind>,
    position: usize,
}

impl SequenceSource {
    pub fn new(pieces: impl IntoIterator<Item = PieceKind>) -> Result<Self, SourceError> {
        let pieces: Vec<PieceKind> = pieces.into_iter().collect();
        if pieces.is_empty() {
            return Err(SourceError::EmptySequence);
        }
        Ok(Self {
            pieces,
            position: 0,
        })
    }

    /// A source that only ever yields `kind`
    pub fn repeat(kind: PieceKind) -> Self {
        Self {
            pieces: vec![kind],
            position: 0,
        }
    }

    /// How many pieces have been drawn so far
    pub fn drawn(&self) -> usize {
        self.position
    }
}

impl PieceSource for SequenceSource {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.peek_piece();
        self.position += 1;
        piece
    }

    fn peek_piece(&self) -> PieceKind {
        self.pieces[self.position % self.pieces.len()]
    }
}
