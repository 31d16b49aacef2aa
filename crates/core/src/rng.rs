//! RNG module - uniform random piece generation
//!
//! Each new piece is an independent uniform pick among the seven shapes.
//! There is deliberately no 7-bag: long streaks of one shape can happen.
//!
//! Also provides a simple LCG so a seed reproduces a whole game, and a scripted
//! source that replays a fixed sequence of shapes.

use log::warn;

use crate::palette::{paint, ColorPalette};
use crate::pieces::Tetromino;
use crate::types::{ContrastVariant, PieceKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales the full 32-bit output instead of taking a remainder, so the
    /// weak low bits of the LCG do not decide the result.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }
}

/// Where piece shapes come from.
#[derive(Debug, Clone)]
enum PieceSource {
    Uniform,
    /// Replays `kinds` in order, wrapping around.
    Scripted { kinds: Vec<PieceKind>, cursor: usize },
}

/// Produces new, colored pieces.
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: SimpleRng,
    seed: u32,
    source: PieceSource,
    /// Never empty.
    palettes: Vec<ColorPalette>,
}

impl PieceFactory {
    /// Uniform random shapes from the given seed
    pub fn new(seed: u32, palettes: Vec<ColorPalette>) -> Self {
        let palettes = if palettes.is_empty() {
            vec![ColorPalette::default()]
        } else {
            palettes
        };
        Self {
            rng: SimpleRng::new(seed),
            seed,
            source: PieceSource::Uniform,
            palettes,
        }
    }

    /// Shapes replayed from `kinds`; colors still come from the seeded RNG.
    ///
    /// An empty script behaves like [`PieceFactory::new`].
    pub fn scripted(seed: u32, palettes: Vec<ColorPalette>, kinds: Vec<PieceKind>) -> Self {
        let mut factory = Self::new(seed, palettes);
        if !kinds.is_empty() {
            factory.source = PieceSource::Scripted { kinds, cursor: 0 };
        }
        factory
    }

    /// Seed the factory was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn palettes(&self) -> &[ColorPalette] {
        &self.palettes
    }

    /// Next shape roll: `0..7` maps onto [`PieceKind::ALL`].
    pub fn roll(&mut self) -> u32 {
        match &mut self.source {
            PieceSource::Uniform => self.rng.next_range(PieceKind::ALL.len() as u32),
            PieceSource::Scripted { kinds, cursor } => {
                let kind = kinds[*cursor % kinds.len()];
                *cursor = (*cursor + 1) % kinds.len();
                kind.index()
            }
        }
    }

    /// Create the next piece.
    pub fn next(&mut self, variant: ContrastVariant, palette_index: usize) -> Tetromino {
        let roll = self.roll();
        self.build(roll, variant, palette_index)
    }

    /// Create the piece for a given roll.
    ///
    /// A roll outside `0..7` cannot come from [`PieceFactory::roll`]; it yields
    /// the single-cell fallback piece rather than failing.
    pub fn build(&mut self, roll: u32, variant: ContrastVariant, palette_index: usize) -> Tetromino {
        let palette = self
            .palettes
            .get(palette_index)
            .unwrap_or(&self.palettes[0]);
        let coloring = paint(variant, palette, &mut self.rng);

        match PieceKind::from_index(roll) {
            Some(kind) => Tetromino::new(kind, &coloring),
            None => {
                warn!("piece roll {roll} out of range, using single-cell piece");
                Tetromino::single_cell(&coloring)
            }
        }
    }
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::new(1, ColorPalette::defaults())
    }
}
