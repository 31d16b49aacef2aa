//! Palette module - piece coloring per contrast variant
//!
//! Colors are decided once, when a piece is created, by [`paint`]. The
//! resulting [`PieceColoring`] is applied to every rotation state so a cell
//! keeps its color while the piece turns.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::rng::SimpleRng;
use crate::types::{BarDirection, ColorSpec, ContrastVariant, Rgb};

/// Colors available to the piece factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub name: String,
    /// Choices for the solid-color variants.
    pub solid: Vec<Rgb>,
    /// The two colors striped by the contrast variants, e.g. red and blue for
    /// red/blue glasses.
    pub contrast: [Rgb; 2],
}

impl ColorPalette {
    /// Bright solid colors with a red/blue contrast pair.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            solid: vec![
                Rgb::new(0xe5, 0x39, 0x35),
                Rgb::new(0x1e, 0x88, 0xe5),
                Rgb::new(0x43, 0xa0, 0x47),
                Rgb::new(0xfd, 0xd8, 0x35),
                Rgb::new(0x8e, 0x24, 0xaa),
                Rgb::new(0xfb, 0x8c, 0x00),
                Rgb::new(0x00, 0xac, 0xc1),
            ],
            contrast: [Rgb::new(0xff, 0x00, 0x00), Rgb::new(0x00, 0x00, 0xff)],
        }
    }

    /// Red/cyan anaglyph pair, for glasses with a cyan lens.
    pub fn anaglyph() -> Self {
        Self {
            name: "anaglyph".to_string(),
            solid: vec![Rgb::new(0xff, 0x30, 0x30), Rgb::new(0x00, 0xc8, 0xff)],
            contrast: [Rgb::new(0xff, 0x30, 0x30), Rgb::new(0x00, 0xc8, 0xff)],
        }
    }

    /// Palettes shipped with the game.
    pub fn defaults() -> Vec<ColorPalette> {
        vec![Self::classic(), Self::anaglyph()]
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Per-piece color decision. Every cell of a piece shares one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceColoring {
    variant: ContrastVariant,
    color: ColorSpec,
}

impl PieceColoring {
    /// Every cell the same solid color.
    pub fn uniform(color: ColorSpec) -> Self {
        Self {
            variant: ContrastVariant::FullColor,
            color,
        }
    }

    pub fn variant(&self) -> ContrastVariant {
        self.variant
    }

    pub fn color(&self) -> &ColorSpec {
        &self.color
    }

    /// Default bar orientation for the `cell`-th cell of a state: striped
    /// variants alternate from cell to cell. Shapes may override this, see
    /// [`crate::pieces::direction_overrides`].
    pub fn direction_for(&self, cell: usize) -> Option<BarDirection> {
        if !self.variant.is_striped() {
            return None;
        }
        Some(if cell % 2 == 0 {
            BarDirection::Vertical
        } else {
            BarDirection::Horizontal
        })
    }
}

/// Decide the colors of a new piece.
///
/// The two solid variants both paint the whole piece in one palette color.
pub fn paint(variant: ContrastVariant, palette: &ColorPalette, rng: &mut SimpleRng) -> PieceColoring {
    let color = match variant {
        ContrastVariant::FullColor | ContrastVariant::MixedColor => pick_solid(palette, rng),
        ContrastVariant::HighContrast | ContrastVariant::VeryHighContrast => {
            stripes(variant.band_count(), palette, rng)
        }
    };
    PieceColoring { variant, color }
}

fn pick_solid(palette: &ColorPalette, rng: &mut SimpleRng) -> ColorSpec {
    if palette.solid.is_empty() {
        return ColorSpec::solid(Rgb::WHITE);
    }
    let i = rng.next_range(palette.solid.len() as u32) as usize;
    ColorSpec::solid(palette.solid[i])
}

/// Alternating bands of the contrast pair; which color leads is random.
fn stripes(bands: usize, palette: &ColorPalette, rng: &mut SimpleRng) -> ColorSpec {
    let [mut a, mut b] = palette.contrast;
    if rng.next_bool() {
        std::mem::swap(&mut a, &mut b);
    }
    let colors: ArrayVec<Rgb, 5> = (0..bands).map(|i| if i % 2 == 0 { a } else { b }).collect();
    ColorSpec::banded(&colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_color_uses_one_palette_color() {
        let palette = ColorPalette::classic();
        let mut rng = SimpleRng::new(7);
        let coloring = paint(ContrastVariant::FullColor, &palette, &mut rng);

        let color = coloring.color();
        assert!(color.is_solid());
        assert!(palette.solid.contains(&color.primary()));
        for i in 0..4 {
            assert_eq!(coloring.direction_for(i), None);
        }
    }

    #[test]
    fn test_mixed_color_paints_whole_piece_in_one_color() {
        let palette = ColorPalette::classic();
        let mut rng = SimpleRng::new(99);
        for _ in 0..50 {
            let coloring = paint(ContrastVariant::MixedColor, &palette, &mut rng);
            assert!(coloring.color().is_solid());
            assert!(palette.solid.contains(&coloring.color().primary()));
            assert_eq!(coloring.direction_for(1), None);
        }
    }

    #[test]
    fn test_high_contrast_has_three_alternating_bands() {
        let palette = ColorPalette::classic();
        let mut rng = SimpleRng::new(3);
        let coloring = paint(ContrastVariant::HighContrast, &palette, &mut rng);
        let spec = coloring.color();
        let bands = spec.bands();

        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0], bands[2]);
        assert_ne!(bands[0], bands[1]);
        assert!(palette.contrast.contains(&bands[0]));
        assert!(palette.contrast.contains(&bands[1]));
    }

    #[test]
    fn test_very_high_contrast_has_five_bands_and_alternating_bars() {
        let palette = ColorPalette::classic();
        let mut rng = SimpleRng::new(11);
        let coloring = paint(ContrastVariant::VeryHighContrast, &palette, &mut rng);

        assert_eq!(coloring.color().bands().len(), 5);
        assert_eq!(coloring.direction_for(0), Some(BarDirection::Vertical));
        assert_eq!(coloring.direction_for(1), Some(BarDirection::Horizontal));
        assert_eq!(coloring.direction_for(2), Some(BarDirection::Vertical));
    }

    #[test]
    fn test_stripe_order_varies_between_pieces() {
        let palette = ColorPalette::classic();
        let mut rng = SimpleRng::new(12345);
        let leads: Vec<Rgb> = (0..32)
            .map(|_| paint(ContrastVariant::HighContrast, &palette, &mut rng).color().primary())
            .collect();
        assert!(leads.contains(&palette.contrast[0]));
        assert!(leads.contains(&palette.contrast[1]));
    }

    #[test]
    fn test_empty_palette_falls_back_to_white() {
        let palette = ColorPalette {
            name: "empty".to_string(),
            solid: Vec::new(),
            contrast: [Rgb::BLACK, Rgb::WHITE],
        };
        let mut rng = SimpleRng::new(1);
        let coloring = paint(ContrastVariant::FullColor, &palette, &mut rng);
        assert_eq!(coloring.color(), &ColorSpec::solid(Rgb::WHITE));
    }
}
