//! Category color allocation and color token conversion.
//!
//! Categories carry a named color token (CSS color names such as `"teal"`).
//! New categories draw a random token from a fixed palette that is not yet
//! used by the project.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{AnnotatorError, Result};

/// Palette new categories are colored from.
#[rustfmt::skip]
pub const PALETTE: &[&str] = &[
    "red", "blue", "green", "orange", "purple",
    "teal", "yellow", "pink", "brown", "cyan",
    "magenta", "lime", "indigo", "violet", "gold",
    "silver", "maroon", "navy", "olive", "coral",
    "aqua", "turquoise", "salmon", "orchid", "plum",
    "crimson", "khaki", "lavender", "chocolate", "tan",
    "skyblue", "seagreen", "tomato", "slateblue", "forestgreen",
    "darkorange", "mediumvioletred", "deepskyblue", "dodgerblue", "firebrick",
];

/// Picks palette colors that are not already taken.
#[derive(Debug)]
pub struct ColorAllocator {
    rng: StdRng,
}

impl ColorAllocator {
    /// Create an allocator seeded from the thread RNG.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create an allocator with a fixed seed (reproducible draws).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a palette color uniformly among those not in `exclude`.
    ///
    /// Sampling from the remaining colors is the same distribution as
    /// redrawing until a free color comes up, but it always terminates.
    /// Returns [`AnnotatorError::PaletteExhausted`] when nothing is left.
    pub fn allocate<S: AsRef<str>>(&mut self, exclude: &[S]) -> Result<String> {
        let available: Vec<&str> = PALETTE
            .iter()
            .copied()
            .filter(|color| !exclude.iter().any(|e| e.as_ref().trim().eq_ignore_ascii_case(color)))
            .collect();

        if available.is_empty() {
            log::warn!(
                "All {} palette colors are in use, cannot color a new category",
                PALETTE.len()
            );
            return Err(AnnotatorError::palette_exhausted(PALETTE.len()));
        }

        let color = available[self.rng.random_range(0..available.len())];
        log::trace!("Allocated color '{}' ({} free)", color, available.len());
        Ok(color.to_string())
    }
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// RGB value of a named palette color.
pub fn named_rgb(token: &str) -> Option<[u8; 3]> {
    let rgb = match token.to_ascii_lowercase().as_str() {
        "red" => [255, 0, 0],
        "blue" => [0, 0, 255],
        "green" => [0, 128, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "yellow" => [255, 255, 0],
        "pink" => [255, 192, 203],
        "brown" => [165, 42, 42],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "lime" => [0, 255, 0],
        "indigo" => [75, 0, 130],
        "violet" => [238, 130, 238],
        "gold" => [255, 215, 0],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "navy" => [0, 0, 128],
        "olive" => [128, 128, 0],
        "coral" => [255, 127, 80],
        "turquoise" => [64, 224, 208],
        "salmon" => [250, 128, 114],
        "orchid" => [218, 112, 214],
        "plum" => [221, 160, 221],
        "crimson" => [220, 20, 60],
        "khaki" => [240, 230, 140],
        "lavender" => [230, 230, 250],
        "chocolate" => [210, 105, 30],
        "tan" => [210, 180, 140],
        "skyblue" => [135, 206, 235],
        "seagreen" => [46, 139, 87],
        "tomato" => [255, 99, 71],
        "slateblue" => [106, 90, 205],
        "forestgreen" => [34, 139, 34],
        "darkorange" => [255, 140, 0],
        "mediumvioletred" => [199, 21, 133],
        "deepskyblue" => [0, 191, 255],
        "dodgerblue" => [30, 144, 255],
        "firebrick" => [178, 34, 34],
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        _ => return None,
    };
    Some(rgb)
}

/// Resolve any color token to RGB.
///
/// Accepts palette names and `#rrggbb`. Unknown tokens get a stable hue
/// derived from the token text so they still render distinguishably.
pub fn token_to_rgb(token: &str) -> [u8; 3] {
    if let Some(rgb) = named_rgb(token) {
        return rgb;
    }
    if let Some(rgb) = parse_hex(token) {
        return rgb;
    }

    log::warn!("Unknown color token '{}', deriving a fallback color", token);
    let seed = token.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    // Golden angle for good distribution
    let hue = (seed as f32 * 137.5) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.9);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

fn parse_hex(token: &str) -> Option<[u8; 3]> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(PALETTE.len() >= 40);
    }

    #[test]
    fn test_every_palette_color_has_rgb() {
        for color in PALETTE {
            assert!(named_rgb(color).is_some(), "missing rgb for {}", color);
        }
    }

    #[test]
    fn test_allocate_never_returns_excluded() {
        let mut allocator = ColorAllocator::seeded(7);
        let exclude: Vec<&str> = PALETTE[..PALETTE.len() - 3].to_vec();
        for _ in 0..200 {
            let color = allocator.allocate(&exclude).unwrap();
            assert!(!exclude.contains(&color.as_str()));
            assert!(PALETTE.contains(&color.as_str()));
        }
    }

    #[test]
    fn test_allocate_last_free_color() {
        let mut allocator = ColorAllocator::seeded(1);
        let exclude: Vec<&str> = PALETTE.iter().copied().filter(|c| *c != "plum").collect();
        assert_eq!(allocator.allocate(&exclude).unwrap(), "plum");
    }

    #[test]
    fn test_allocate_exhausted_palette_is_an_error() {
        let mut allocator = ColorAllocator::seeded(3);
        let result = allocator.allocate(PALETTE);
        assert!(matches!(
            result,
            Err(AnnotatorError::PaletteExhausted { palette_size }) if palette_size == PALETTE.len()
        ));
    }

    #[test]
    fn test_allocate_excludes_regardless_of_case() {
        let mut allocator = ColorAllocator::seeded(5);
        let exclude: Vec<String> = PALETTE
            .iter()
            .filter(|c| **c != "plum")
            .map(|c| c.to_uppercase())
            .chain(["Plum ".to_string()])
            .collect();
        assert!(matches!(
            allocator.allocate(&exclude),
            Err(AnnotatorError::PaletteExhausted { .. })
        ));
    }

    #[test]
    fn test_allocate_ignores_foreign_tokens() {
        let mut allocator = ColorAllocator::seeded(11);
        let color = allocator.allocate(&["#123456", "not-a-color"][..]).unwrap();
        assert!(PALETTE.contains(&color.as_str()));
    }

    #[test]
    fn test_allocate_spreads_over_palette() {
        let mut allocator = ColorAllocator::seeded(42);
        let none: [&str; 0] = [];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(allocator.allocate(&none[..]).unwrap());
        }
        assert!(seen.len() > 10);
    }

    #[test]
    fn test_token_to_rgb() {
        assert_eq!(token_to_rgb("red"), [255, 0, 0]);
        assert_eq!(token_to_rgb("#10ff80"), [16, 255, 128]);
        // Unknown tokens are stable
        assert_eq!(token_to_rgb("mystery"), token_to_rgb("mystery"));
    }

    #[test]
    fn test_hsv_to_rgb_red() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_blue() {
        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert!(r.abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!((b - 1.0).abs() < 0.01);
    }
}
