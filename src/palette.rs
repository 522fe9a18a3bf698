//! Per-level colors
//!
//! Each level gets a light, warm background and a dark grid border. Both are
//! reported in the level statistics.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::uniform;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(r), q(g), q(b))
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Convert hue (degrees), saturation and brightness (0-100) to RGB
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (brightness / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::from_unit(r + m, g + m, b + m)
}

/// Background and grid border colors for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub border: Rgb,
}

impl Palette {
    /// Roll a new palette.
    ///
    /// The background keeps blue below both red and green so it never reads
    /// as blue; the border is a dark, saturated hue.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r = uniform(rng, 220.0, 255.0);
        let g = uniform(rng, 220.0, 255.0);
        let b_max = r.min(g) - 10.0;
        let b = uniform(rng, 150.0, b_max);
        let background = Rgb::new(r as u8, g as u8, b as u8);

        let border = hsb_to_rgb(
            uniform(rng, 0.0, 360.0),
            uniform(rng, 60.0, 100.0),
            uniform(rng, 10.0, 30.0),
        );

        Self { background, border }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hsb_primaries() {
        assert_eq!(hsb_to_rgb(0.0, 100.0, 100.0), Rgb::new(255, 0, 0));
        assert_eq!(hsb_to_rgb(120.0, 100.0, 100.0), Rgb::new(0, 255, 0));
        assert_eq!(hsb_to_rgb(240.0, 100.0, 100.0), Rgb::new(0, 0, 255));
        assert_eq!(hsb_to_rgb(42.0, 0.0, 100.0), Rgb::new(255, 255, 255));
        assert_eq!(hsb_to_rgb(300.0, 80.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_random_palette_ranges() {
        let mut rng = Pcg32::seed_from_u64(21);
        for _ in 0..500 {
            let p = Palette::random(&mut rng);
            let bg = p.background;
            assert!(bg.r >= 220 && bg.g >= 220);
            assert!(bg.b >= 150 && bg.b < bg.r.min(bg.g));
            // Border brightness stays under 30%
            let border_max = p.border.r.max(p.border.g).max(p.border.b);
            assert!(border_max <= 77, "border too bright: {:?}", p.border);
        }
    }
}
