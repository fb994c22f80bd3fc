//! Vibrant-style palette extraction.
//!
//! The photo is downsampled, its opaque non-white pixels are bucketed into a
//! 5-bit-per-channel histogram, and the most populous buckets become candidate
//! swatches. Each named swatch is then the unused candidate that best matches
//! a target saturation and lightness, with population as a tie-breaker.

use crate::colour::Colour;
use crate::ComposeError;
use image::{DynamicImage, GenericImageView};
use std::collections::BTreeMap;

/// Longest edge of the thumbnail the histogram is built from
const SAMPLE_EDGE: u32 = 100;
const MAX_CANDIDATES: usize = 64;

const TARGET_DARK_LUMA: f32 = 0.26;
const MAX_DARK_LUMA: f32 = 0.45;
const MIN_LIGHT_LUMA: f32 = 0.55;
const TARGET_LIGHT_LUMA: f32 = 0.74;
const MIN_NORMAL_LUMA: f32 = 0.3;
const TARGET_NORMAL_LUMA: f32 = 0.5;
const MAX_NORMAL_LUMA: f32 = 0.7;
const TARGET_MUTED_SATURATION: f32 = 0.3;
const MAX_MUTED_SATURATION: f32 = 0.4;
const TARGET_VIBRANT_SATURATION: f32 = 1.0;
const MIN_VIBRANT_SATURATION: f32 = 0.35;

const WEIGHT_SATURATION: f32 = 3.0;
const WEIGHT_LUMA: f32 = 6.5;
const WEIGHT_POPULATION: f32 = 0.5;

/// A representative colour and the number of sampled pixels it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub rgb: [u8; 3],
    pub population: u32,
}

impl Swatch {
    pub fn colour(&self) -> Colour {
        Colour::from(self.rgb)
    }

    /// Perceptual luma in 0..=1
    pub fn brightness(&self) -> f32 {
        self.colour().brightness()
    }

    /// Hue in degrees, saturation and lightness in 0..=1
    pub fn hsl(&self) -> (f32, f32, f32) {
        let [r, g, b] = self.rgb.map(|c| c as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s, l)
    }
}

/// The six named swatches. Any of them may be absent when the photo has no
/// colour in the matching range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    pub vibrant: Option<Swatch>,
    pub light_vibrant: Option<Swatch>,
    pub dark_vibrant: Option<Swatch>,
    pub muted: Option<Swatch>,
    pub light_muted: Option<Swatch>,
    pub dark_muted: Option<Swatch>,
}

struct Target {
    luma: (f32, f32, f32),
    saturation: (f32, f32, f32),
}

impl Target {
    const fn new(luma: (f32, f32, f32), saturation: (f32, f32, f32)) -> Target {
        Target { luma, saturation }
    }

    fn accepts(&self, s: f32, l: f32) -> bool {
        (self.saturation.0..=self.saturation.2).contains(&s) && (self.luma.0..=self.luma.2).contains(&l)
    }

    fn score(&self, s: f32, l: f32, population: u32, max_population: u32) -> f32 {
        let invert_diff = |value: f32, target: f32| 1.0 - (value - target).abs();
        invert_diff(s, self.saturation.1) * WEIGHT_SATURATION
            + invert_diff(l, self.luma.1) * WEIGHT_LUMA
            + population as f32 / max_population.max(1) as f32 * WEIGHT_POPULATION
    }
}

// (min, target, max)
const NORMAL_LUMA: (f32, f32, f32) = (MIN_NORMAL_LUMA, TARGET_NORMAL_LUMA, MAX_NORMAL_LUMA);
const LIGHT_LUMA: (f32, f32, f32) = (MIN_LIGHT_LUMA, TARGET_LIGHT_LUMA, 1.0);
const DARK_LUMA: (f32, f32, f32) = (0.0, TARGET_DARK_LUMA, MAX_DARK_LUMA);
const VIBRANT_SATURATION: (f32, f32, f32) = (MIN_VIBRANT_SATURATION, TARGET_VIBRANT_SATURATION, 1.0);
const MUTED_SATURATION: (f32, f32, f32) = (0.0, TARGET_MUTED_SATURATION, MAX_MUTED_SATURATION);

/// Count opaque, non-white pixels into 5-bit buckets, keeping channel sums so
/// each bucket's average colour can be recovered
fn histogram(image: &DynamicImage) -> BTreeMap<u16, (u32, [u64; 3])> {
    let sample = if image.width() > SAMPLE_EDGE || image.height() > SAMPLE_EDGE {
        image.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE)
    } else {
        image.clone()
    };

    let mut buckets: BTreeMap<u16, (u32, [u64; 3])> = BTreeMap::new();
    for (_, _, pixel) in sample.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 125 || (r > 250 && g > 250 && b > 250) {
            continue;
        }
        let key = (((r as u16) >> 3) << 10) | (((g as u16) >> 3) << 5) | ((b as u16) >> 3);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += r as u64;
        entry.1[1] += g as u64;
        entry.1[2] += b as u64;
    }
    buckets
}

/// Extract a palette from a decoded photo.
///
/// Fails with [ComposeError::ColorExtractionFailure] when the image is empty
/// or has no opaque, non-white pixels to sample.
pub fn extract_palette(image: &DynamicImage) -> Result<Palette, ComposeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ComposeError::ColorExtractionFailure(
            "image has no pixels".to_string(),
        ));
    }

    let mut candidates: Vec<Swatch> = histogram(image)
        .into_values()
        .map(|(count, sums)| Swatch {
            rgb: sums.map(|sum| (sum / count as u64) as u8),
            population: count,
        })
        .collect();
    if candidates.is_empty() {
        return Err(ComposeError::ColorExtractionFailure(
            "no opaque coloured pixels to sample".to_string(),
        ));
    }

    // stable sort keeps bucket order for equal populations
    candidates.sort_by(|a, b| b.population.cmp(&a.population));
    candidates.truncate(MAX_CANDIDATES);
    let max_population = candidates.iter().map(|s| s.population).max().unwrap_or(1);

    let mut used = vec![false; candidates.len()];
    let mut pick = |target: Target| -> Option<Swatch> {
        let mut best: Option<(usize, f32)> = None;
        for (i, swatch) in candidates.iter().enumerate() {
            if used[i] {
                continue;
            }
            let (_, s, l) = swatch.hsl();
            if !target.accepts(s, l) {
                continue;
            }
            let score = target.score(s, l, swatch.population, max_population);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| {
            used[i] = true;
            candidates[i]
        })
    };

    Ok(Palette {
        vibrant: pick(Target::new(NORMAL_LUMA, VIBRANT_SATURATION)),
        light_vibrant: pick(Target::new(LIGHT_LUMA, VIBRANT_SATURATION)),
        dark_vibrant: pick(Target::new(DARK_LUMA, VIBRANT_SATURATION)),
        muted: pick(Target::new(NORMAL_LUMA, MUTED_SATURATION)),
        light_muted: pick(Target::new(LIGHT_LUMA, MUTED_SATURATION)),
        dark_muted: pick(Target::new(DARK_LUMA, MUTED_SATURATION)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Horizontal stripes of the given colours, `rows` pixels each
    fn stripes(colours: &[([u8; 3], u32)]) -> DynamicImage {
        let height: u32 = colours.iter().map(|(_, rows)| rows).sum();
        let mut img = RgbaImage::new(40, height);
        let mut y0 = 0;
        for &(rgb, rows) in colours {
            for y in y0..y0 + rows {
                for x in 0..40 {
                    img.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], 255]));
                }
            }
            y0 += rows;
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn hsl_of_primaries() {
        let red = Swatch { rgb: [255, 0, 0], population: 1 };
        assert_eq!(red.hsl(), (0.0, 1.0, 0.5));
        let grey = Swatch { rgb: [128, 128, 128], population: 1 };
        let (_, s, _) = grey.hsl();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn finds_vibrant_and_dark_vibrant() {
        let img = stripes(&[([230, 30, 30], 20), ([20, 40, 120], 20), ([120, 120, 110], 20)]);
        let palette = extract_palette(&img).expect("palette");
        let vibrant = palette.vibrant.expect("vibrant");
        assert!(vibrant.rgb[0] > 200);
        let dark = palette.dark_vibrant.expect("dark vibrant");
        assert!(dark.rgb[2] > dark.rgb[0]);
        let muted = palette.muted.expect("muted");
        assert!(muted.hsl().1 <= MAX_MUTED_SATURATION);
    }

    #[test]
    fn swatches_are_not_reused() {
        let img = stripes(&[([230, 30, 30], 30)]);
        let palette = extract_palette(&img).expect("palette");
        assert!(palette.vibrant.is_some());
        assert!(palette.light_vibrant.is_none());
        assert!(palette.dark_vibrant.is_none());
    }

    #[test]
    fn white_or_transparent_images_fail() {
        let white = stripes(&[([255, 255, 255], 10)]);
        assert!(matches!(
            extract_palette(&white),
            Err(ComposeError::ColorExtractionFailure(_))
        ));
        let clear = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        assert!(extract_palette(&clear).is_err());
    }

    #[test]
    fn extraction_is_deterministic() {
        let img = stripes(&[([230, 30, 30], 7), ([20, 160, 60], 7), ([200, 190, 60], 7)]);
        assert_eq!(extract_palette(&img).unwrap(), extract_palette(&img).unwrap());
    }
}
