//! QR code appearance: choosing a print-safe module colour and producing the
//! QR image that gets placed on the page.

use crate::colour::{colours, Colour};
use crate::image::{Asset, Image};
use crate::palette::{extract_palette, Palette};
use crate::ComposeError;
use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{Color as Module, QrCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Vibrant colours brighter than this are too light to scan
pub const MAX_VIBRANT_BRIGHTNESS: f32 = 0.7;
/// Substituted colours must be at most this bright
pub const MAX_DARK_BRIGHTNESS: f32 = 0.4;

/// Light modules darker than this luma are treated as dark when recolouring
const DARK_MODULE_LUMA: u8 = 128;
/// Pixels per module when rendering from a payload
const MODULE_PIXELS: u32 = 10;
/// Quiet zone around a rendered code, in modules
const QUIET_ZONE: u32 = 4;

/// Where the QR code comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrInput {
    /// A code rendered elsewhere, recoloured before placement
    Bitmap(Asset),
    /// Text (usually a URL) to encode here
    Payload(String),
}

/// How the dark modules of a QR code are coloured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum QrTint {
    #[default]
    Black,
    /// Derived from the photo's palette under the contrast policy
    FromPhoto,
    Custom(Colour),
}

/// Module colours for a QR code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrColours {
    pub dark: Colour,
    pub light: Colour,
}

impl Default for QrColours {
    fn default() -> Self {
        QrColours {
            dark: colours::BLACK,
            light: colours::WHITE,
        }
    }
}

/// Pick the colour for dark QR modules from a photo's palette.
///
/// The vibrant swatch is preferred. When it is missing or brighter than
/// [MAX_VIBRANT_BRIGHTNESS] it is replaced by the dark-vibrant swatch, or the
/// muted one if there is no dark-vibrant. A substitute brighter than
/// [MAX_DARK_BRIGHTNESS] is replaced again by dark-vibrant when that is dark
/// enough, and by black otherwise.
pub fn choose_dark_colour(palette: &Palette) -> Colour {
    if let Some(vibrant) = palette.vibrant {
        if vibrant.brightness() <= MAX_VIBRANT_BRIGHTNESS {
            return vibrant.colour();
        }
    }

    let substitute = palette.dark_vibrant.or(palette.muted);
    match substitute {
        Some(swatch) if swatch.brightness() <= MAX_DARK_BRIGHTNESS => swatch.colour(),
        _ => match palette.dark_vibrant {
            Some(dark) if dark.brightness() <= MAX_DARK_BRIGHTNESS => dark.colour(),
            _ => colours::BLACK,
        },
    }
}

/// QR colours derived from a photo. Palette extraction failures are not
/// errors: they fall back to black on white.
pub fn colours_from_photo(photo: &DynamicImage) -> QrColours {
    match extract_palette(photo) {
        Ok(palette) => {
            let dark = choose_dark_colour(&palette);
            debug!(?dark, brightness = dark.brightness(), "tinted qr from photo");
            QrColours {
                dark,
                light: colours::WHITE,
            }
        }
        Err(error) => {
            warn!(%error, "palette extraction failed, using black on white");
            QrColours::default()
        }
    }
}

/// Resolve a tint into concrete module colours. `FromPhoto` without a photo is
/// black on white. A custom colour brighter than [MAX_DARK_BRIGHTNESS] won't
/// scan against white and is replaced by black.
pub fn resolve_tint(tint: QrTint, photo: Option<&DynamicImage>) -> QrColours {
    match (tint, photo) {
        (QrTint::Black, _) => QrColours::default(),
        (QrTint::Custom(dark), _) if dark.brightness() > MAX_DARK_BRIGHTNESS => {
            warn!(
                ?dark,
                brightness = dark.brightness(),
                "custom qr tint is too pale to scan, using black"
            );
            QrColours::default()
        }
        (QrTint::Custom(dark), _) => QrColours {
            dark,
            light: colours::WHITE,
        },
        (QrTint::FromPhoto, Some(photo)) => colours_from_photo(photo),
        (QrTint::FromPhoto, None) => QrColours::default(),
    }
}

fn to_rgba(colour: Colour) -> Rgba<u8> {
    let [r, g, b] = colour.to_rgb_bytes();
    Rgba([r, g, b, 255])
}

/// Map every pixel of a pre-rendered code to the dark or light colour by its
/// luma. Transparent pixels count as light.
pub fn recolour(bitmap: &DynamicImage, colours: QrColours) -> RgbaImage {
    let dark = to_rgba(colours.dark);
    let light = to_rgba(colours.light);
    let source = bitmap.to_rgba8();
    RgbaImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.get_pixel(x, y).0;
        let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8;
        if a >= 128 && luma < DARK_MODULE_LUMA {
            dark
        } else {
            light
        }
    })
}

/// Encode `payload` and draw it with a quiet zone
pub fn render_payload(payload: &str, colours: QrColours) -> Result<RgbaImage, ComposeError> {
    let code = QrCode::new(payload.as_bytes())?;
    let modules = code.width() as u32;
    let cells = code.to_colors();
    let side = (modules + 2 * QUIET_ZONE) * MODULE_PIXELS;
    let dark = to_rgba(colours.dark);
    let light = to_rgba(colours.light);

    Ok(RgbaImage::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PIXELS) as i64 - QUIET_ZONE as i64;
        let my = (y / MODULE_PIXELS) as i64 - QUIET_ZONE as i64;
        let inside = (0..modules as i64).contains(&mx) && (0..modules as i64).contains(&my);
        if inside && cells[(my as u32 * modules + mx as u32) as usize] == Module::Dark {
            dark
        } else {
            light
        }
    }))
}

/// Build the image placed on the page for a QR input
pub fn build_qr_image(input: &QrInput, colours: QrColours) -> Result<Image, ComposeError> {
    let pixels = match input {
        QrInput::Bitmap(asset) => {
            let decoded = asset.decode("qr")?;
            recolour(decoded.pixels(), colours)
        }
        QrInput::Payload(payload) => render_payload(payload, colours)?,
    };
    Ok(Image::from_rgba(pixels).pixelated())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Swatch;

    fn swatch(rgb: [u8; 3]) -> Option<Swatch> {
        Some(Swatch {
            rgb,
            population: 10,
        })
    }

    const PALE_YELLOW: [u8; 3] = [250, 240, 150]; // ~0.90
    const NAVY: [u8; 3] = [20, 30, 90]; // ~0.12
    const SAND: [u8; 3] = [190, 170, 140]; // ~0.68
    const CRIMSON: [u8; 3] = [180, 20, 40]; // ~0.27

    #[test]
    fn pale_custom_tints_print_black() {
        let pale = Colour::from(PALE_YELLOW);
        assert_eq!(resolve_tint(QrTint::Custom(pale), None), QrColours::default());

        let navy = Colour::from(NAVY);
        assert_eq!(resolve_tint(QrTint::Custom(navy), None).dark, navy);

        // just under the limit
        let edge = Colour::new_rgb_bytes(100, 100, 100);
        assert!(edge.brightness() <= MAX_DARK_BRIGHTNESS);
        assert_eq!(resolve_tint(QrTint::Custom(edge), None).dark, edge);
    }

    #[test]
    fn keeps_a_dark_enough_vibrant() {
        let palette = Palette {
            vibrant: swatch(CRIMSON),
            dark_vibrant: swatch(NAVY),
            ..Default::default()
        };
        assert_eq!(choose_dark_colour(&palette), Colour::from(CRIMSON));
    }

    #[test]
    fn light_vibrant_is_replaced_by_dark_vibrant() {
        let palette = Palette {
            vibrant: swatch(PALE_YELLOW),
            dark_vibrant: swatch(NAVY),
            muted: swatch(SAND),
            ..Default::default()
        };
        let dark = choose_dark_colour(&palette);
        assert_ne!(dark, Colour::from(PALE_YELLOW));
        assert_eq!(dark, Colour::from(NAVY));
    }

    #[test]
    fn too_light_muted_falls_back_to_black() {
        let palette = Palette {
            vibrant: swatch(PALE_YELLOW),
            muted: swatch(SAND),
            ..Default::default()
        };
        assert_eq!(choose_dark_colour(&palette), colours::BLACK);
    }

    #[test]
    fn missing_vibrant_uses_substitutes() {
        let palette = Palette {
            muted: swatch(CRIMSON),
            ..Default::default()
        };
        assert_eq!(choose_dark_colour(&palette), Colour::from(CRIMSON));
        assert_eq!(choose_dark_colour(&Palette::default()), colours::BLACK);
    }

    #[test]
    fn substituted_colours_are_always_dark() {
        let shades = [PALE_YELLOW, NAVY, SAND, CRIMSON, [255, 255, 255], [0, 0, 0]];
        for vibrant in shades {
            for dark_vibrant in shades {
                for muted in shades {
                    let palette = Palette {
                        vibrant: swatch(vibrant),
                        dark_vibrant: swatch(dark_vibrant),
                        muted: swatch(muted),
                        ..Default::default()
                    };
                    let chosen = choose_dark_colour(&palette);
                    if Colour::from(vibrant).brightness() > MAX_VIBRANT_BRIGHTNESS {
                        assert_ne!(chosen, Colour::from(vibrant));
                        assert!(chosen.brightness() <= MAX_DARK_BRIGHTNESS);
                    }
                }
            }
        }
    }

    #[test]
    fn unreadable_photo_means_black_on_white() {
        let blank = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
        assert_eq!(colours_from_photo(&blank), QrColours::default());
        assert_eq!(resolve_tint(QrTint::FromPhoto, None), QrColours::default());
    }

    #[test]
    fn recolours_by_luma() {
        let mut bitmap = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        bitmap.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        let colours = QrColours {
            dark: Colour::from(NAVY),
            light: colours::WHITE,
        };
        let out = recolour(&DynamicImage::ImageRgba8(bitmap), colours);
        assert_eq!(out.get_pixel(0, 0).0, [20, 30, 90, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn payload_renders_with_quiet_zone() {
        let img = render_payload("https://example.com/m/jane-doe", QrColours::default())
            .expect("encodes");
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % MODULE_PIXELS, 0);
        // quiet zone is light, the finder pattern corner is dark
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        let corner = QUIET_ZONE * MODULE_PIXELS;
        assert_eq!(img.get_pixel(corner, corner).0, [0, 0, 0, 255]);
    }
}
