mod embed;
mod standard;

pub use standard::StandardFont;

use crate::layout::TextMeasure;
use crate::refs::{ObjectReferences, RefType};
use crate::{ComposeError, Pt};
use owned_ttf_parser::{AsFaceRef, GlyphId, OutlineBuilder, OwnedFace};
use pdf_writer::{Name, Pdf};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A font that text can be measured with and drawn in.
///
/// Fonts come in two flavours:
///
/// * one of the PDF [standard fonts](StandardFont), which every PDF viewer
///   ships with. These are referenced by name and are never embedded, so
///   they cost nothing in the output, but there are no outlines available to
///   draw them into raster output.
/// * a parsed TrueType / OpenType face. These are embedded in their entirety
///   into PDF output and their outlines are used for raster output.
///
/// Fonts are cheap to clone; the parsed face is shared.
#[derive(Clone)]
pub struct Font {
    source: FontSource,
}

#[derive(Clone)]
enum FontSource {
    Standard(StandardFont),
    TrueType(Arc<OwnedFace>),
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Font").field(&self.name()).finish()
    }
}

impl Font {
    pub fn standard(font: StandardFont) -> Font {
        Font {
            source: FontSource::Standard(font),
        }
    }

    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ComposeError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font {
            source: FontSource::TrueType(Arc::new(face)),
        })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Font, ComposeError> {
        let bytes = std::fs::read(path)?;
        Font::load(bytes)
    }

    /// Whether this is a standard font, which has no outlines
    pub fn is_standard(&self) -> bool {
        matches!(self.source, FontSource::Standard(_))
    }

    /// The full name of the font
    pub fn name(&self) -> String {
        match &self.source {
            FontSource::Standard(font) => font.base_name().to_string(),
            FontSource::TrueType(face) => {
                embed::face_name(face.as_face_ref(), owned_ttf_parser::name_id::FULL_NAME)
                    .unwrap_or_else(|| "Unnamed".to_string())
            }
        }
    }

    pub(crate) fn units_per_em(&self) -> f32 {
        match &self.source {
            FontSource::Standard(_) => 1000.0,
            FontSource::TrueType(face) => face.as_face_ref().units_per_em() as f32,
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        let ascender = match &self.source {
            FontSource::Standard(font) => font.ascender(),
            FontSource::TrueType(face) => face.as_face_ref().ascender() as f32,
        };
        size * (ascender / self.units_per_em())
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        let descender = match &self.source {
            FontSource::Standard(font) => font.descender(),
            FontSource::TrueType(face) => face.as_face_ref().descender() as f32,
        };
        size * (descender / self.units_per_em())
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Pt) -> Pt {
        let gap = match &self.source {
            FontSource::Standard(_) => 0.0,
            FontSource::TrueType(face) => face.as_face_ref().line_gap() as f32,
        };
        size * (gap / self.units_per_em()) + self.ascent(size) - self.descent(size)
    }

    /// Glyph used to draw `ch`, falling back to the replacement character and
    /// then `?` for characters the face doesn't cover
    fn truetype_glyph(face: &OwnedFace, ch: char) -> GlyphId {
        let face = face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    /// Calculate the width of a run of text at the given size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let units: f32 = match &self.source {
            FontSource::Standard(font) => text.chars().map(|ch| font.char_width(ch) as f32).sum(),
            FontSource::TrueType(face) => text
                .chars()
                .map(|ch| {
                    face.as_face_ref()
                        .glyph_hor_advance(Self::truetype_glyph(face, ch))
                        .unwrap_or_default() as f32
                })
                .sum(),
        };
        size * (units / self.units_per_em())
    }

    /// Encode text into the byte string shown by a `Tj` operator with this font
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.source {
            FontSource::Standard(font) => font.encode(text),
            FontSource::TrueType(face) => text
                .chars()
                .flat_map(|ch| Self::truetype_glyph(face, ch).0.to_be_bytes())
                .collect(),
        }
    }

    /// Feed the outline of `ch` into `builder` in font units, returning the
    /// horizontal advance in font units.
    ///
    /// Standard fonts have no outlines and return [ComposeError::UnsupportedFont].
    pub(crate) fn outline_char(
        &self,
        ch: char,
        builder: &mut dyn OutlineBuilder,
    ) -> Result<f32, ComposeError> {
        match &self.source {
            FontSource::Standard(font) => Err(ComposeError::UnsupportedFont(format!(
                "{} has no outlines for raster output; configure a TrueType font",
                font.base_name()
            ))),
            FontSource::TrueType(face) => {
                let gid = Self::truetype_glyph(face, ch);
                let face = face.as_face_ref();
                // whitespace has no outline, which is fine
                let _ = face.outline_glyph(gid, builder);
                Ok(face.glyph_hor_advance(gid).unwrap_or_default() as f32)
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        match &self.source {
            FontSource::Standard(font) => {
                let id = refs.gen(RefType::Font(font_index));
                writer
                    .type1_font(id)
                    .base_font(Name(font.base_name().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontSource::TrueType(face) => {
                embed::write_type0(face, refs, font_index, writer);
            }
        }
    }
}

impl TextMeasure for Font {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        self.width_of_text(text, size)
    }
}
