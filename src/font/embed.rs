//! Embedding TrueType / OpenType faces as CID-keyed Type0 fonts.

use crate::refs::{ObjectReferences, RefType};
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;

/// Glyph id to the first character that maps to it, with the glyph's
/// horizontal advance and height in font units
type GlyphTable = BTreeMap<u16, (char, u16, i16)>;

pub(crate) fn face_name(face: &Face, name_id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == name_id && name.is_unicode())
        .and_then(|name| name.to_string())
}

/// Write the whole font program plus the Type0 / CIDFont / descriptor /
/// ToUnicode objects referring to it
pub(crate) fn write_type0(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let glyphs = glyph_table(face.as_face_ref());

    let font_id = refs.gen(RefType::Font(font_index));
    let cid_font_id = write_cid(face, &glyphs, refs, font_index, writer);
    let to_unicode_id = write_to_unicode(&glyphs, refs, font_index, writer);

    let mut font = writer.type0_font(font_id);
    font.base_font(Name(format!("F{font_index}").as_bytes()));
    font.encoding_predefined(Name(b"Identity-H"));
    font.descendant_font(cid_font_id);
    font.to_unicode(to_unicode_id);
    font_id
}

fn glyph_table(face: &Face) -> GlyphTable {
    let mut table = GlyphTable::new();
    let Some(cmap) = face.tables().cmap else {
        return table;
    };

    for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
        subtable.codepoints(|codepoint| {
            let Ok(ch) = char::try_from(codepoint) else {
                return;
            };
            let Some(gid) = subtable.glyph_index(codepoint).filter(|g| g.0 > 0) else {
                return;
            };
            if table.contains_key(&gid.0) {
                return;
            }
            if let Some(advance) = face.glyph_hor_advance(gid) {
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                table.insert(gid.0, (ch, advance, height));
            }
        });
    }

    table
}

fn scaling(face: &Face) -> f32 {
    1000.0 / face.units_per_em() as f32
}

fn write_cid(
    face: &OwnedFace,
    glyphs: &GlyphTable,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let descriptor_id = write_descriptor(face, glyphs, refs, font_index, writer);
    let face = face.as_face_ref();
    let scaling = scaling(face);

    let id = refs.gen(RefType::CidFont(font_index));
    let mut cid_font = writer.cid_font(id);
    cid_font.subtype(CidFontType::Type2);
    cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(descriptor_id);

    // most frequent advance becomes the default width
    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    for &(_, advance, _) in glyphs.values() {
        *counts.entry(advance).or_insert(0) += 1;
    }
    let default_width = counts
        .iter()
        .max_by_key(|&(width, count)| (*count, *width))
        .map(|(&width, _)| width as f32 * scaling)
        .unwrap_or(1000.0);

    let mut widths = cid_font.widths();
    widths.consecutive(0, [1000.0]);

    // runs of consecutive glyph ids share one array
    let mut run: Option<(u16, Vec<f32>)> = None;
    for (&gid, &(_, advance, _)) in glyphs.iter() {
        let width = advance as f32 * scaling;
        match run.as_mut() {
            Some((start, run_widths)) if gid as usize == *start as usize + run_widths.len() => {
                run_widths.push(width);
            }
            _ => {
                if let Some((start, run_widths)) = run.take() {
                    widths.consecutive(start, run_widths);
                }
                run = Some((gid, vec![width]));
            }
        }
    }
    if let Some((start, run_widths)) = run {
        widths.consecutive(start, run_widths);
    }
    widths.finish();

    cid_font.default_width(default_width);
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
    id
}

fn write_descriptor(
    face: &OwnedFace,
    glyphs: &GlyphTable,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let data_id = refs.gen(RefType::FontData(font_index));
    writer
        .stream(data_id, face.as_slice())
        .pair(Name(b"Length1"), face.as_slice().len() as i32);

    let face = face.as_face_ref();
    let scaling = scaling(face);

    let max_width = glyphs.values().map(|&(_, w, _)| w).max().unwrap_or_default();
    let max_height = glyphs.values().map(|&(_, _, h)| h).max().unwrap_or_default();
    let sum_width: usize = glyphs.values().map(|&(_, w, _)| w as usize).sum();
    let avg_width = if glyphs.is_empty() {
        0.0
    } else {
        sum_width as f32 / glyphs.len() as f32
    };

    let name = face_name(face, owned_ttf_parser::name_id::FULL_NAME)
        .unwrap_or_else(|| format!("F{font_index}"));
    let family = face_name(face, owned_ttf_parser::name_id::FAMILY).unwrap_or_else(|| name.clone());

    let id = refs.gen(RefType::FontDescriptor(font_index));
    let mut descriptor = writer.font_descriptor(id);
    descriptor.name(Name(name.replace(' ', "").as_bytes()));
    descriptor.family(Str(family.as_bytes()));
    descriptor.weight(face.weight().to_number());

    let mut flags = FontFlags::NON_SYMBOLIC;
    if face.is_monospaced() {
        flags.insert(FontFlags::FIXED_PITCH);
    }
    if face.is_italic() {
        flags.insert(FontFlags::ITALIC);
    }
    descriptor.flags(flags);

    descriptor.bbox(pdf_writer::Rect::new(
        0.0,
        face.descender() as f32 * scaling,
        max_width as f32 * scaling,
        max_height as f32 * scaling,
    ));
    descriptor.italic_angle(face.italic_angle());
    descriptor.ascent(face.ascender() as f32 * scaling);
    descriptor.descent(face.descender() as f32 * scaling);
    descriptor.leading(face.line_gap() as f32 * scaling);
    let cap_height = face.capital_height().map(|h| h as f32 * scaling).unwrap_or(700.0);
    descriptor.cap_height(cap_height);
    descriptor.x_height(
        face.x_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(cap_height),
    );
    // not exposed by the font tables; a typical regular-weight value
    descriptor.stem_v(80.0);
    descriptor.avg_width(avg_width * scaling);
    descriptor.max_width(max_width as f32 * scaling);
    descriptor.missing_width(max_width as f32 * scaling);
    descriptor.font_file2(data_id);
    id
}

fn write_to_unicode(
    glyphs: &GlyphTable,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::ToUnicode(font_index));

    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    // bfchar blocks hold at most 100 entries sharing a high byte
    let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
    let mut current: Vec<(u16, char)> = Vec::new();
    let mut high_byte: u8 = 0;
    for (&gid, &(ch, _, _)) in glyphs.iter() {
        if (gid >> 8) as u8 != high_byte || current.len() >= 100 {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            high_byte = (gid >> 8) as u8;
        }
        current.push((gid, ch));
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    for block in blocks {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, ch) in block {
            let mut utf16 = [0u16; 2];
            let units: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|u| format!("{u:04x}"))
                .collect();
            map.push_str(&format!("<{gid:04x}> <{units}>\n"));
        }
        map.push_str("endbfchar\n");
    }
    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
        map.as_bytes(),
        miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
    );
    writer
        .stream(id, compressed.as_slice())
        .filter(Filter::FlateDecode);
    id
}
