//! Rasterization of a [Document] page into pixels.
//!
//! Pages are laid out in points with a bottom-left origin; a single base
//! transform scales them by `dpi / 72` and flips the y axis, after which every
//! display list item is drawn in page coordinates.

use crate::colour::Colour;
use crate::document::Document;
use crate::font::Font;
use crate::image::Image;
use crate::page::{FillLayout, GradientLayout, ImageLayout, PageContents, SpanLayout};
use crate::rect::Rect;
use crate::units::POINTS_PER_INCH;
use crate::ComposeError;
use owned_ttf_parser::OutlineBuilder;
use std::io::Cursor;
use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Point, SpreadMode, Transform,
};
use tracing::debug;

/// Render a page of `document` at `dpi`. The canvas starts out opaque white.
pub fn render_page(document: &Document, page_index: usize, dpi: f32) -> Result<Pixmap, ComposeError> {
    let page = document.page(page_index).ok_or(ComposeError::PageMissing)?;
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(ComposeError::Raster(format!("invalid raster resolution {dpi} dpi")));
    }

    let scale = dpi / POINTS_PER_INCH;
    let page_width = page.media_box.width().0;
    let page_height = page.media_box.height().0;
    let width_px = (page_width * scale).round() as u32;
    let height_px = (page_height * scale).round() as u32;

    let mut pixmap = Pixmap::new(width_px, height_px).ok_or_else(|| {
        ComposeError::Raster(format!(
            "invalid raster size {width_px}x{height_px} at {dpi} dpi"
        ))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    debug!(width_px, height_px, dpi, "rasterizing page");

    let base = Transform::from_row(
        scale,
        0.0,
        0.0,
        -scale,
        -page.media_box.x1.0 * scale,
        (page_height + page.media_box.y1.0) * scale,
    );

    for content in page.contents.iter() {
        match content {
            PageContents::Fill(fill) => draw_fill(&mut pixmap, fill, base),
            PageContents::Gradient(gradient) => draw_gradient(&mut pixmap, gradient, base),
            PageContents::Image(layout) => {
                let image = document.images.get(layout.image_id).ok_or_else(|| {
                    ComposeError::Raster("image missing from document".to_string())
                })?;
                draw_image(&mut pixmap, image, layout, base)?;
            }
            PageContents::Text(spans) => {
                for span in spans {
                    let font = document.fonts.get(span.font.id).ok_or_else(|| {
                        ComposeError::Raster("font missing from document".to_string())
                    })?;
                    draw_span(&mut pixmap, font, span, base)?;
                }
            }
        }
    }

    Ok(pixmap)
}

/// Render a page and encode it as PNG
pub fn render_png(document: &Document, page_index: usize, dpi: f32) -> Result<Vec<u8>, ComposeError> {
    let pixmap = render_page(document, page_index, dpi)?;
    encode_png(&pixmap)
}

/// Encode a pixmap as an RGBA PNG
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ComposeError> {
    let mut rgba = image::RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in rgba.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ComposeError::Raster(format!("png encode failed: {e}")))?;
    Ok(out.into_inner())
}

fn sk_rect(rect: &Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.x1.0, rect.y1.0, rect.x2.0, rect.y2.0)
}

fn to_sk_color(colour: Colour, opacity: f32) -> tiny_skia::Color {
    let (r, g, b) = colour.to_rgb();
    tiny_skia::Color::from_rgba(
        r.clamp(0.0, 1.0),
        g.clamp(0.0, 1.0),
        b.clamp(0.0, 1.0),
        opacity.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

fn draw_fill(pixmap: &mut Pixmap, fill: &FillLayout, base: Transform) {
    let Some(rect) = sk_rect(&fill.rect) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(to_sk_color(fill.colour, fill.opacity));
    paint.anti_alias = true;
    pixmap.fill_rect(rect, &paint, base, None);
}

fn draw_gradient(pixmap: &mut Pixmap, gradient: &GradientLayout, base: Transform) {
    let Some(rect) = sk_rect(&gradient.rect) else {
        return;
    };
    let stops: Vec<GradientStop> = gradient
        .stops
        .iter()
        .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), to_sk_color(s.colour, s.opacity)))
        .collect();
    let start = Point::from_xy(rect.left(), rect.top());
    let end = Point::from_xy(rect.left(), rect.bottom());

    let mut paint = Paint::default();
    paint.anti_alias = true;
    match LinearGradient::new(start, end, stops, SpreadMode::Pad, Transform::identity()) {
        Some(shader) => paint.shader = shader,
        // a single stop, or coincident points: flat colour
        None => {
            let (colour, opacity) = gradient.sample(0.0);
            paint.set_color(to_sk_color(colour, opacity));
        }
    }
    pixmap.fill_rect(rect, &paint, base, None);
}

fn image_pixmap(image: &Image) -> Result<Pixmap, ComposeError> {
    let rgba = image.pixels().to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        ComposeError::Raster(format!("invalid image size {width}x{height}"))
    })?;
    for (src, dst) in rgba
        .as_raw()
        .chunks_exact(4)
        .zip(pixmap.data_mut().chunks_exact_mut(4))
    {
        let a = src[3];
        dst[0] = premul_u8(src[0], a);
        dst[1] = premul_u8(src[1], a);
        dst[2] = premul_u8(src[2], a);
        dst[3] = a;
    }
    Ok(pixmap)
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

fn draw_image(
    pixmap: &mut Pixmap,
    image: &Image,
    layout: &ImageLayout,
    base: Transform,
) -> Result<(), ComposeError> {
    let source = image_pixmap(image)?;
    let src_w = source.width() as f32;
    let src_h = source.height() as f32;

    // source row 0 is the visual top, so it lands on the top edge of `position`
    let position = &layout.position;
    let image_ts = Transform::from_row(
        position.width().0 / src_w,
        0.0,
        0.0,
        -position.height().0 / src_h,
        position.x1.0,
        position.y2.0,
    );

    let clip = match &layout.clip {
        Some(clip) => {
            let Some(rect) = sk_rect(clip) else {
                return Ok(());
            };
            let mut mask = Mask::new(pixmap.width(), pixmap.height())
                .ok_or_else(|| ComposeError::Raster("cannot allocate clip mask".to_string()))?;
            mask.fill_path(&PathBuilder::from_rect(rect), FillRule::Winding, true, base);
            Some(mask)
        }
        None => None,
    };

    let mut paint = PixmapPaint::default();
    paint.quality = if image.is_smooth() {
        FilterQuality::Bilinear
    } else {
        FilterQuality::Nearest
    };
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        base.pre_concat(image_ts),
        clip.as_ref(),
    );
    Ok(())
}

struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y + y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Glyph outlines are placed in page coordinates, so the page's y-up
/// orientation matches the font's
fn draw_span(
    pixmap: &mut Pixmap,
    font: &Font,
    span: &SpanLayout,
    base: Transform,
) -> Result<(), ComposeError> {
    let mut builder = GlyphPathBuilder {
        builder: PathBuilder::new(),
        origin_x: span.coords.0 .0,
        origin_y: span.coords.1 .0,
        scale: span.font.size.0 / font.units_per_em(),
    };

    for ch in span.text.chars() {
        let advance = font.outline_char(ch, &mut builder)?;
        builder.origin_x += advance * builder.scale;
    }

    let Some(path) = builder.builder.finish() else {
        // whitespace only
        return Ok(());
    };

    let mut paint = Paint::default();
    paint.set_color(to_sk_color(span.colour, 1.0));
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, base, None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{GradientStop as Stop, Page};
    use crate::{colours, LayoutSpec, Pt, ACRYLIC_6X6};

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).expect("in bounds").demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn blank_document() -> (Document, crate::Zones) {
        let zones = LayoutSpec::from_size(ACRYLIC_6X6).resolve();
        let mut doc = Document::default();
        doc.add_page(Page::new(&zones));
        (doc, zones)
    }

    #[test]
    fn canvas_matches_bleed_size_at_resolution() {
        let (doc, _) = blank_document();
        let pixmap = render_page(&doc, 0, 300.0).expect("renders");
        // 6.25in at 300dpi
        assert_eq!((pixmap.width(), pixmap.height()), (1875, 1875));
        assert_eq!(pixel(&pixmap, 10, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn fills_use_a_bottom_left_origin() {
        let (mut doc, zones) = blank_document();
        let page_id = doc.id_of_page_index(0).unwrap();
        let bottom = Rect::from_xywh(Pt(0.0), Pt(0.0), zones.canvas.width(), Pt(72.0));
        doc.pages[page_id].add_fill(bottom, colours::BLACK, 1.0);

        let pixmap = render_page(&doc, 0, 72.0).expect("renders");
        let h = pixmap.height();
        assert_eq!(pixel(&pixmap, 5, h - 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn gradient_fades_upwards() {
        let (mut doc, zones) = blank_document();
        let page_id = doc.id_of_page_index(0).unwrap();
        doc.pages[page_id].add_gradient(
            zones.canvas,
            vec![
                Stop {
                    offset: 0.0,
                    colour: colours::BLACK,
                    opacity: 1.0,
                },
                Stop {
                    offset: 1.0,
                    colour: colours::BLACK,
                    opacity: 0.0,
                },
            ],
        );
        let pixmap = render_page(&doc, 0, 72.0).expect("renders");
        let h = pixmap.height();
        let low = pixel(&pixmap, 50, h - 2)[0];
        let mid = pixel(&pixmap, 50, h / 2)[0];
        let high = pixel(&pixmap, 50, 1)[0];
        assert!(low < mid && mid < high, "{low} {mid} {high}");
    }

    #[test]
    fn standard_fonts_cannot_be_rasterized() {
        let (mut doc, zones) = blank_document();
        let font = doc.add_font(Font::standard(crate::StandardFont::Helvetica));
        let page_id = doc.id_of_page_index(0).unwrap();
        doc.pages[page_id].add_line(
            "Jane",
            (font, &Font::standard(crate::StandardFont::Helvetica)),
            Pt(12.0),
            colours::BLACK,
            &zones.safe,
            zones.safe.y1,
            crate::layout::Align::Left,
        );
        assert!(matches!(
            render_page(&doc, 0, 72.0),
            Err(ComposeError::UnsupportedFont(_))
        ));
    }

    #[test]
    fn png_round_trips_dimensions() {
        let (doc, _) = blank_document();
        let png = render_png(&doc, 0, 36.0).expect("renders");
        let decoded = image::load_from_memory(&png).expect("valid png");
        assert_eq!((decoded.width(), decoded.height()), (225, 225));
    }
}
