//! Content stream generation for PDF pages.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{
    opacity_key, FillLayout, GradientLayout, ImageLayout, PageContents, SpanFont, SpanLayout,
    GRADIENT_BANDS,
};
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream, converting the display list
/// into low-level PDF operators. Translucent fills refer to the page's `/GS{n}`
/// graphics states, where `n` is the opacity in thousandths.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    if contents.is_empty() {
        return Ok(Vec::default());
    }

    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                render_image(&mut content, image)?;
            }
            PageContents::Fill(fill) => {
                render_fill(&mut content, fill)?;
            }
            PageContents::Gradient(gradient) => {
                render_gradient(&mut content, gradient)?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_image(content: &mut Vec<u8>, image: &ImageLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    if let Some(clip) = &image.clip {
        write_rect(content, clip)?;
        write!(content, "W n\n")?;
    }
    write!(
        content,
        "{} 0 0 {} {} {} cm\n",
        image.position.width().0,
        image.position.height().0,
        image.position.x1.0,
        image.position.y1.0
    )?;
    write!(content, "/I{} Do\n", image.image_id.index())?;
    write!(content, "Q\n")
}

#[allow(clippy::write_with_newline)]
fn render_fill(content: &mut Vec<u8>, fill: &FillLayout) -> Result<(), std::io::Error> {
    render_flat(content, &fill.rect, fill.colour, fill.opacity)
}

/// Vertical gradients are drawn as abutting flat bands, each with the
/// colour and opacity sampled at its middle
fn render_gradient(content: &mut Vec<u8>, gradient: &GradientLayout) -> Result<(), std::io::Error> {
    let band_height = gradient.rect.height() / GRADIENT_BANDS as f32;
    for band in 0..GRADIENT_BANDS {
        let t = (band as f32 + 0.5) / GRADIENT_BANDS as f32;
        let (colour, opacity) = gradient.sample(t);
        if opacity_key(opacity) == 0 {
            continue;
        }
        let y1 = gradient.rect.y1 + band_height * band as f32;
        let rect = Rect {
            x1: gradient.rect.x1,
            y1,
            x2: gradient.rect.x2,
            y2: y1 + band_height,
        };
        render_flat(content, &rect, colour, opacity)?;
    }
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_flat(
    content: &mut Vec<u8>,
    rect: &Rect,
    colour: Colour,
    opacity: f32,
) -> Result<(), std::io::Error> {
    let key = opacity_key(opacity);
    if key == 0 {
        return Ok(());
    }

    write!(content, "q\n")?;
    if key < 1000 {
        write!(content, "/GS{key} gs\n")?;
    }
    write_colour(content, colour)?;
    write_rect(content, rect)?;
    write!(content, "f\n")?;
    write!(content, "Q\n")
}

#[allow(clippy::write_with_newline)]
fn write_rect(content: &mut Vec<u8>, rect: &Rect) -> Result<(), std::io::Error> {
    write!(
        content,
        "{} {} {} {} re\n",
        rect.x1.0,
        rect.y1.0,
        rect.width().0,
        rect.height().0
    )
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;
    write_font(content, current_font)?;
    write_colour(content, current_colour)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write_font(content, current_font)?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_colour(content, current_colour)?;
        }

        let Some(font) = fonts.get(current_font.id) else {
            continue;
        };

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0 .0, span.coords.1 .0)?;
        write!(content, "<")?;
        for byte in font.encode(&span.text) {
            write!(content, "{byte:02x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_font(content: &mut Vec<u8>, font: SpanFont) -> Result<(), std::io::Error> {
    let SpanFont { id, size: Pt(size) } = font;
    write!(content, "/F{} {size} Tf\n", id.index())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::font::StandardFont;
    use crate::page::GradientStop;

    fn rect() -> Rect {
        Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(100.0), Pt(50.0))
    }

    #[test]
    fn translucent_fill_uses_graphics_state() {
        let fonts = Arena::new();
        let contents = vec![PageContents::Fill(FillLayout {
            rect: rect(),
            colour: colours::WHITE,
            opacity: 0.35,
        })];
        let rendered = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert_eq!(rendered, "q\n/GS350 gs\n1 g\n0 0 100 50 re\nf\nQ\n");
    }

    #[test]
    fn invisible_gradient_bands_are_skipped() {
        let fonts = Arena::new();
        let contents = vec![PageContents::Gradient(GradientLayout {
            rect: rect(),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    colour: colours::BLACK,
                    opacity: 0.0,
                },
                GradientStop {
                    offset: 1.0,
                    colour: colours::BLACK,
                    opacity: 0.0,
                },
            ],
        })];
        assert!(render_contents(&contents, &fonts).unwrap().is_empty());
    }

    #[test]
    fn standard_font_text_is_win_ansi_hex() {
        let mut fonts = Arena::new();
        let id = fonts.alloc(Font::standard(StandardFont::Helvetica));
        let contents = vec![PageContents::Text(vec![SpanLayout {
            text: "Año".into(),
            font: SpanFont { id, size: Pt(9.0) },
            colour: colours::BLACK,
            coords: (Pt(10.0), Pt(20.0)),
        }])];
        let rendered = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert!(rendered.contains("/F0 9 Tf\n"));
        assert!(rendered.contains("10 20 Td\n<41f16f> Tj\n"));
    }

    #[test]
    fn clipped_images_set_a_clip_path_first() {
        let fonts = Arena::new();
        let mut images: Arena<crate::Image> = Arena::new();
        let image_id = images.alloc(crate::Image::from_rgba(image::RgbaImage::new(2, 2)));
        let contents = vec![PageContents::Image(ImageLayout {
            image_id,
            position: Rect::from_xywh(Pt(-10.0), Pt(0.0), Pt(120.0), Pt(50.0)),
            clip: Some(rect()),
        })];
        let rendered = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert_eq!(rendered, "q\n0 0 100 50 re\nW n\n120 0 0 50 -10 0 cm\n/I0 Do\nQ\n");
    }
}
