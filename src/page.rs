use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::geometry::Zones;
use crate::image::Image;
use crate::layout::{align_x, Align, TextMeasure};
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::ComposeError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::collections::BTreeSet;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single run of text drawn from a baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Baseline start in page coordinates
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    /// Where the whole image lands. With cover fitting this overhangs the
    /// frame and `clip` trims it back.
    pub position: Rect,
    pub clip: Option<Rect>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FillLayout {
    pub rect: Rect,
    pub colour: Colour,
    pub opacity: f32,
}

/// A colour stop in a vertical gradient. Offset 0 is the bottom of the
/// gradient's rectangle and 1 the top.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: f32,
    pub colour: Colour,
    pub opacity: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct GradientLayout {
    pub rect: Rect,
    pub stops: Vec<GradientStop>,
}

impl GradientLayout {
    /// Colour and opacity at `t` in 0..=1 from the bottom edge
    pub fn sample(&self, t: f32) -> (Colour, f32) {
        let t = t.clamp(0.0, 1.0);
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return (crate::colours::BLACK, 0.0);
        };
        if t <= first.offset {
            return (first.colour, first.opacity);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return (a.colour.lerp(b.colour, f), a.opacity + (b.opacity - a.opacity) * f);
            }
        }
        (last.colour, last.opacity)
    }
}

/// Everything that can be drawn on a page, in paint order
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Fill(FillLayout),
    Gradient(GradientLayout),
}

/// Number of flat bands a gradient is split into in PDF output
pub(crate) const GRADIENT_BANDS: usize = 48;

/// Opacities are quantized to thousandths so that equal opacities share one
/// graphics state
pub(crate) fn opacity_key(opacity: f32) -> u16 {
    (opacity.clamp(0.0, 1.0) * 1000.0).round() as u16
}

/// A single page: its boxes and an ordered display list
pub struct Page {
    /// The full bleed canvas
    pub media_box: Rect,
    /// The finished size after cutting
    pub trim_box: Rect,
    /// Where important content must live
    pub art_box: Rect,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(zones: &Zones) -> Page {
        Page {
            media_box: zones.canvas,
            trim_box: zones.trim,
            art_box: zones.safe,
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(vec![span]));
    }

    /// Add a single line of text aligned within `bounds` with its baseline at
    /// `baseline`. Returns the rendered width of the line.
    #[allow(clippy::too_many_arguments)]
    pub fn add_line(
        &mut self,
        text: &str,
        font: (Id<Font>, &Font),
        size: Pt,
        colour: Colour,
        bounds: &Rect,
        baseline: Pt,
        align: Align,
    ) -> Pt {
        let width = font.1.measure(text, size);
        let x = align_x(width, bounds, align);
        self.add_span(SpanLayout {
            text: text.to_string(),
            font: SpanFont { id: font.0, size },
            colour,
            coords: (x, baseline),
        });
        width
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_fill(&mut self, rect: Rect, colour: Colour, opacity: f32) {
        self.contents.push(PageContents::Fill(FillLayout {
            rect,
            colour,
            opacity: opacity.clamp(0.0, 1.0),
        }));
    }

    pub fn add_gradient(&mut self, rect: Rect, stops: Vec<GradientStop>) {
        self.contents
            .push(PageContents::Gradient(GradientLayout { rect, stops }));
    }

    /// Every text span on the page, in paint order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Text(spans) => Some(spans.iter()),
                _ => None,
            })
            .flatten()
    }

    /// The translucent opacity levels used on this page, each of which needs
    /// a graphics state in PDF output
    pub(crate) fn opacity_keys(&self) -> BTreeSet<u16> {
        let mut keys = BTreeSet::new();
        for content in self.contents.iter() {
            match content {
                PageContents::Fill(fill) => {
                    keys.insert(opacity_key(fill.opacity));
                }
                PageContents::Gradient(gradient) => {
                    for band in 0..GRADIENT_BANDS {
                        let t = (band as f32 + 0.5) / GRADIENT_BANDS as f32;
                        keys.insert(opacity_key(gradient.sample(t).1));
                    }
                }
                PageContents::Text(_) | PageContents::Image(_) => {}
            }
        }
        keys.retain(|&k| k < 1000);
        keys
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), ComposeError> {
        let opacity_keys = self.opacity_keys();
        for &key in opacity_keys.iter() {
            let id = refs.gen(RefType::GraphicsState(page_index, key as usize));
            writer
                .ext_graphics(id)
                .non_stroking_alpha(key as f32 / 1000.0);
        }

        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(ComposeError::PageMissing)?;
        let page_tree = refs
            .get(RefType::PageTree)
            .ok_or(ComposeError::PageMissing)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.bleed_box(self.media_box.into());
        page.trim_box(self.trim_box.into());
        page.art_box(self.art_box.into());
        page.parent(page_tree);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(i.index())) {
                resource_fonts.pair(Name(format!("F{}", i.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();

        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(i.index())) {
                resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();

        if !opacity_keys.is_empty() {
            let mut states = resources.ext_g_states();
            for &key in opacity_keys.iter() {
                if let Some(state_ref) = refs.get(RefType::GraphicsState(page_index, key as usize))
                {
                    states.pair(Name(format!("GS{key}").as_bytes()), state_ref);
                }
            }
            states.finish();
        }
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents, fonts)?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    fn gradient() -> GradientLayout {
        GradientLayout {
            rect: Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(100.0), Pt(100.0)),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    colour: colours::BLACK,
                    opacity: 0.55,
                },
                GradientStop {
                    offset: 1.0,
                    colour: colours::BLACK,
                    opacity: 0.0,
                },
            ],
        }
    }

    #[test]
    fn gradient_samples_interpolate_opacity() {
        let g = gradient();
        assert_eq!(g.sample(0.0).1, 0.55);
        assert_eq!(g.sample(1.0).1, 0.0);
        assert!((g.sample(0.5).1 - 0.275).abs() < 1e-6);
        assert_eq!(g.sample(-3.0).1, 0.55);
    }

    #[test]
    fn opaque_fills_need_no_graphics_state() {
        let zones = crate::LayoutSpec::from_size(crate::CARD_4X6).resolve();
        let mut page = Page::new(&zones);
        page.add_fill(zones.canvas, colours::DARK_GREY, 1.0);
        assert!(page.opacity_keys().is_empty());

        page.add_fill(zones.canvas, colours::WHITE, 0.35);
        assert_eq!(page.opacity_keys().into_iter().collect::<Vec<_>>(), vec![350]);
    }

    #[test]
    fn gradient_bands_share_graphics_states() {
        let zones = crate::LayoutSpec::from_size(crate::CARD_4X6).resolve();
        let mut page = Page::new(&zones);
        let g = gradient();
        page.add_gradient(g.rect, g.stops.clone());
        page.add_gradient(g.rect, g.stops);
        let keys = page.opacity_keys();
        assert!(keys.len() <= GRADIENT_BANDS);
        assert!(keys.iter().all(|&k| k <= 550));
    }
}
