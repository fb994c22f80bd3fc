//! Product layouts and the [Compositor] that turns a [ComposeRequest] into a
//! finished document.
//!
//! Every product is laid out in points on a 72 dpi [Zones] grid and ends up
//! as a one-page [Document]. That display list is then written as PDF or
//! flattened into a PNG, depending on the request's [OutputFormat].
//!
//! ```
//! use keepsake::{ComposeConfig, ComposeRequest, Compositor, Product, QrInput};
//!
//! let compositor = Compositor::new(ComposeConfig::default()).unwrap();
//! let mut request = ComposeRequest::new(Product::CardBack)
//!     .with_qr(QrInput::Payload("https://example.com/m/jane".into()));
//! request.fields.sunrise = "March 2, 1941".into();
//! request.fields.sunset = "June 9, 2024".into();
//!
//! let pdf = compositor.compose(&request).unwrap();
//! assert!(pdf.starts_with(b"%PDF-"));
//! ```

mod acrylic;
mod card_back;
mod card_front;
mod poster;

pub use card_back::{PASSAGE_LINE_HEIGHT, PASSAGE_PAD, PASSAGE_REGION_HEIGHT, PASSAGE_SIZE};

use crate::colour::Colour;
use crate::config::ComposeConfig;
use crate::document::Document;
use crate::fallback::Attempt;
use crate::font::{Font, StandardFont};
use crate::geometry::{Zones, RASTER_DPI, VECTOR_DPI};
use crate::image::{Asset, Image};
use crate::info::Info;
use crate::layout::{fit_image, shrink_to_fit, Align, FitMode, TextMeasure};
use crate::page::{GradientStop, ImageLayout, Page};
use crate::pagesize::{TrimSize, ACRYLIC_6X6, CARD_4X6, POSTER_20X30};
use crate::passages::Language;
use crate::qr::{build_qr_image, colours_from_photo, resolve_tint, QrColours, QrInput, QrTint};
use crate::rect::Rect;
use crate::units::Pt;
use crate::{raster, ComposeError};
use chrono::NaiveDateTime;
use id_arena::Id;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const MAX_NAME_CHARS: usize = 80;
const MAX_DATE_CHARS: usize = 40;
const MAX_FOOTER_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    CardFront,
    CardBack,
    Poster,
    /// Artwork for a square acrylic photo block
    Acrylic,
}

impl Product {
    pub fn trim_size(self) -> TrimSize {
        match self {
            Product::CardFront | Product::CardBack => CARD_4X6,
            Product::Poster => POSTER_20X30,
            Product::Acrylic => ACRYLIC_6X6,
        }
    }

    /// Acrylic blocks are printed from a raster; everything else is vector
    pub fn default_output(self) -> OutputFormat {
        match self {
            Product::Acrylic => OutputFormat::Png { dpi: RASTER_DPI },
            _ => OutputFormat::Pdf,
        }
    }

    pub fn default_qr_tint(self) -> QrTint {
        match self {
            Product::Acrylic => QrTint::FromPhoto,
            _ => QrTint::Black,
        }
    }

    /// Whether the layout can't be produced without a QR code
    pub fn requires_qr(self) -> bool {
        matches!(self, Product::CardBack | Product::Poster)
    }

    fn title(self) -> &'static str {
        match self {
            Product::CardFront => "Memorial card (front)",
            Product::CardBack => "Memorial card (back)",
            Product::Poster => "Memorial poster",
            Product::Acrylic => "Acrylic photo block",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Png { dpi: f32 },
}

/// Text printed on a product. Empty strings are left off the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFields {
    pub name: String,
    pub sunrise: String,
    pub sunset: String,
    /// Custom passage text. Takes precedence over `passage_index`.
    pub passage: Option<String>,
    /// Index into the language's preset passages, defaulting to the first
    pub passage_index: Option<usize>,
    /// Title printed above a custom passage
    pub passage_title: Option<String>,
    pub attribution: String,
    pub counselor_name: String,
    pub counselor_phone: String,
    pub language: Language,
}

impl TextFields {
    /// The passage to print as `(title, text)`
    pub fn resolved_passage(&self) -> Result<(&str, &str), ComposeError> {
        if let Some(text) = self.passage.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok((self.passage_title.as_deref().unwrap_or_default(), text));
        }

        let index = self.passage_index.unwrap_or(0);
        let preset = self
            .language
            .passage(index)
            .ok_or(ComposeError::UnknownPassage(index))?;
        let title = self.passage_title.as_deref().unwrap_or(preset.title);
        Ok((title, preset.text))
    }

    /// Sunrise and sunset joined with an en dash, or whichever one is present
    pub fn date_range(&self) -> String {
        match (self.sunrise.trim(), self.sunset.trim()) {
            ("", "") => String::new(),
            (date, "") | ("", date) => date.to_string(),
            (sunrise, sunset) => format!("{sunrise} \u{2013} {sunset}"),
        }
    }

    /// Counselor name and phone on one line
    pub fn counselor_line(&self) -> String {
        match (self.counselor_name.trim(), self.counselor_phone.trim()) {
            ("", "") => String::new(),
            (part, "") | ("", part) => part.to_string(),
            (name, phone) => format!("{name} \u{00B7} {phone}"),
        }
    }

    fn check_lengths(&self) -> Result<(), ComposeError> {
        let counselor = self.counselor_line();
        let limits = [
            ("name", self.name.as_str(), MAX_NAME_CHARS),
            ("sunrise", self.sunrise.as_str(), MAX_DATE_CHARS),
            ("sunset", self.sunset.as_str(), MAX_DATE_CHARS),
            ("attribution", self.attribution.as_str(), MAX_FOOTER_CHARS),
            ("counselor", counselor.as_str(), MAX_FOOTER_CHARS),
        ];
        for (field, value, limit) in limits {
            let chars = value.chars().count();
            if chars > limit {
                return Err(ComposeError::TextOverflowRisk(format!(
                    "{field} is {chars} characters, at most {limit} fit"
                )));
            }
        }
        Ok(())
    }
}

/// Everything needed to compose one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeRequest {
    pub product: Product,
    pub photo: Option<Asset>,
    /// Sky image for card backs, or a mockup backdrop used when there is no
    /// photo
    pub background: Option<Asset>,
    pub qr: Option<QrInput>,
    pub fields: TextFields,
    pub output: OutputFormat,
    /// Overrides the product's default QR tint
    pub qr_tint: Option<QrTint>,
    /// Written as the document's creation date. Output never reads the
    /// clock, so unset means no date.
    pub created: Option<NaiveDateTime>,
}

impl ComposeRequest {
    pub fn new(product: Product) -> ComposeRequest {
        ComposeRequest {
            product,
            photo: None,
            background: None,
            qr: None,
            fields: TextFields::default(),
            output: product.default_output(),
            qr_tint: None,
            created: None,
        }
    }

    pub fn with_photo(mut self, photo: Asset) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn with_background(mut self, background: Asset) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_qr(mut self, qr: QrInput) -> Self {
        self.qr = Some(qr);
        self
    }

    pub fn with_fields(mut self, fields: TextFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_qr_tint(mut self, tint: QrTint) -> Self {
        self.qr_tint = Some(tint);
        self
    }

    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    pub fn qr_tint(&self) -> QrTint {
        self.qr_tint.unwrap_or(self.product.default_qr_tint())
    }

    /// Pre-generation checks against the default configuration
    pub fn validate(&self) -> Result<(), ComposeError> {
        self.validate_with(&ComposeConfig::default())
    }

    /// Checks that don't need fonts: field lengths, passage budgets, required
    /// assets and the output resolution. [Compositor::validate] adds the
    /// checks that measure text.
    pub fn validate_with(&self, config: &ComposeConfig) -> Result<(), ComposeError> {
        if self.product.requires_qr() && self.qr.is_none() {
            return Err(ComposeError::MissingRequiredAsset("qr"));
        }
        if let OutputFormat::Png { dpi } = self.output {
            if !(dpi.is_finite() && dpi > 0.0) {
                return Err(ComposeError::InvalidLayout(format!(
                    "raster output needs a positive dpi, got {dpi}"
                )));
            }
        }
        self.fields.check_lengths()?;

        if self.product == Product::CardBack {
            let (_, text) = self.fields.resolved_passage()?;
            let chars = text.chars().count();
            if chars > config.hard_passage_budget {
                return Err(ComposeError::TextOverflowRisk(format!(
                    "passage is {chars} characters, the limit is {}",
                    config.hard_passage_budget
                )));
            }
            if chars > config.soft_passage_budget {
                warn!(
                    chars,
                    budget = config.soft_passage_budget,
                    "passage is over the recommended length"
                );
            }
        }
        Ok(())
    }

    /// The QR image to place, in the colours the request's tint resolves to.
    /// `photo` is the already decoded photo, if the layout has one.
    pub(crate) fn qr_image(&self, photo: Option<&Image>) -> Result<Option<Image>, ComposeError> {
        let Some(input) = &self.qr else {
            return Ok(None);
        };

        let colours = match (self.qr_tint(), photo, &self.photo) {
            (QrTint::FromPhoto, Some(photo), _) => colours_from_photo(photo.pixels()),
            (QrTint::FromPhoto, None, Some(asset)) => match asset.decode("photo") {
                Ok(photo) => colours_from_photo(photo.pixels()),
                Err(error) => {
                    warn!(%error, "cannot tint qr from photo, using black on white");
                    QrColours::default()
                }
            },
            (tint, _, _) => resolve_tint(tint, None),
        };
        build_qr_image(input, colours).map(Some)
    }

    fn info(&self) -> Info {
        let title = match self.fields.name.trim() {
            "" => self.product.title().to_string(),
            name => format!("{} - {name}", self.product.title()),
        };
        let info = Info::new()
            .with_title(title)
            .with_subject("Memorial")
            .with_keyword(self.fields.name.trim())
            .with_keyword(self.fields.date_range());
        match self.created {
            Some(created) => info.with_created(created),
            None => info,
        }
    }
}

/// The faces text is set in
#[derive(Debug, Clone)]
pub struct FontSet {
    /// Names, titles and labels
    pub heading: Font,
    /// Dates and footers
    pub body: Font,
    /// Passages and the memorial line
    pub passage: Font,
}

impl Default for FontSet {
    /// Standard fonts, which need no embedding but can only be used for PDF
    fn default() -> Self {
        FontSet {
            heading: Font::standard(StandardFont::HelveticaBold),
            body: Font::standard(StandardFont::Helvetica),
            passage: Font::standard(StandardFont::TimesItalic),
        }
    }
}

impl FontSet {
    /// Load the configured TrueType faces, using standard fonts for the rest
    pub fn from_config(config: &ComposeConfig) -> Result<FontSet, ComposeError> {
        let defaults = FontSet::default();
        let load = |path: &Option<std::path::PathBuf>, fallback: Font| match path {
            Some(path) => Font::load_file(path),
            None => Ok(fallback),
        };
        Ok(FontSet {
            heading: load(&config.heading_font, defaults.heading)?,
            body: load(&config.body_font, defaults.body)?,
            passage: load(&config.passage_font, defaults.passage)?,
        })
    }

    pub(crate) fn face(&self, face: Face) -> &Font {
        match face {
            Face::Heading => &self.heading,
            Face::Body => &self.body,
            Face::Passage => &self.passage,
        }
    }

    /// Whether every face can be drawn into raster output
    pub fn has_outlines(&self) -> bool {
        [&self.heading, &self.body, &self.passage]
            .iter()
            .all(|font| !font.is_standard())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Heading,
    Body,
    Passage,
}

impl Face {
    fn config_name(self) -> &'static str {
        match self {
            Face::Heading => "heading_font",
            Face::Body => "body_font",
            Face::Passage => "passage_font",
        }
    }
}

/// What fills a frame when the layout has no photo of its own
pub(crate) enum Backdrop {
    Picture(Image),
    Solid(Colour),
}

/// A fallback step that decodes `asset` when it was supplied. A supplied
/// asset that fails to decode is an error, not a reason to fall through.
pub(crate) fn decode_step<'a>(
    asset: Option<&'a Asset>,
    role: &'static str,
) -> impl FnOnce() -> Result<Attempt<Backdrop>, ComposeError> + 'a {
    move || match asset {
        Some(asset) => Ok(Attempt::Ready(Backdrop::Picture(asset.decode(role)?))),
        None => Ok(Attempt::Next),
    }
}

/// Gradient stops fading `colour` from `opacity` at the bottom to clear at
/// the top
pub(crate) fn fade(colour: Colour, opacity: f32) -> Vec<GradientStop> {
    vec![
        GradientStop {
            offset: 0.0,
            colour,
            opacity,
        },
        GradientStop {
            offset: 1.0,
            colour,
            opacity: 0.0,
        },
    ]
}

/// Sizes the single lines of a layout before anything is drawn. A line that
/// doesn't fit its width even at its smallest size is a
/// [ComposeError::TextOverflowRisk]. Blank lines are skipped, and the faces
/// of the lines that will print are recorded.
pub(crate) struct TextFit<'f> {
    fonts: &'f FontSet,
    used: Vec<Face>,
}

impl<'f> TextFit<'f> {
    pub fn new(fonts: &'f FontSet) -> TextFit<'f> {
        TextFit {
            fonts,
            used: Vec::new(),
        }
    }

    pub fn font(&self, face: Face) -> &'f Font {
        self.fonts.face(face)
    }

    /// The largest size from `largest` down to `smallest`, in steps of
    /// `step`, at which `text` fits `width`
    pub fn shrink(
        &mut self,
        field: &str,
        face: Face,
        text: &str,
        (largest, smallest): (Pt, Pt),
        step: Pt,
        width: Pt,
    ) -> Result<Pt, ComposeError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(largest);
        }
        self.mark(face);
        let font = self.fonts.face(face);
        let size = shrink_to_fit(text, font, largest, smallest, step, width);
        let measured = font.measure(text, size);
        if measured > width {
            return Err(ComposeError::TextOverflowRisk(format!(
                "{field} is {:.1}pt wide at {:.1}pt, only {:.1}pt fits",
                measured.0, size.0, width.0
            )));
        }
        Ok(size)
    }

    /// Check a line that is always set at `size`
    pub fn fixed(
        &mut self,
        field: &str,
        face: Face,
        text: &str,
        size: Pt,
        width: Pt,
    ) -> Result<Pt, ComposeError> {
        self.shrink(field, face, text, (size, size), size, width)
    }

    /// Record that `face` prints something measured elsewhere
    pub fn mark(&mut self, face: Face) {
        if !self.used.contains(&face) {
            self.used.push(face);
        }
    }

    /// Raster output draws glyph outlines, which standard fonts don't have
    pub fn check_outlines(&self) -> Result<(), ComposeError> {
        for face in self.used.iter() {
            let font = self.fonts.face(*face);
            if font.is_standard() {
                return Err(ComposeError::UnsupportedFont(format!(
                    "{} has no outlines for PNG output; configure a TrueType {} font",
                    font.name(),
                    face.config_name()
                )));
            }
        }
        Ok(())
    }
}

/// A page under construction together with the document that will own it
pub(crate) struct Sheet<'f> {
    pub doc: Document,
    pub page: Page,
    pub zones: Zones,
    fonts: &'f FontSet,
    ids: [Id<Font>; 3],
}

impl<'f> Sheet<'f> {
    pub fn new(zones: Zones, fonts: &'f FontSet) -> Sheet<'f> {
        let mut doc = Document::default();
        let ids = [
            doc.add_font(fonts.heading.clone()),
            doc.add_font(fonts.body.clone()),
            doc.add_font(fonts.passage.clone()),
        ];
        Sheet {
            doc,
            page: Page::new(&zones),
            zones,
            fonts,
            ids,
        }
    }

    pub fn font(&self, face: Face) -> &'f Font {
        self.fonts.face(face)
    }

    pub fn fonts(&self) -> &'f FontSet {
        self.fonts
    }

    fn font_id(&self, face: Face) -> Id<Font> {
        match face {
            Face::Heading => self.ids[0],
            Face::Body => self.ids[1],
            Face::Passage => self.ids[2],
        }
    }

    /// Add a line of text unless it is blank. Returns the line's width.
    #[allow(clippy::too_many_arguments)]
    pub fn line(
        &mut self,
        face: Face,
        text: &str,
        size: Pt,
        colour: Colour,
        bounds: &Rect,
        baseline: Pt,
        align: Align,
    ) -> Pt {
        let text = text.trim();
        if text.is_empty() {
            return Pt::ZERO;
        }
        let font = self.font(face);
        let id = self.font_id(face);
        self.page
            .add_line(text, (id, font), size, colour, bounds, baseline, align)
    }

    /// Fit `image` to `frame` and place it. Cover fits are clipped to the
    /// frame. Returns where the whole image was drawn.
    pub fn place_image(&mut self, image: Image, frame: Rect, mode: FitMode) -> Result<Rect, ComposeError> {
        let position = fit_image(image.width() as f32, image.height() as f32, frame, mode)?;
        debug!(?mode, ?frame, ?position, "placing image");
        let image_id = self.doc.add_image(image);
        self.page.add_image(ImageLayout {
            image_id,
            position,
            clip: (mode == FitMode::Cover).then_some(frame),
        });
        Ok(position)
    }

    /// Cover `frame` with a picture or flood it with a colour
    pub fn backdrop(&mut self, backdrop: Backdrop, frame: Rect) -> Result<(), ComposeError> {
        match backdrop {
            Backdrop::Picture(image) => {
                self.place_image(image, frame, FitMode::Cover)?;
            }
            Backdrop::Solid(colour) => self.page.add_fill(frame, colour, 1.0),
        }
        Ok(())
    }

    pub fn finish(self, info: Info) -> Document {
        let Sheet { mut doc, page, .. } = self;
        doc.set_info(info);
        doc.add_page(page);
        doc
    }
}

/// Lays out products. Holds only configuration and fonts, so one instance can
/// serve any number of requests, from any number of threads.
#[derive(Debug, Clone)]
pub struct Compositor {
    config: ComposeConfig,
    fonts: FontSet,
}

impl Compositor {
    /// Validate `config` and load the fonts it names
    pub fn new(config: ComposeConfig) -> Result<Compositor, ComposeError> {
        config.validate()?;
        let fonts = FontSet::from_config(&config)?;
        Ok(Compositor { config, fonts })
    }

    /// Use already loaded fonts instead of the ones `config` names
    pub fn with_fonts(config: ComposeConfig, fonts: FontSet) -> Result<Compositor, ComposeError> {
        config.validate()?;
        Ok(Compositor { config, fonts })
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// An empty request for `product`, rasterized at the configured
    /// resolution when the product's default output is PNG
    pub fn request(&self, product: Product) -> ComposeRequest {
        let request = ComposeRequest::new(product);
        match request.output {
            OutputFormat::Png { .. } => request.with_output(OutputFormat::Png {
                dpi: self.config.raster_dpi,
            }),
            OutputFormat::Pdf => request,
        }
    }

    fn zones(&self, product: Product) -> Zones {
        self.config
            .layout_spec(product.trim_size(), VECTOR_DPI)
            .resolve()
    }

    /// Every check that can be made before anything is drawn: the request's
    /// own checks, every line of text measured against the space it gets
    /// (including the card-back passage region), and outline fonts for PNG
    /// output
    pub fn validate(&self, request: &ComposeRequest) -> Result<(), ComposeError> {
        request.validate_with(&self.config)?;
        let zones = self.zones(request.product);
        let mut fit = TextFit::new(&self.fonts);
        match request.product {
            Product::CardFront => card_front::plan(request, &zones, &mut fit).map(drop)?,
            Product::CardBack => card_back::plan(request, &zones, &mut fit).map(drop)?,
            Product::Poster => poster::plan(request, &zones, &mut fit).map(drop)?,
            Product::Acrylic => acrylic::plan(request, &zones, &mut fit).map(drop)?,
        }
        if let OutputFormat::Png { .. } = request.output {
            fit.check_outlines()?;
        }
        Ok(())
    }

    /// Build the display list of a request without serializing it
    pub fn layout(&self, request: &ComposeRequest) -> Result<Document, ComposeError> {
        self.validate(request)?;
        let zones = self.zones(request.product);
        debug!(
            width = zones.doc_width,
            height = zones.doc_height,
            "resolved product geometry"
        );
        let sheet = Sheet::new(zones, &self.fonts);
        let sheet = match request.product {
            Product::CardFront => card_front::layout(request, sheet, &self.config)?,
            Product::CardBack => card_back::layout(request, sheet, &self.config)?,
            Product::Poster => poster::layout(request, sheet, &self.config)?,
            Product::Acrylic => acrylic::layout(request, sheet, &self.config)?,
        };
        Ok(sheet.finish(request.info()))
    }

    /// Compose a request into PDF or PNG bytes
    #[instrument(skip_all, fields(
        product = ?request.product,
        output = ?request.output,
        photo_len = request.photo.as_ref().map_or(0, |a| a.bytes.len()),
        background_len = request.background.as_ref().map_or(0, |a| a.bytes.len()),
    ))]
    pub fn compose(&self, request: &ComposeRequest) -> Result<Vec<u8>, ComposeError> {
        let document = self.layout(request)?;
        let bytes = match request.output {
            OutputFormat::Pdf => document.to_pdf_bytes()?,
            OutputFormat::Png { dpi } => raster::render_png(&document, 0, dpi)?,
        };
        info!(bytes = bytes.len(), "composed document");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_passage_is_the_default() {
        let fields = TextFields::default();
        let (title, text) = fields.resolved_passage().unwrap();
        assert_eq!(title, "Psalm 23");
        assert!(text.starts_with("The LORD is my shepherd"));

        let spanish = TextFields {
            language: Language::Es,
            passage_index: Some(1),
            ..Default::default()
        };
        assert_eq!(spanish.resolved_passage().unwrap().0, "Juan 14:1-3");
    }

    #[test]
    fn custom_passage_wins_over_presets() {
        let fields = TextFields {
            passage: Some("Gone fishing.".into()),
            passage_index: Some(3),
            ..Default::default()
        };
        assert_eq!(fields.resolved_passage().unwrap(), ("", "Gone fishing."));

        let blank = TextFields {
            passage: Some("   ".into()),
            passage_index: Some(9),
            ..Default::default()
        };
        assert!(matches!(
            blank.resolved_passage(),
            Err(ComposeError::UnknownPassage(9))
        ));
    }

    #[test]
    fn joins_dates_and_contacts() {
        let mut fields = TextFields {
            sunrise: "1941".into(),
            ..Default::default()
        };
        assert_eq!(fields.date_range(), "1941");
        fields.sunset = "2024".into();
        assert_eq!(fields.date_range(), "1941 \u{2013} 2024");
        assert_eq!(fields.counselor_line(), "");
        fields.counselor_phone = "555-0100".into();
        assert_eq!(fields.counselor_line(), "555-0100");
    }

    #[test]
    fn required_qr_is_checked_before_layout() {
        for product in [Product::CardBack, Product::Poster] {
            assert!(matches!(
                ComposeRequest::new(product).validate(),
                Err(ComposeError::MissingRequiredAsset("qr"))
            ));
        }
        assert!(ComposeRequest::new(Product::CardFront).validate().is_ok());
        assert!(ComposeRequest::new(Product::Acrylic).validate().is_ok());
    }

    #[test]
    fn long_names_are_rejected() {
        let mut request = ComposeRequest::new(Product::CardFront);
        request.fields.name = "x".repeat(MAX_NAME_CHARS + 1);
        assert!(matches!(
            request.validate(),
            Err(ComposeError::TextOverflowRisk(_))
        ));
    }

    #[test]
    fn text_shrinks_until_it_fits_or_overflows() {
        let fonts = FontSet::default();
        let mut fit = TextFit::new(&fonts);
        let text = "Bartholomew Alexander Whitfield";
        let size = fit
            .shrink("name", Face::Heading, text, (Pt(22.0), Pt(12.0)), Pt(1.0), Pt(252.0))
            .unwrap();
        assert!(size < Pt(22.0) && size >= Pt(12.0));
        assert!(fonts.face(Face::Heading).measure(text, size) <= Pt(252.0));

        assert!(matches!(
            fit.shrink("name", Face::Heading, text, (Pt(22.0), Pt(12.0)), Pt(1.0), Pt(150.0)),
            Err(ComposeError::TextOverflowRisk(_))
        ));
        assert_eq!(
            fit.fixed("label", Face::Body, "  ", Pt(7.0), Pt(1.0)).unwrap(),
            Pt(7.0)
        );
        assert_eq!(fit.used, vec![Face::Heading]);
    }

    #[test]
    fn raster_text_needs_outline_fonts() {
        let compositor = Compositor::new(ComposeConfig::default()).unwrap();
        let blank = compositor.request(Product::Acrylic);
        assert!(compositor.validate(&blank).is_ok());

        let mut named = compositor.request(Product::Acrylic);
        named.fields.name = "Ada".into();
        assert!(matches!(
            compositor.validate(&named),
            Err(ComposeError::UnsupportedFont(msg)) if msg.contains("heading_font")
        ));
        assert!(compositor
            .validate(&named.with_output(OutputFormat::Pdf))
            .is_ok());
    }

    #[test]
    fn products_pick_their_defaults() {
        assert_eq!(Product::Acrylic.default_output(), OutputFormat::Png { dpi: 300.0 });
        assert_eq!(Product::Poster.default_output(), OutputFormat::Pdf);
        assert_eq!(ComposeRequest::new(Product::Acrylic).qr_tint(), QrTint::FromPhoto);
        let custom = ComposeRequest::new(Product::CardBack).with_qr_tint(QrTint::FromPhoto);
        assert_eq!(custom.qr_tint(), QrTint::FromPhoto);
        assert!(!FontSet::default().has_outlines());
    }

    #[test]
    fn compositor_requests_use_the_configured_dpi() {
        let config = ComposeConfig {
            raster_dpi: 150.0,
            ..Default::default()
        };
        let compositor = Compositor::new(config).unwrap();
        assert_eq!(
            compositor.request(Product::Acrylic).output,
            OutputFormat::Png { dpi: 150.0 }
        );
        assert_eq!(compositor.request(Product::CardBack).output, OutputFormat::Pdf);
    }
}
