//! Card back: a washed-out sky behind a titled passage, the sunrise / QR /
//! sunset row, and a footer.
//!
//! The passage is always set at [PASSAGE_SIZE] in a region of fixed height.
//! Text that doesn't fit is rejected rather than shrunk, so every printed
//! card reads at the same size.

use super::{decode_step, Backdrop, Face, Sheet, TextFields, TextFit};
use crate::colour::colours;
use crate::config::ComposeConfig;
use crate::fallback::FallbackChain;
use crate::font::Font;
use crate::geometry::Zones;
use crate::layout::{wrap_text, Align, FitMode};
use crate::products::ComposeRequest;
use crate::rect::Rect;
use crate::units::{In, Pt};
use crate::ComposeError;
use tracing::debug;

const TITLE_SIZE: Pt = Pt(11.0);
const TITLE_MIN_SIZE: Pt = Pt(8.0);

pub const PASSAGE_SIZE: Pt = Pt(7.0);
pub const PASSAGE_LINE_HEIGHT: Pt = Pt(9.0);
/// Horizontal padding between the safe edge and the passage
pub const PASSAGE_PAD: Pt = Pt(12.0);
/// Fourteen lines at [PASSAGE_LINE_HEIGHT]
pub const PASSAGE_REGION_HEIGHT: Pt = Pt(126.0);
/// Gap between the top safe edge and the passage region, holding the title
const PASSAGE_TOP: Pt = Pt(24.0);

const QR_SIZE: In = In(0.85);
const QR_BOTTOM: Pt = Pt(26.0);
const COLUMN_GUTTER: Pt = Pt(6.0);
const DATE_SIZE: Pt = Pt(9.0);
const DATE_MIN_SIZE: Pt = Pt(6.5);
const LABEL_SIZE: Pt = Pt(6.5);

const FOOTER_SIZE: Pt = Pt(6.5);
const COUNSELOR_BASELINE: Pt = Pt(2.0);
const ATTRIBUTION_BASELINE: Pt = Pt(11.0);

/// The box passage lines are wrapped to and centered in
pub(crate) fn passage_box(zones: &Zones) -> Rect {
    let safe = zones.safe;
    let top = safe.y2 - PASSAGE_TOP;
    Rect {
        x1: safe.x1 + PASSAGE_PAD,
        y1: top - PASSAGE_REGION_HEIGHT,
        x2: safe.x2 - PASSAGE_PAD,
        y2: top,
    }
}

/// Wrap the passage and make sure it fits its region
pub(crate) fn passage_lines(
    fields: &TextFields,
    zones: &Zones,
    font: &Font,
) -> Result<Vec<String>, ComposeError> {
    let (_, text) = fields.resolved_passage()?;
    let region = passage_box(zones);
    let lines = wrap_text(text, font, PASSAGE_SIZE, region.width());
    let height = PASSAGE_LINE_HEIGHT * lines.len() as f32;
    if height > region.height() {
        return Err(ComposeError::TextOverflowRisk(format!(
            "passage wraps to {} lines ({height}), the region holds {}",
            lines.len(),
            region.height()
        )));
    }
    Ok(lines)
}

/// Text sizes and passage lines, all checked against their space
pub(crate) struct Plan {
    title_size: Pt,
    /// Shared by both dates so they match
    date_size: Pt,
    lines: Vec<String>,
}

pub(crate) fn plan(
    request: &ComposeRequest,
    zones: &Zones,
    fit: &mut TextFit,
) -> Result<Plan, ComposeError> {
    let fields = &request.fields;
    let labels = fields.language.labels();
    let safe = zones.safe;

    let (title, _) = fields.resolved_passage()?;
    let title_size = fit.shrink(
        "passage title",
        Face::Heading,
        title,
        (TITLE_SIZE, TITLE_MIN_SIZE),
        Pt(0.5),
        safe.width(),
    )?;

    let lines = passage_lines(fields, zones, fit.font(Face::Passage))?;
    fit.mark(Face::Passage);

    let column = zones.columns(3, COLUMN_GUTTER)[0].width();
    let mut date_size = DATE_SIZE;
    for (field, date, label) in [
        ("sunrise", &fields.sunrise, labels.sunrise),
        ("sunset", &fields.sunset, labels.sunset),
    ] {
        let size = fit.shrink(
            field,
            Face::Body,
            date,
            (DATE_SIZE, DATE_MIN_SIZE),
            Pt(0.5),
            column,
        )?;
        date_size = date_size.min(size);
        fit.fixed(field, Face::Heading, label, LABEL_SIZE, column)?;
    }

    fit.fixed(
        "attribution",
        Face::Body,
        &fields.attribution,
        FOOTER_SIZE,
        safe.width(),
    )?;
    fit.fixed(
        "counselor",
        Face::Body,
        &fields.counselor_line(),
        FOOTER_SIZE,
        safe.width(),
    )?;

    Ok(Plan {
        title_size,
        date_size,
        lines,
    })
}

pub(crate) fn layout<'f>(
    request: &ComposeRequest,
    mut sheet: Sheet<'f>,
    config: &ComposeConfig,
) -> Result<Sheet<'f>, ComposeError> {
    let zones = sheet.zones;
    let fields = &request.fields;
    let labels = fields.language.labels();
    let safe = zones.safe;
    let plan = plan(request, &zones, &mut TextFit::new(sheet.fonts()))?;

    let qr = request
        .qr_image(None)?
        .ok_or(ComposeError::MissingRequiredAsset("qr"))?;

    let (source, backdrop) = FallbackChain::new()
        .then("sky", decode_step(request.background.as_ref(), "background"))
        .resolve_or("solid", Backdrop::Solid(config.sky_colour))?;
    if source == "solid" {
        debug!("no sky image supplied, using a solid background");
    }
    sheet.backdrop(backdrop, zones.canvas)?;
    sheet
        .page
        .add_fill(zones.canvas, colours::WHITE, config.back_overlay_opacity);

    // title and passage
    let (title, _) = fields.resolved_passage()?;
    let title_baseline = safe.y2 - sheet.font(Face::Heading).ascent(plan.title_size);
    sheet.line(
        Face::Heading,
        title,
        plan.title_size,
        colours::INK,
        &safe,
        title_baseline,
        Align::Center,
    );

    let region = passage_box(&zones);
    let lines = plan.lines;
    let mut baseline = region.y2 - sheet.font(Face::Passage).ascent(PASSAGE_SIZE);
    for line in lines.iter() {
        sheet.line(
            Face::Passage,
            line,
            PASSAGE_SIZE,
            colours::INK,
            &region,
            baseline,
            Align::Center,
        );
        baseline -= PASSAGE_LINE_HEIGHT;
    }
    debug!(lines = lines.len(), "set passage");

    // sunrise | qr | sunset
    let columns = zones.columns(3, COLUMN_GUTTER);
    let qr_size = Pt::from(QR_SIZE);
    let qr_frame = Rect::from_xywh(
        columns[1].center_x() - qr_size / 2.0,
        safe.y1 + QR_BOTTOM,
        qr_size,
        qr_size,
    );
    sheet.place_image(qr, qr_frame, FitMode::Contain)?;

    let date_baseline = qr_frame.center_y() + Pt(2.0);
    let label_baseline = qr_frame.center_y() - Pt(9.0);
    for (column, date, label) in [
        (&columns[0], &fields.sunrise, labels.sunrise),
        (&columns[2], &fields.sunset, labels.sunset),
    ] {
        sheet.line(
            Face::Body,
            date,
            plan.date_size,
            colours::INK,
            column,
            date_baseline,
            Align::Center,
        );
        sheet.line(
            Face::Heading,
            label,
            LABEL_SIZE,
            colours::INK,
            column,
            label_baseline,
            Align::Center,
        );
    }

    // footer
    sheet.line(
        Face::Body,
        &fields.attribution,
        FOOTER_SIZE,
        colours::INK,
        &safe,
        safe.y1 + ATTRIBUTION_BASELINE,
        Align::Center,
    );
    sheet.line(
        Face::Body,
        &fields.counselor_line(),
        FOOTER_SIZE,
        colours::INK,
        &safe,
        safe.y1 + COUNSELOR_BASELINE,
        Align::Center,
    );

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextMeasure;
    use crate::{LayoutSpec, StandardFont, CARD_4X6};

    #[test]
    fn passage_box_is_inside_the_safe_area() {
        let zones = LayoutSpec::from_size(CARD_4X6).resolve();
        let region = passage_box(&zones);
        assert!(zones.safe.contains(&region));
        assert_eq!(region.width(), Pt(zones.safe_width()) - PASSAGE_PAD * 2.0);
        assert_eq!(region.height(), PASSAGE_REGION_HEIGHT);
    }

    #[test]
    fn wrapped_lines_fit_the_box() {
        let zones = LayoutSpec::from_size(CARD_4X6).resolve();
        let font = Font::standard(StandardFont::TimesItalic);
        let fields = TextFields::default();
        let lines = passage_lines(&fields, &zones, &font).expect("psalm fits");
        let width = passage_box(&zones).width();
        for line in lines {
            assert!(font.measure(&line, PASSAGE_SIZE) <= width, "{line:?}");
        }
    }

    #[test]
    fn passages_too_tall_for_the_region_are_rejected() {
        let zones = LayoutSpec::from_size(CARD_4X6).resolve();
        let font = Font::standard(StandardFont::TimesItalic);
        // one word per line
        let fields = TextFields {
            passage: Some(vec!["x".repeat(80); 15].join(" ")),
            ..Default::default()
        };
        assert!(matches!(
            passage_lines(&fields, &zones, &font),
            Err(ComposeError::TextOverflowRisk(_))
        ));
    }
}
