//! Card front: a full-bleed photo darkened towards the bottom, with the
//! memorial line, name and dates stacked up from the bottom safe edge.

use super::{decode_step, fade, Backdrop, Face, Sheet, TextFit};
use crate::colour::colours;
use crate::config::ComposeConfig;
use crate::fallback::FallbackChain;
use crate::geometry::Zones;
use crate::layout::Align;
use crate::products::ComposeRequest;
use crate::rect::Rect;
use crate::units::Pt;
use crate::ComposeError;
use tracing::warn;

const HEADING_SIZE: Pt = Pt(12.0);
const NAME_SIZE: Pt = Pt(22.0);
const NAME_MIN_SIZE: Pt = Pt(12.0);
const DATES_SIZE: Pt = Pt(10.0);
const DATES_MIN_SIZE: Pt = Pt(8.0);

// baselines, measured up from the bottom safe edge
const DATES_OFFSET: Pt = Pt(8.0);
const NAME_OFFSET: Pt = Pt(30.0);
const HEADING_OFFSET: Pt = Pt(60.0);

/// Sizes of the text lines, all of which fit the safe width
pub(crate) struct Plan {
    name_size: Pt,
    dates_size: Pt,
}

pub(crate) fn plan(
    request: &ComposeRequest,
    zones: &Zones,
    fit: &mut TextFit,
) -> Result<Plan, ComposeError> {
    let fields = &request.fields;
    let width = zones.safe.width();
    fit.fixed(
        "memorial line",
        Face::Passage,
        fields.language.labels().in_loving_memory,
        HEADING_SIZE,
        width,
    )?;
    let name_size = fit.shrink(
        "name",
        Face::Heading,
        &fields.name,
        (NAME_SIZE, NAME_MIN_SIZE),
        Pt(1.0),
        width,
    )?;
    let dates_size = fit.shrink(
        "date range",
        Face::Body,
        &fields.date_range(),
        (DATES_SIZE, DATES_MIN_SIZE),
        Pt(0.5),
        width,
    )?;
    Ok(Plan {
        name_size,
        dates_size,
    })
}

pub(crate) fn layout<'f>(
    request: &ComposeRequest,
    mut sheet: Sheet<'f>,
    config: &ComposeConfig,
) -> Result<Sheet<'f>, ComposeError> {
    let zones = sheet.zones;
    let fields = &request.fields;
    let plan = plan(request, &zones, &mut TextFit::new(sheet.fonts()))?;

    let (source, backdrop) = FallbackChain::new()
        .then("photo", decode_step(request.photo.as_ref(), "photo"))
        .resolve_or("solid", Backdrop::Solid(config.no_photo_colour))?;
    if source == "solid" {
        warn!("no photo supplied, using a solid background");
    }
    sheet.backdrop(backdrop, zones.canvas)?;

    let canvas = zones.canvas;
    let lower_third = Rect::from_xywh(canvas.x1, canvas.y1, canvas.width(), canvas.height() / 3.0);
    sheet.page.add_gradient(
        lower_third,
        fade(colours::BLACK, config.front_overlay_opacity),
    );

    let safe = zones.safe;

    sheet.line(
        Face::Passage,
        fields.language.labels().in_loving_memory,
        HEADING_SIZE,
        colours::WHITE,
        &safe,
        safe.y1 + HEADING_OFFSET,
        Align::Center,
    );
    sheet.line(
        Face::Heading,
        &fields.name,
        plan.name_size,
        colours::WHITE,
        &safe,
        safe.y1 + NAME_OFFSET,
        Align::Center,
    );
    sheet.line(
        Face::Body,
        &fields.date_range(),
        plan.dates_size,
        colours::WHITE,
        &safe,
        safe.y1 + DATES_OFFSET,
        Align::Center,
    );

    Ok(sheet)
}
