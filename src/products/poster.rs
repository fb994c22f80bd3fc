//! Poster: full-bleed photo, a dark band along the bottom, the name set large,
//! and the QR code in a white square flanked by the dates.

use super::{decode_step, fade, Backdrop, Face, Sheet, TextFit};
use crate::colour::colours;
use crate::config::ComposeConfig;
use crate::fallback::FallbackChain;
use crate::geometry::Zones;
use crate::layout::{centered_container, Align, FitMode};
use crate::products::ComposeRequest;
use crate::rect::Rect;
use crate::units::{In, Pt};
use crate::ComposeError;
use tracing::{debug, warn};

/// Share of the canvas height covered by the bottom gradient
const BAND_SHARE: f32 = 0.4;

const QR_CONTAINER: In = In(1.25);
const QR_SIZE: In = In(1.0);
/// Container bottom, above the bottom safe edge
const QR_BOTTOM: Pt = Pt(72.0);
/// Space between the container and the flanking dates
const FLANK_GAP: Pt = Pt(36.0);

const MEMORIAL_SIZE: Pt = Pt(36.0);
const NAME_SIZE: Pt = Pt(72.0);
const NAME_MIN_SIZE: Pt = Pt(36.0);
const DATE_SIZE: Pt = Pt(28.0);
const DATE_MIN_SIZE: Pt = Pt(18.0);
const LABEL_SIZE: Pt = Pt(14.0);

/// The white QR container and the QR frame inside it
fn qr_container(zones: &Zones) -> (Rect, Rect) {
    let safe = zones.safe;
    centered_container(
        safe.center_x(),
        safe.y1 + QR_BOTTOM,
        Pt::from(QR_CONTAINER),
        Pt::from(QR_SIZE),
    )
}

/// The boxes either side of the container holding sunrise and sunset
fn flanks(zones: &Zones, container: &Rect) -> (Rect, Rect) {
    let safe = zones.safe;
    let left = Rect {
        x1: safe.x1,
        y1: container.y1,
        x2: container.x1 - FLANK_GAP,
        y2: container.y2,
    };
    let right = Rect {
        x1: container.x2 + FLANK_GAP,
        y1: container.y1,
        x2: safe.x2,
        y2: container.y2,
    };
    (left, right)
}

pub(crate) struct Plan {
    name_size: Pt,
    /// Shared by both dates so they match
    date_size: Pt,
}

pub(crate) fn plan(
    request: &ComposeRequest,
    zones: &Zones,
    fit: &mut TextFit,
) -> Result<Plan, ComposeError> {
    let fields = &request.fields;
    let labels = fields.language.labels();
    let width = zones.safe.width();

    let (container, _) = qr_container(zones);
    let (left, right) = flanks(zones, &container);
    let mut date_size = DATE_SIZE;
    for (field, bounds, date, label) in [
        ("sunrise", &left, &fields.sunrise, labels.sunrise),
        ("sunset", &right, &fields.sunset, labels.sunset),
    ] {
        let size = fit.shrink(
            field,
            Face::Body,
            date,
            (DATE_SIZE, DATE_MIN_SIZE),
            Pt(2.0),
            bounds.width(),
        )?;
        date_size = date_size.min(size);
        fit.fixed(field, Face::Heading, label, LABEL_SIZE, bounds.width())?;
    }

    let name_size = fit.shrink(
        "name",
        Face::Heading,
        &fields.name,
        (NAME_SIZE, NAME_MIN_SIZE),
        Pt(2.0),
        width,
    )?;
    fit.fixed(
        "memorial line",
        Face::Passage,
        labels.in_loving_memory,
        MEMORIAL_SIZE,
        width,
    )?;
    Ok(Plan {
        name_size,
        date_size,
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
    let canvas = zones.canvas;
    let plan = plan(request, &zones, &mut TextFit::new(sheet.fonts()))?;

    let (source, backdrop) = FallbackChain::new()
        .then("photo", decode_step(request.photo.as_ref(), "photo"))
        .then("mockup", decode_step(request.background.as_ref(), "background"))
        .resolve_or("solid", Backdrop::Solid(config.no_photo_colour))?;
    if source != "photo" {
        warn!(fallback = source, "no photo supplied");
    }
    let qr = match backdrop {
        Backdrop::Picture(image) if source == "photo" => {
            let qr = request.qr_image(Some(&image))?;
            sheet.place_image(image, canvas, FitMode::Cover)?;
            qr
        }
        other => {
            sheet.backdrop(other, canvas)?;
            request.qr_image(None)?
        }
    };
    let qr = qr.ok_or(ComposeError::MissingRequiredAsset("qr"))?;

    let band = Rect::from_xywh(
        canvas.x1,
        canvas.y1,
        canvas.width(),
        canvas.height() * BAND_SHARE,
    );
    sheet
        .page
        .add_gradient(band, fade(colours::BLACK, config.poster_overlay_opacity));

    let (container, qr_frame) = qr_container(&zones);
    debug!(?container, ?qr_frame, "placing poster qr");
    sheet.page.add_fill(container, colours::WHITE, 1.0);
    sheet.place_image(qr, qr_frame, FitMode::Contain)?;

    // dates either side of the container
    let (left, right) = flanks(&zones, &container);
    let date_baseline = container.center_y() + Pt(2.0);
    let label_baseline = container.center_y() - Pt(18.0);
    for (bounds, align, date, label) in [
        (&left, Align::Right, &fields.sunrise, labels.sunrise),
        (&right, Align::Left, &fields.sunset, labels.sunset),
    ] {
        sheet.line(
            Face::Body,
            date,
            plan.date_size,
            colours::WHITE,
            bounds,
            date_baseline,
            align,
        );
        sheet.line(
            Face::Heading,
            label,
            LABEL_SIZE,
            colours::WHITE,
            bounds,
            label_baseline,
            align,
        );
    }

    let name_size = plan.name_size;
    let name_baseline = container.y2 + Pt(60.0);
    sheet.line(
        Face::Heading,
        &fields.name,
        name_size,
        colours::WHITE,
        &safe,
        name_baseline,
        Align::Center,
    );
    sheet.line(
        Face::Passage,
        labels.in_loving_memory,
        MEMORIAL_SIZE,
        colours::WHITE,
        &safe,
        name_baseline + name_size + Pt(24.0),
        Align::Center,
    );

    Ok(sheet)
}
