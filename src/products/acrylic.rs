//! Acrylic block artwork: the photo letterboxed in a frame above a strip with
//! the name and dates, and a QR code tinted to match the photo in the
//! bottom-right corner.

use super::{decode_step, Backdrop, Face, Sheet, TextFit};
use crate::colour::colours;
use crate::config::ComposeConfig;
use crate::fallback::FallbackChain;
use crate::geometry::Zones;
use crate::layout::{Align, FitMode};
use crate::products::ComposeRequest;
use crate::rect::Rect;
use crate::units::{In, Pt};
use crate::ComposeError;
use tracing::debug;

/// Height of the text strip below the photo frame
const STRIP_HEIGHT: Pt = Pt(96.0);

const QR_SIZE: In = In(1.0);
/// Distance of the QR code from the bottom and right safe edges
const QR_INSET: Pt = Pt(6.0);
/// Space kept between the text and the QR code
const QR_GAP: Pt = Pt(12.0);

const NAME_SIZE: Pt = Pt(20.0);
const NAME_MIN_SIZE: Pt = Pt(11.0);
const DATES_SIZE: Pt = Pt(11.0);
const DATES_MIN_SIZE: Pt = Pt(8.0);
const NAME_BASELINE: Pt = Pt(52.0);
const DATES_BASELINE: Pt = Pt(30.0);

fn qr_frame(zones: &Zones) -> Rect {
    let safe = zones.safe;
    let size = Pt::from(QR_SIZE);
    Rect::from_xywh(safe.x2 - QR_INSET - size, safe.y1 + QR_INSET, size, size)
}

/// The strip below the frame, narrowed to leave room for a QR code
fn text_box(zones: &Zones, with_qr: bool) -> Rect {
    let safe = zones.safe;
    let x2 = if with_qr {
        qr_frame(zones).x1 - QR_GAP
    } else {
        safe.x2
    };
    Rect {
        x1: safe.x1,
        y1: safe.y1,
        x2,
        y2: safe.y1 + STRIP_HEIGHT,
    }
}

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
    let width = text_box(zones, request.qr.is_some()).width();
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
    _config: &ComposeConfig,
) -> Result<Sheet<'f>, ComposeError> {
    let zones = sheet.zones;
    let fields = &request.fields;
    let safe = zones.safe;
    let plan = plan(request, &zones, &mut TextFit::new(sheet.fonts()))?;

    sheet.page.add_fill(zones.canvas, colours::WHITE, 1.0);

    let frame = Rect {
        x1: safe.x1,
        y1: safe.y1 + STRIP_HEIGHT,
        x2: safe.x2,
        y2: safe.y2,
    };
    sheet.page.add_fill(frame, colours::LIGHT_GREY, 1.0);

    let (source, backdrop) = FallbackChain::new()
        .then("photo", decode_step(request.photo.as_ref(), "photo"))
        .then("mockup", decode_step(request.background.as_ref(), "background"))
        .resolve_or("letterbox", Backdrop::Solid(colours::LIGHT_GREY))?;
    let qr = match backdrop {
        Backdrop::Picture(image) => {
            debug!(source, "framing picture");
            let tint_source = (source == "photo").then_some(&image);
            let qr = request.qr_image(tint_source)?;
            sheet.place_image(image, frame, FitMode::Contain)?;
            qr
        }
        Backdrop::Solid(_) => {
            debug!("no picture supplied, leaving the frame empty");
            request.qr_image(None)?
        }
    };

    if let Some(qr) = qr {
        sheet.place_image(qr, qr_frame(&zones), FitMode::Contain)?;
    }

    let text_box = text_box(&zones, request.qr.is_some());
    sheet.line(
        Face::Heading,
        &fields.name,
        plan.name_size,
        colours::INK,
        &text_box,
        safe.y1 + NAME_BASELINE,
        Align::Left,
    );
    sheet.line(
        Face::Body,
        &fields.date_range(),
        plan.dates_size,
        colours::INK,
        &text_box,
        safe.y1 + DATES_BASELINE,
        Align::Left,
    );

    Ok(sheet)
}
