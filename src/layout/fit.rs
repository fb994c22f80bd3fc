use crate::error::ComposeError;
use crate::rect::Rect;
use crate::units::Pt;

/// How a source image is scaled into a target box. Both modes preserve the
/// source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fill the box entirely, cropping whatever overflows. Used for full-bleed
    /// backgrounds and card/poster photos.
    Cover,
    /// Fit the whole image inside the box, leaving letterbox space. Used for
    /// photos inside a framed area.
    Contain,
}

/// Calculate where to draw an image of `src_width` x `src_height` pixels so that
/// it fits `target` under the given mode. The returned rectangle is centered on
/// the target; with [FitMode::Cover] it may extend past the target's edges and
/// must be clipped by the caller.
///
/// Returns [ComposeError::InvalidImageDimensions] if either source dimension is
/// zero or not finite.
pub fn fit_image(
    src_width: f32,
    src_height: f32,
    target: Rect,
    mode: FitMode,
) -> Result<Rect, ComposeError> {
    if !(src_width.is_finite() && src_height.is_finite()) || src_width <= 0.0 || src_height <= 0.0
    {
        return Err(ComposeError::InvalidImageDimensions {
            width: src_width,
            height: src_height,
        });
    }

    let box_w = target.width();
    let box_h = target.height();
    let source_aspect = src_width / src_height;
    let box_aspect = box_w / box_h;

    // cover pins the height when the source is wider than the box; contain
    // pins it when the source is narrower
    let pin_height = match mode {
        FitMode::Cover => source_aspect > box_aspect,
        FitMode::Contain => source_aspect <= box_aspect,
    };

    let (draw_w, draw_h) = if pin_height {
        (box_h * source_aspect, box_h)
    } else {
        (box_w, box_w / source_aspect)
    };

    let x = target.x1 - (draw_w - box_w) / 2.0;
    let y = target.y1 - (draw_h - box_h) / 2.0;
    Ok(Rect::from_xywh(x, y, draw_w, draw_h))
}

/// Size and position of a square QR code centered inside a square container
/// whose lower edge sits at `bottom`. Returns `(container, qr)`.
pub fn centered_container(center_x: Pt, bottom: Pt, container: Pt, inner: Pt) -> (Rect, Rect) {
    let outer = Rect::from_xywh(center_x - container / 2.0, bottom, container, container);
    let inner = Rect::centered_square(outer.center_x(), outer.center_y(), inner);
    (outer, inner)
}
