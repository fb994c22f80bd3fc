//! Conversion of inch-based product dimensions into device-unit zones.
//!
//! Every product is described by a [LayoutSpec]: a trim size, a uniform bleed
//! outside the trim, a uniform safe margin inside it, and a resolution. Resolving
//! the spec yields [Zones], the four nested regions all drawing is positioned
//! against:
//!
//! ```text
//! +-------------------------------+  canvas (trim + bleed), doc_width x doc_height
//! |  +-------------------------+  |
//! |  |  trim                   |  |
//! |  |  +-------------------+  |  |
//! |  |  |  safe             |  |  |
//! ```
//!
//! Coordinates follow PDF orientation: the origin is the bottom-left corner of
//! the canvas and y grows upwards. At 72 dpi, device units are points.

use crate::error::ComposeError;
use crate::layout::Margins;
use crate::pagesize::TrimSize;
use crate::rect::Rect;
use crate::units::*;

/// Bleed added outside the trim on every side
pub const DEFAULT_BLEED: In = In(0.125);
/// Inset from the trim edge that content must stay within
pub const DEFAULT_SAFE_MARGIN: In = In(0.25);
/// Resolution of vector (PDF point-space) output
pub const VECTOR_DPI: f32 = 72.0;
/// Resolution of raster output (acrylic blocks, poster proofs)
pub const RASTER_DPI: f32 = 300.0;

/// Immutable description of one document's physical geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    pub page_width: In,
    pub page_height: In,
    pub dpi: f32,
    pub bleed: In,
    pub safe_margin: In,
}

/// Resolved device-unit geometry of a [LayoutSpec]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zones {
    pub dpi: f32,
    /// Width of the full bleed canvas
    pub doc_width: f32,
    /// Height of the full bleed canvas
    pub doc_height: f32,
    /// The full bleed canvas, anchored at the origin
    pub canvas: Rect,
    /// The trim rectangle, inset from the canvas by the bleed
    pub trim: Rect,
    /// The safe rectangle, inset from the trim by the safe margin
    pub safe: Rect,
}

impl LayoutSpec {
    /// A spec with the default bleed and safe margin at vector resolution
    pub fn new(page_width: In, page_height: In) -> LayoutSpec {
        LayoutSpec {
            page_width,
            page_height,
            dpi: VECTOR_DPI,
            bleed: DEFAULT_BLEED,
            safe_margin: DEFAULT_SAFE_MARGIN,
        }
    }

    pub fn from_size(size: TrimSize) -> LayoutSpec {
        LayoutSpec::new(size.0, size.1)
    }

    pub fn with_dpi(mut self, dpi: f32) -> LayoutSpec {
        self.dpi = dpi;
        self
    }

    pub fn with_bleed(mut self, bleed: In) -> LayoutSpec {
        self.bleed = bleed;
        self
    }

    pub fn with_safe_margin(mut self, safe_margin: In) -> LayoutSpec {
        self.safe_margin = safe_margin;
        self
    }

    /// Reject specs that would resolve into degenerate rectangles. [LayoutSpec::resolve]
    /// itself never fails, so callers taking sizes from outside should validate first.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        let finite_non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !finite_positive(self.page_width.0) || !finite_positive(self.page_height.0) {
            return Err(ComposeError::InvalidLayout(format!(
                "page size must be positive, got {} x {}",
                self.page_width, self.page_height
            )));
        }
        if !finite_positive(self.dpi) {
            return Err(ComposeError::InvalidLayout(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !finite_non_negative(self.bleed.0) || !finite_non_negative(self.safe_margin.0) {
            return Err(ComposeError::InvalidLayout(format!(
                "bleed ({}) and safe margin ({}) must not be negative",
                self.bleed, self.safe_margin
            )));
        }
        if self.resolve().safe.is_degenerate() {
            return Err(ComposeError::InvalidLayout(format!(
                "safe margin {} leaves no room on a {} x {} page",
                self.safe_margin, self.page_width, self.page_height
            )));
        }
        Ok(())
    }

    /// Convert the spec into device units. Pure arithmetic: non-positive inputs
    /// produce degenerate rectangles rather than errors.
    pub fn resolve(&self) -> Zones {
        let dpi = self.dpi;
        let bleed = self.bleed.to_device(dpi);
        let safe_margin = self.safe_margin.to_device(dpi);
        let page_w = self.page_width.to_device(dpi);
        let page_h = self.page_height.to_device(dpi);

        let doc_width = page_w + 2.0 * bleed;
        let doc_height = page_h + 2.0 * bleed;

        let canvas = Rect::from_xywh(Pt::ZERO, Pt::ZERO, Pt(doc_width), Pt(doc_height));
        let trim = canvas.inset(&Margins::all(Pt(bleed)));
        let safe = trim.inset(&Margins::all(Pt(safe_margin)));

        Zones {
            dpi,
            doc_width,
            doc_height,
            canvas,
            trim,
            safe,
        }
    }
}

impl Zones {
    /// `bleed*dpi + safe_margin*dpi`
    pub fn safe_left(&self) -> f32 {
        self.safe.x1.0
    }

    pub fn safe_bottom(&self) -> f32 {
        self.safe.y1.0
    }

    /// `page_width*dpi - 2*safe_margin*dpi`
    pub fn safe_width(&self) -> f32 {
        self.safe.width().0
    }

    pub fn safe_height(&self) -> f32 {
        self.safe.height().0
    }

    /// Split the safe rectangle into `count` equal-width columns separated by
    /// `gutter`. Returns an empty list when `count` is zero.
    pub fn columns(&self, count: usize, gutter: Pt) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let gutters = gutter * (count - 1) as f32;
        let width = (self.safe.width() - gutters) / count as f32;
        (0..count)
            .map(|i| {
                let x = self.safe.x1 + (width + gutter) * i as f32;
                Rect::from_xywh(x, self.safe.y1, width, self.safe.height())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::*;

    #[test]
    fn card_zones_at_vector_resolution() {
        let zones = LayoutSpec::from_size(CARD_4X6).resolve();
        assert_eq!(zones.doc_width, 306.0);
        assert_eq!(zones.doc_height, 450.0);
        assert_eq!(zones.safe_left(), 9.0 + 18.0);
        assert_eq!(zones.safe_bottom(), 27.0);
        assert_eq!(zones.safe_width(), 288.0 - 36.0);
        assert_eq!(zones.safe_height(), 432.0 - 36.0);
        assert!(zones.canvas.contains(&zones.trim));
        assert!(zones.trim.contains(&zones.safe));
    }

    #[test]
    fn acrylic_zones_at_raster_resolution() {
        let zones = LayoutSpec::from_size(ACRYLIC_6X6)
            .with_dpi(RASTER_DPI)
            .resolve();
        assert_eq!(zones.doc_width, 6.25 * 300.0);
        assert_eq!(zones.safe_left(), 0.375 * 300.0);
        assert_eq!(zones.safe_width(), 5.5 * 300.0);
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert!(LayoutSpec::new(In(0.0), In(6.0)).validate().is_err());
        assert!(LayoutSpec::new(In(4.0), In(-1.0)).validate().is_err());
        assert!(LayoutSpec::new(In(4.0), In(6.0)).with_dpi(0.0).validate().is_err());
        assert!(LayoutSpec::new(In(0.4), In(6.0)).validate().is_err());
        assert!(LayoutSpec::from_size(POSTER_20X30).validate().is_ok());
    }

    #[test]
    fn degenerate_input_resolves_without_panicking() {
        let zones = LayoutSpec::new(In(0.0), In(0.0)).resolve();
        assert!(zones.safe.is_degenerate());
    }

    #[test]
    fn columns_tile_the_safe_width() {
        let zones = LayoutSpec::from_size(CARD_4X6).resolve();
        let cols = zones.columns(3, Pt(6.0));
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].x1, zones.safe.x1);
        assert!((cols[2].x2.0 - zones.safe.x2.0).abs() < 1e-3);
        assert!(zones.columns(0, Pt(6.0)).is_empty());
    }
}
