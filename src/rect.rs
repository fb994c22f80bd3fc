use crate::layout::Margins;
use crate::units::*;

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and its size
    pub fn from_xywh(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Create a square of side `size` whose center is at `(cx, cy)`
    pub fn centered_square(cx: Pt, cy: Pt, size: Pt) -> Rect {
        Rect::from_xywh(cx - size / 2.0, cy - size / 2.0, size, size)
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    pub fn center_x(&self) -> Pt {
        self.x1 + self.width() / 2.0
    }

    pub fn center_y(&self) -> Pt {
        self.y1 + self.height() / 2.0
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width() / self.height()
    }

    /// True if the rectangle has no area (or negative extents)
    pub fn is_degenerate(&self) -> bool {
        self.width().0 <= 0.0 || self.height().0 <= 0.0
    }

    /// Shrink the rectangle by the given margins
    pub fn inset(&self, margins: &Margins) -> Rect {
        Rect {
            x1: self.x1 + margins.left,
            y1: self.y1 + margins.bottom,
            x2: self.x2 - margins.right,
            y2: self.y2 - margins.top,
        }
    }

    /// True if `other` lies entirely inside `self`. A small tolerance absorbs
    /// floating point noise from unit conversion.
    pub fn contains(&self, other: &Rect) -> bool {
        const EPSILON: f32 = 1e-3;
        other.x1.0 >= self.x1.0 - EPSILON
            && other.y1.0 >= self.y1.0 - EPSILON
            && other.x2.0 <= self.x2.0 + EPSILON
            && other.y2.0 <= self.y2.0 + EPSILON
    }

    /// The overlapping region of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        (!r.is_degenerate()).then_some(r)
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<&Rect> for pdf_writer::Rect {
    fn from(r: &Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_shrinks_each_side() {
        let r = Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(100.0), Pt(50.0));
        let inner = r.inset(&Margins::all(Pt(10.0)));
        assert_eq!(inner, Rect::from_xywh(Pt(10.0), Pt(10.0), Pt(80.0), Pt(30.0)));
        assert!(r.contains(&inner));
        assert!(!inner.contains(&r));
    }

    #[test]
    fn intersection_of_disjoint_rects_is_none() {
        let a = Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0));
        let b = Rect::from_xywh(Pt(20.0), Pt(0.0), Pt(10.0), Pt(10.0));
        assert!(a.intersection(&b).is_none());

        let c = Rect::from_xywh(Pt(5.0), Pt(5.0), Pt(10.0), Pt(10.0));
        assert_eq!(
            a.intersection(&c),
            Some(Rect::from_xywh(Pt(5.0), Pt(5.0), Pt(5.0), Pt(5.0)))
        );
    }
}
