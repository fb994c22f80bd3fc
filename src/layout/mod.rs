//! Layout primitives shared by every product.
//!
//! - [`fit_image`](crate::layout::fit_image) computes where to draw an image
//!   under [`FitMode::Cover`](crate::layout::FitMode) or
//!   [`FitMode::Contain`](crate::layout::FitMode)
//! - [`wrap_text`](crate::layout::wrap_text) breaks text into lines that fit a
//!   width, measured through [`TextMeasure`](crate::layout::TextMeasure)
//! - [`Margins`](crate::layout::Margins) describe insets such as bleed and
//!   safe margins
//!
//! # Example
//!
//! ```
//! use keepsake::layout::{fit_image, wrap_text, FitMode};
//! use keepsake::{Font, Pt, Rect, StandardFont};
//!
//! let frame = Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(306.0), Pt(450.0));
//! let draw = fit_image(4032.0, 3024.0, frame, FitMode::Cover).unwrap();
//! assert_eq!(draw.height(), frame.height());
//!
//! let font = Font::standard(StandardFont::TimesItalic);
//! let lines = wrap_text("The Lord is my shepherd; I shall not want.", &font, Pt(7.0), Pt(80.0));
//! assert!(lines.len() > 1);
//! ```

mod fit;
mod margins;
mod text;

pub use fit::*;
pub use margins::*;
pub use text::*;
