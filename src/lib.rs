//! Print-ready compositing of memorial products: card fronts and backs,
//! posters, and acrylic photo blocks.
//!
//! A [ComposeRequest] carries the photo, the QR code and the text for one
//! product; a [Compositor] lays it out on the product's bleed canvas and
//! returns PDF or PNG bytes. The lower-level pieces (geometry, image fitting,
//! text wrapping, the page display list and its two backends) are public too.

mod colour;
pub use colour::*;

pub mod config;
pub use config::ComposeConfig;

mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

pub mod fallback;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to lay out images and text on pages
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;
pub use pagesize::*;

pub mod palette;

pub mod passages;
pub use passages::Language;

mod products;
pub use products::*;

pub mod qr;
pub use qr::{QrInput, QrTint};

pub mod raster;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
