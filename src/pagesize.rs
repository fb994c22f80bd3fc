//! Trim sizes of the products the compositor lays out.
//!
//! All sizes are given in inches as (width, height), before bleed is added.
//! Use [`LayoutSpec`](crate::LayoutSpec) to derive the bleed canvas and safe area.
//!
//! # Example
//!
//! ```
//! use keepsake::pagesize::CARD_4X6;
//! use keepsake::LayoutSpec;
//!
//! let spec = LayoutSpec::from_size(CARD_4X6);
//! let zones = spec.resolve();
//! assert_eq!(zones.doc_width, 4.25 * 72.0);
//! ```

use crate::units::In;

/// Page dimensions as (width, height) in inches.
pub type TrimSize = (In, In);

/// Memorial / prayer card, both faces
pub const CARD_4X6: TrimSize = (In(4.0), In(6.0));

/// Memorial poster
pub const POSTER_20X30: TrimSize = (In(20.0), In(30.0));

/// Square acrylic photo block
pub const ACRYLIC_6X6: TrimSize = (In(6.0), In(6.0));
