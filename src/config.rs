use crate::colour::{colours, Colour};
use crate::geometry::{LayoutSpec, DEFAULT_BLEED, DEFAULT_SAFE_MARGIN, RASTER_DPI, VECTOR_DPI};
use crate::pagesize::{TrimSize, ACRYLIC_6X6, CARD_4X6, POSTER_20X30};
use crate::passages::{HARD_PASSAGE_BUDGET, SOFT_PASSAGE_BUDGET};
use crate::units::In;
use crate::ComposeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Compositor configuration. Every field has a default, so a JSON file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    // Geometry
    pub bleed: In,
    pub safe_margin: In,
    /// Resolution used when a request asks for PNG without naming one
    pub raster_dpi: f32,

    // Passage budgets, in characters
    pub soft_passage_budget: usize,
    pub hard_passage_budget: usize,

    // Fallback colours
    pub no_photo_colour: Colour,
    pub sky_colour: Colour,

    // Overlays
    pub front_overlay_opacity: f32,
    pub back_overlay_opacity: f32,
    pub poster_overlay_opacity: f32,

    // TrueType faces. Standard fonts are used for any that are unset, which
    // works for PDF output only.
    /// Names, labels and titles. Needed for text on PNG output such as an
    /// acrylic with a name; without it those requests fail with
    /// [ComposeError::UnsupportedFont].
    pub heading_font: Option<PathBuf>,
    /// Dates and footers, with the same PNG requirement
    pub body_font: Option<PathBuf>,
    pub passage_font: Option<PathBuf>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            bleed: DEFAULT_BLEED,
            safe_margin: DEFAULT_SAFE_MARGIN,
            raster_dpi: RASTER_DPI,
            soft_passage_budget: SOFT_PASSAGE_BUDGET,
            hard_passage_budget: HARD_PASSAGE_BUDGET,
            no_photo_colour: colours::DARK_GREY,
            sky_colour: colours::SKY,
            front_overlay_opacity: 0.55,
            back_overlay_opacity: 0.35,
            poster_overlay_opacity: 0.7,
            heading_font: None,
            body_font: None,
            passage_font: None,
        }
    }
}

impl ComposeConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ComposeError> {
        let bytes = std::fs::read(path)?;
        let config: ComposeConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ComposeError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ComposeError> {
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if !non_negative(self.bleed.0) || !non_negative(self.safe_margin.0) {
            return Err(ComposeError::Config(format!(
                "bleed ({}) and safe margin ({}) must not be negative",
                self.bleed, self.safe_margin
            )));
        }
        if !(self.raster_dpi.is_finite() && self.raster_dpi > 0.0) {
            return Err(ComposeError::Config(format!(
                "raster dpi must be positive, got {}",
                self.raster_dpi
            )));
        }
        if self.soft_passage_budget > self.hard_passage_budget {
            return Err(ComposeError::Config(format!(
                "soft passage budget {} exceeds hard budget {}",
                self.soft_passage_budget, self.hard_passage_budget
            )));
        }
        for size in [CARD_4X6, POSTER_20X30, ACRYLIC_6X6] {
            self.layout_spec(size, VECTOR_DPI)
                .validate()
                .map_err(|e| ComposeError::Config(e.to_string()))?;
        }
        for (name, opacity) in [
            ("front_overlay_opacity", self.front_overlay_opacity),
            ("back_overlay_opacity", self.back_overlay_opacity),
            ("poster_overlay_opacity", self.poster_overlay_opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ComposeError::Config(format!(
                    "{name} must be within 0..=1, got {opacity}"
                )));
            }
        }
        Ok(())
    }

    /// The layout spec of a product at the given resolution, with this
    /// configuration's bleed and safe margin
    pub fn layout_spec(&self, size: TrimSize, dpi: f32) -> LayoutSpec {
        LayoutSpec::from_size(size)
            .with_dpi(dpi)
            .with_bleed(self.bleed)
            .with_safe_margin(self.safe_margin)
    }
}
