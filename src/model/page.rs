//! Page size, margins, orientation, and the geometry derived from them.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points, portrait.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Parse a case-insensitive preset name ("a4", "Letter", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a3" => Some(PageSize::A3),
            "a4" => Some(PageSize::A4),
            "a5" => Some(PageSize::A5),
            "letter" => Some(PageSize::Letter),
            _ => None,
        }
    }
}

/// Uniform page margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum MarginSize {
    /// 36pt (half an inch).
    Compact,
    /// 54pt (three quarters of an inch).
    #[default]
    Normal,
    /// 72pt (one inch).
    Wide,
    Custom(f64),
}

impl MarginSize {
    pub fn points(&self) -> f64 {
        match self {
            MarginSize::Compact => 36.0,
            MarginSize::Normal => 54.0,
            MarginSize::Wide => 72.0,
            MarginSize::Custom(points) => *points,
        }
    }

    /// Parse a preset name ("compact", "normal", "wide") or a number of points.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "compact" => Some(MarginSize::Compact),
            "normal" => Some(MarginSize::Normal),
            "wide" => Some(MarginSize::Wide),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|points| points.is_finite())
                .map(MarginSize::Custom),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// The page selection for one render. Immutable for the whole render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub margin: MarginSize,
    #[serde(default)]
    pub orientation: Orientation,
}

impl PageSpec {
    pub fn new(page_size: PageSize, margin: MarginSize, orientation: Orientation) -> Self {
        Self {
            page_size,
            margin,
            orientation,
        }
    }

    /// Derive the page geometry. Pure; call again if the page spec changes.
    pub fn geometry(&self) -> PageGeometry {
        let (w, h) = self.page_size.dimensions();
        let (effective_width, effective_height) = match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        let margin = self.margin.points();
        PageGeometry {
            effective_width,
            effective_height,
            content_width: effective_width - margin * 2.0,
            content_height: effective_height - margin * 2.0,
            margin,
        }
    }
}

/// Page dimensions after orientation and margins are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub effective_width: f64,
    pub effective_height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub margin: f64,
}

impl PageGeometry {
    /// Fail if the margins leave no content area.
    pub fn validate(&self) -> Result<(), LayoutError> {
        // NaN compares false against every bound, so non-finite sizes are
        // rejected up front.
        let finite = self.margin.is_finite()
            && self.effective_width.is_finite()
            && self.effective_height.is_finite();
        if !finite
            || self.margin < 0.0
            || self.content_width <= 0.0
            || self.content_height <= 0.0
        {
            return Err(LayoutError::DegeneratePage {
                width: self.effective_width,
                height: self.effective_height,
                margin: self.margin,
            });
        }
        Ok(())
    }

    /// The y coordinate (from page top) below which nothing may be drawn.
    pub fn bottom_limit(&self) -> f64 {
        self.effective_height - self.margin
    }
}
