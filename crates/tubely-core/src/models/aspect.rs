use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU32;
use utoipa::ToSchema;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.01;

/// Aspect-ratio class of a video, used as the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AspectCategory {
    Landscape,
    Portrait,
    Other,
}

impl AspectCategory {
    /// Classifies a frame size. A ratio within 0.01 of 16:9 is landscape,
    /// within 0.01 of 9:16 is portrait, anything else is other.
    ///
    /// The height is non-zero by construction; probes that report a zero
    /// height fail before reaching this point.
    pub fn classify(width: u32, height: NonZeroU32) -> Self {
        let ratio = f64::from(width) / f64::from(height.get());
        if (ratio - LANDSCAPE_RATIO).abs() <= RATIO_TOLERANCE {
            AspectCategory::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() <= RATIO_TOLERANCE {
            AspectCategory::Portrait
        } else {
            AspectCategory::Other
        }
    }

    /// Storage key prefix for this category.
    pub fn prefix(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Other => "other",
        }
    }

    /// Human-facing ratio tag ("16:9", "9:16" or "other").
    pub fn ratio_tag(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "16:9",
            AspectCategory::Portrait => "9:16",
            AspectCategory::Other => "other",
        }
    }
}

impl Display for AspectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.prefix())
    }
}
