use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertical layout policy for genotype bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenotypePosition {
    /// Each band is centred inside its parent's band.
    Centre,
    /// Bands are stacked bottom-to-top in one fixed global order.
    #[default]
    Stack,
    /// Stacked, with a gap between co-occurring siblings.
    Space,
}

impl std::fmt::Display for GenotypePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Centre => write!(f, "centre"),
            Self::Stack => write!(f, "stack"),
            Self::Space => write!(f, "space"),
        }
    }
}

impl std::str::FromStr for GenotypePosition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centre" | "center" => Ok(Self::Centre),
            "stack" => Ok(Self::Stack),
            "space" => Ok(Self::Space),
            other => Err(ConfigError::UnknownPosition(other.to_string())),
        }
    }
}

/// Pixel dimensions of the drawing surface. Only the curve conversion step
/// reads these; everything upstream works in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 300.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold must lie in (0, 1), got {0}")]
    Threshold(f64),
    #[error("alpha must lie in [0, 100], got {0}")]
    Alpha(f64),
    #[error("sibling gap must be a finite non-negative number, got {0}")]
    SiblingGap(f64),
    #[error("track padding must be a finite non-negative number, got {0}")]
    TrackPadding(f64),
    #[error("canvas must have positive width and height, got {width}x{height}")]
    Canvas { width: f64, height: f64 },
    #[error("perturbation after {timepoint}: surviving fraction must lie in (0, 1], got {frac}")]
    PerturbationFraction { timepoint: String, frac: f64 },
    #[error("unknown genotype position {0:?} (expected centre, stack or space)")]
    UnknownPosition(String),
}

/// Display and layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimesweepConfig {
    pub genotype_position: GenotypePosition,
    /// Order siblings by descending emergence value instead of tree order.
    pub sort_gtypes: bool,
    /// Prevalence below which a genotype is inflated to stay visible.
    pub threshold: f64,
    /// Percentage by which band fills are brightened relative to the stroke.
    pub alpha: f64,
    /// Normalized gap inserted between siblings by the spaced policy.
    pub sibling_gap: f64,
    /// Normalized padding between lanes of the tracks view.
    pub track_padding: f64,
    pub canvas: Canvas,
    pub show_labels: bool,
}

impl Default for TimesweepConfig {
    fn default() -> Self {
        Self {
            genotype_position: GenotypePosition::Stack,
            sort_gtypes: false,
            threshold: 0.005,
            alpha: 15.0,
            sibling_gap: 0.025,
            track_padding: 0.03,
            canvas: Canvas::default(),
            show_labels: false,
        }
    }
}

impl TimesweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if !(0.0..=100.0).contains(&self.alpha) {
            return Err(ConfigError::Alpha(self.alpha));
        }
        if !self.sibling_gap.is_finite() || self.sibling_gap < 0.0 {
            return Err(ConfigError::SiblingGap(self.sibling_gap));
        }
        if !self.track_padding.is_finite() || self.track_padding < 0.0 {
            return Err(ConfigError::TrackPadding(self.track_padding));
        }
        let Canvas { width, height } = self.canvas;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::Canvas { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TimesweepConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg: TimesweepConfig =
            serde_json::from_str(r#"{"genotype_position": "centre", "threshold": 0.1}"#)
                .unwrap();
        assert_eq!(cfg.genotype_position, GenotypePosition::Centre);
        assert!((cfg.threshold - 0.1).abs() < f64::EPSILON);
        assert!((cfg.alpha - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cfg = TimesweepConfig {
            threshold: 1.0,
            ..TimesweepConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Threshold(1.0)));

        let cfg = TimesweepConfig {
            sibling_gap: -0.1,
            ..TimesweepConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::SiblingGap(_))));

        let cfg = TimesweepConfig {
            canvas: Canvas {
                width: 0.0,
                height: 10.0,
            },
            ..TimesweepConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Canvas { .. })));
    }

    #[test]
    fn position_parsing() {
        assert_eq!("centre".parse(), Ok(GenotypePosition::Centre));
        assert_eq!("space".parse(), Ok(GenotypePosition::Space));
        assert!("diagonal".parse::<GenotypePosition>().is_err());
        assert_eq!(GenotypePosition::Stack.to_string(), "stack");
    }
}
