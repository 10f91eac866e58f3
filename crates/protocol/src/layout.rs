use serde::{Deserialize, Serialize};

use crate::genotype_id::GenotypeId;

/// Lifecycle state of a genotype band at one timepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    /// The genotype has an observed prevalence here.
    Present,
    /// Zero-width birth marker placed at the timepoint before first
    /// appearance.
    Emerges,
    /// The genotype vanished with no surviving descendant; its band is pinched
    /// to a point.
    DisappearsStretched,
    /// The genotype itself is unobserved but descendants are; its band only
    /// hosts them.
    Replaced,
}

impl IntervalState {
    /// Whether the band occupies vertical space at this timepoint.
    pub fn occupies(&self) -> bool {
        matches!(self, Self::Present | Self::Replaced)
    }
}

/// Vertical extent of one genotype at one timepoint, in the unit square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInterval {
    pub bottom: f64,
    pub top: f64,
    pub state: IntervalState,
    /// Observed prevalence, if any.
    pub prevalence: Option<f64>,
    pub effective_prevalence: f64,
    /// Horizontal offset (fraction of one timepoint step) of an emergence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_shift: Option<f64>,
    /// Number of horizontal slots between this timepoint and the next one;
    /// set on every interval of a timepoint at which something emerges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_partitions: Option<u32>,
    /// Slack consumed by sibling spacing (spaced policy only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<f64>,
    /// Children holding a band of their own here (centred policy only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_children: Option<usize>,
}

impl LayoutInterval {
    pub fn new(
        bottom: f64,
        top: f64,
        state: IntervalState,
        prevalence: Option<f64>,
        effective_prevalence: f64,
    ) -> Self {
        Self {
            bottom,
            top,
            state,
            prevalence,
            effective_prevalence,
            x_shift: None,
            n_partitions: None,
            space: None,
            occupied_children: None,
        }
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn midpoint(&self) -> f64 {
        (self.bottom + self.top) / 2.0
    }
}

/// What a path sample was generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointTag {
    Timepoint(String),
    /// Midpoint inserted for a perturbation event.
    Event,
}

/// One boundary sample of a band, in the unit square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub tag: PointTag,
    /// Observed prevalence at this sample (tracks view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevalence: Option<f64>,
}

impl PathPoint {
    pub fn at(x: f64, y: f64, timepoint: &str) -> Self {
        Self {
            x,
            y,
            tag: PointTag::Timepoint(timepoint.to_string()),
            prevalence: None,
        }
    }

    pub fn event(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            tag: PointTag::Event,
            prevalence: None,
        }
    }
}

/// Closed boundary of one genotype band: bottom edge forward in time, then
/// top edge backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypePath {
    pub genotype: GenotypeId,
    /// Lane midpoint (tracks view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midpoint: Option<f64>,
    pub points: Vec<PathPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepView {
    /// All genotypes nested in one sweep.
    Traditional,
    /// One independent lane per genotype.
    Tracks,
}

impl std::str::FromStr for SweepView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traditional" => Ok(Self::Traditional),
            "tracks" => Ok(Self::Tracks),
            other => Err(format!("unknown view {other:?} (expected traditional or tracks)")),
        }
    }
}

/// A prevalence label anchored at a timepoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrevalenceLabel {
    pub timepoint: String,
    pub genotype: GenotypeId,
    pub prevalence: f64,
    /// Vertical anchor in the unit square.
    pub middle: f64,
    pub view: SweepView,
}
