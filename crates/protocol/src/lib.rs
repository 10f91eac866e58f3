pub mod commands;
pub mod config;
pub mod genotype_id;
pub mod input;
pub mod layout;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use config::{Canvas, ConfigError, GenotypePosition, TimesweepConfig};
pub use genotype_id::GenotypeId;
pub use input::{CloneColour, PerturbationEvent, PrevalenceRecord, TimesweepInput, TreeEdge};
pub use layout::{
    GenotypePath, IntervalState, LayoutInterval, PathPoint, PointTag, PrevalenceLabel, SweepView,
};
pub use theme::{Paint, ThemeToken};
pub use types::{Color, Point, Rect};
