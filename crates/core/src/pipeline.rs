//! The full layout pipeline: tree, prevalence, widths, policy, emergence
//! shift, paths, curves and labels, as one pure function.

use serde::Serialize;
use timesweep_protocol::{
    CloneColour, ConfigError, GenotypeId, GenotypePath, PerturbationEvent, PrevalenceLabel,
    SweepView, TimesweepConfig, TimesweepInput,
};

use crate::error::{LayoutWarning, TimesweepError};
use crate::layout::{Layout, LayoutEngine, WidthTable};
use crate::model::{GenotypeTree, PrevalenceTable, TreeIndices};
use crate::paths::{
    CurvePath, Perturbations, to_curves, tracks_labels, tracks_paths, traditional_labels,
    traditional_paths,
};

/// Immutable input to [`compute_layout`].
#[derive(Debug, Clone)]
pub struct LayoutInput {
    pub tree: GenotypeTree,
    pub prevalence: PrevalenceTable,
    pub perturbations: Vec<PerturbationEvent>,
    pub clone_cols: Vec<CloneColour>,
    pub config: TimesweepConfig,
}

impl LayoutInput {
    /// Build the tree and prevalence tables from a raw document.
    pub fn from_document(doc: &TimesweepInput) -> Result<Self, TimesweepError> {
        let input = Self {
            tree: GenotypeTree::from_edges(&doc.tree_edges)?,
            prevalence: PrevalenceTable::from_records(&doc.clonal_prev, doc.timepoints.as_deref())?,
            perturbations: doc.perturbations.clone(),
            clone_cols: doc.clone_cols.clone(),
            config: doc.config.clone(),
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        for event in &self.perturbations {
            if !(event.frac > 0.0 && event.frac <= 1.0) {
                return Err(ConfigError::PerturbationFraction {
                    timepoint: event.prev_tp.clone(),
                    frac: event.frac,
                });
            }
        }
        Ok(())
    }
}

/// Everything downstream renderers consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub timepoints: Vec<String>,
    pub layout_order: Vec<GenotypeId>,
    pub tree: TreeIndices,
    pub layout: Layout,
    pub traditional_paths: Vec<GenotypePath>,
    pub tracks_paths: Vec<GenotypePath>,
    pub traditional_curves: Vec<CurvePath>,
    pub tracks_curves: Vec<CurvePath>,
    pub traditional_labels: Vec<PrevalenceLabel>,
    pub tracks_labels: Vec<PrevalenceLabel>,
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutResult {
    pub fn paths(&self, view: SweepView) -> &[GenotypePath] {
        match view {
            SweepView::Traditional => &self.traditional_paths,
            SweepView::Tracks => &self.tracks_paths,
        }
    }

    pub fn curves(&self, view: SweepView) -> &[CurvePath] {
        match view {
            SweepView::Traditional => &self.traditional_curves,
            SweepView::Tracks => &self.tracks_curves,
        }
    }

    pub fn labels(&self, view: SweepView) -> &[PrevalenceLabel] {
        match view {
            SweepView::Traditional => &self.traditional_labels,
            SweepView::Tracks => &self.tracks_labels,
        }
    }
}

/// Run the whole pipeline. Calling it twice on the same input yields
/// identical results.
#[tracing::instrument(skip_all, fields(policy = %input.config.genotype_position))]
pub fn compute_layout(input: &LayoutInput) -> Result<LayoutResult, TimesweepError> {
    input.validate()?;
    let LayoutInput {
        tree,
        prevalence,
        config,
        ..
    } = input;

    let mut warnings = data_gaps(tree, prevalence);

    let widths = WidthTable::compute(tree, prevalence, config.threshold);
    warnings.extend_from_slice(widths.warnings());

    let engine = LayoutEngine::new(tree, prevalence, &widths, config);
    let layout = engine.run();
    let order = engine.order();

    let (events, event_warnings) =
        Perturbations::resolve(&input.perturbations, layout.timepoints());
    warnings.extend(event_warnings);

    let traditional = traditional_paths(&layout, order, &events);
    let tracks = tracks_paths(&layout, order, prevalence, config.track_padding);

    for warning in &warnings {
        warning.log();
    }
    tracing::debug!(
        genotypes = order.len(),
        timepoints = layout.len(),
        perturbations = input.perturbations.len(),
        warnings = warnings.len(),
        "computed layout"
    );

    Ok(LayoutResult {
        timepoints: layout.timepoints().to_vec(),
        layout_order: order.to_vec(),
        tree: tree.indices().clone(),
        traditional_curves: to_curves(&traditional, config.canvas),
        tracks_curves: to_curves(&tracks, config.canvas),
        traditional_labels: traditional_labels(&layout, config.genotype_position),
        tracks_labels: tracks_labels(&tracks),
        traditional_paths: traditional,
        tracks_paths: tracks,
        layout,
        warnings,
    })
}

/// Parse-and-compute convenience for callers holding a raw document.
pub fn compute(doc: &TimesweepInput) -> Result<(LayoutInput, LayoutResult), TimesweepError> {
    let input = LayoutInput::from_document(doc)?;
    let result = compute_layout(&input)?;
    Ok((input, result))
}

fn data_gaps(tree: &GenotypeTree, prevalence: &PrevalenceTable) -> Vec<LayoutWarning> {
    let mut warnings: Vec<LayoutWarning> = tree
        .genotypes()
        .iter()
        .filter(|g| prevalence.max_prevalence(g).is_none())
        .map(|g| LayoutWarning::MissingPrevalence {
            genotype: g.clone(),
        })
        .collect();
    warnings.extend(
        prevalence
            .genotypes()
            .filter(|g| !tree.contains(g) || tree.is_phantom(g))
            .map(|g| LayoutWarning::UnknownGenotype {
                genotype: g.clone(),
            }),
    );
    warnings
}
