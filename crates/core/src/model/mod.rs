pub mod prevalence;
pub mod tree;

pub use prevalence::{ORIGIN_TIMEPOINT, PrevalenceError, PrevalenceTable};
pub use tree::{GenotypeNode, GenotypeTree, LinearChain, PHANTOM_ROOT, TreeError, TreeIndices};
