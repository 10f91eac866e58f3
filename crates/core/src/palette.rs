use std::collections::BTreeMap;

use timesweep_protocol::{CloneColour, Color, GenotypeId};

use crate::model::GenotypeTree;

/// Stroke and fill colours per genotype.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    strokes: BTreeMap<GenotypeId, Color>,
    fills: BTreeMap<GenotypeId, Color>,
}

impl Palette {
    /// Derive lineage-coherent colours from the tree's linear chains.
    ///
    /// Chain `i` of `n` starts at hue `(i/n + 0.96) mod 1`; each member is
    /// darkened 20% from the one above, except the real root which shares
    /// the phantom chain's colour. User colours replace derived ones.
    pub fn derive(tree: &GenotypeTree, user: &[CloneColour], alpha: f64) -> Self {
        let chains = tree.linear_chains();
        let n = chains.len() as f64;
        let mut strokes = BTreeMap::new();

        for (i, chain) in chains.iter().enumerate() {
            let hue = (i as f64 / n + 0.96) % 1.0;
            let mut colour = Color::from_hsl(hue, 0.88, 0.77);
            strokes.insert(chain.root.clone(), colour);
            let phantom_chain = tree.is_phantom(&chain.root);
            for (k, member) in chain.members.iter().enumerate() {
                if !(phantom_chain && k == 0) {
                    colour = colour.darken(20.0);
                }
                strokes.insert(member.clone(), colour);
            }
        }
        for entry in user {
            strokes.insert(entry.clone_id.clone(), entry.colour);
        }

        let fills = strokes
            .iter()
            .map(|(g, c)| (g.clone(), c.lighten(alpha)))
            .collect();
        Self { strokes, fills }
    }

    pub fn stroke(&self, genotype: &str) -> Color {
        self.strokes.get(genotype).copied().unwrap_or(Color::BLACK)
    }

    pub fn fill(&self, genotype: &str) -> Color {
        self.fills.get(genotype).copied().unwrap_or(Color::WHITE)
    }
}
