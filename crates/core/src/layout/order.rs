use timesweep_protocol::GenotypeId;

use crate::model::{GenotypeTree, PrevalenceTable};

/// Depth-first order of the real genotypes.
///
/// Siblings follow tree order, or with `sort` their descending emergence
/// value. The sort is a stable ascending sort (never-observed genotypes
/// lowest) that is then reversed, so equal values end up in reverse tree
/// order.
pub fn layout_order(
    tree: &GenotypeTree,
    prevalence: &PrevalenceTable,
    sort: bool,
) -> Vec<GenotypeId> {
    let mut order = Vec::with_capacity(tree.genotypes().len());
    let mut stack = vec![tree.root().clone()];
    while let Some(genotype) = stack.pop() {
        let mut children: Vec<GenotypeId> = tree.children_of(&genotype).to_vec();
        if sort {
            children.sort_by(|a, b| {
                let va = prevalence.emergence_value(a).unwrap_or(f64::NEG_INFINITY);
                let vb = prevalence.emergence_value(b).unwrap_or(f64::NEG_INFINITY);
                va.total_cmp(&vb)
            });
            children.reverse();
        }
        stack.extend(children.into_iter().rev());
        order.push(genotype);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::{prevalence, tree};

    fn names(order: &[GenotypeId]) -> Vec<&str> {
        order.iter().map(GenotypeId::as_str).collect()
    }

    #[test]
    fn tree_order_is_preorder() {
        let t = tree(&[("R", "A"), ("R", "B"), ("A", "C")]);
        let p = prevalence(&[]);
        assert_eq!(names(&layout_order(&t, &p, false)), vec!["R", "A", "C", "B"]);
    }

    #[test]
    fn sorted_by_descending_emergence() {
        let t = tree(&[("R", "A"), ("R", "B"), ("R", "C"), ("R", "D")]);
        let p = prevalence(&[
            ("T1", "R", 0.5),
            ("T1", "A", 0.1),
            ("T2", "B", 0.3),
            ("T2", "C", 0.1),
        ]);
        // D never observed sorts last; A and C tie and come out reversed.
        assert_eq!(
            names(&layout_order(&t, &p, true)),
            vec!["R", "B", "C", "A", "D"]
        );
    }
}
