use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use timesweep_protocol::{GenotypeId, TreeEdge};

/// Id of the synthetic node inserted above the real root.
pub const PHANTOM_ROOT: &str = "phantomRoot";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("edge list is empty")]
    Empty,
    #[error("genotype {0} is listed as its own parent")]
    SelfLoop(GenotypeId),
    #[error("genotype {genotype} has more than one parent ({first}, {second})")]
    MultipleParents {
        genotype: GenotypeId,
        first: GenotypeId,
        second: GenotypeId,
    },
    #[error("ancestry of genotype {0} never reaches a root (cycle)")]
    Cycle(GenotypeId),
    #[error("edges form more than one tree (roots: {})", join_ids(.0))]
    MultipleRoots(Vec<GenotypeId>),
    #[error("genotype {0} is not reachable from the root")]
    Disconnected(GenotypeId),
    #[error("genotype id {0:?} is reserved for the synthetic root")]
    ReservedId(String),
}

fn join_ids(ids: &[GenotypeId]) -> String {
    ids.iter().map(GenotypeId::as_str).collect::<Vec<_>>().join(", ")
}

/// One node of the ancestry arena. Relationships are arena indices.
#[derive(Debug, Clone)]
pub struct GenotypeNode {
    pub id: GenotypeId,
    pub parent: Option<usize>,
    /// Children in edge-list order.
    pub children: Vec<usize>,
    pub phantom: bool,
}

/// A maximal run of single-child descendants starting at `root`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearChain {
    pub root: GenotypeId,
    /// Chain members below `root`, top-down.
    pub members: Vec<GenotypeId>,
}

/// Relationship indices derived once from the hierarchy.
///
/// Every map is keyed by all nodes including the phantom root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeIndices {
    /// Pre-order descendants, excluding the node itself.
    pub descendants: BTreeMap<GenotypeId, Vec<GenotypeId>>,
    /// Ancestors, outermost first.
    pub ancestors: BTreeMap<GenotypeId, Vec<GenotypeId>>,
    pub parent: BTreeMap<GenotypeId, GenotypeId>,
    pub children: BTreeMap<GenotypeId, Vec<GenotypeId>>,
    pub siblings: BTreeMap<GenotypeId, Vec<GenotypeId>>,
    pub chains: Vec<LinearChain>,
    pub height: usize,
}

/// Rooted ancestry tree stored as an arena, with a phantom root above the
/// real root.
#[derive(Debug, Clone)]
pub struct GenotypeTree {
    nodes: Vec<GenotypeNode>,
    index: HashMap<GenotypeId, usize>,
    phantom: usize,
    root: usize,
    /// Real genotypes in pre-order (phantom excluded).
    preorder: Vec<GenotypeId>,
    indices: TreeIndices,
}

impl GenotypeTree {
    /// Build the hierarchy from `(parent, child)` edges.
    ///
    /// The root is found by walking parent links backwards from the first
    /// edge's source. A walk that revisits a node, a second parentless node,
    /// or a node unreachable from the root makes the edge list malformed.
    pub fn from_edges(edges: &[TreeEdge]) -> Result<Self, TreeError> {
        let first = edges.first().ok_or(TreeError::Empty)?;

        let mut nodes: Vec<GenotypeNode> = Vec::new();
        let mut index: HashMap<GenotypeId, usize> = HashMap::new();
        let mut intern = |id: &GenotypeId, nodes: &mut Vec<GenotypeNode>| -> Result<usize, TreeError> {
            if id.as_str() == PHANTOM_ROOT {
                return Err(TreeError::ReservedId(id.to_string()));
            }
            Ok(*index.entry(id.clone()).or_insert_with(|| {
                nodes.push(GenotypeNode {
                    id: id.clone(),
                    parent: None,
                    children: Vec::new(),
                    phantom: false,
                });
                nodes.len() - 1
            }))
        };

        for edge in edges {
            if edge.source == edge.target {
                return Err(TreeError::SelfLoop(edge.source.clone()));
            }
            let parent = intern(&edge.source, &mut nodes)?;
            let child = intern(&edge.target, &mut nodes)?;
            if let Some(existing) = nodes[child].parent {
                return Err(TreeError::MultipleParents {
                    genotype: edge.target.clone(),
                    first: nodes[existing].id.clone(),
                    second: edge.source.clone(),
                });
            }
            nodes[child].parent = Some(parent);
            nodes[parent].children.push(child);
        }

        // Walk target -> source links from the first edge to the root.
        let mut root = index[&first.source];
        let mut visited = HashSet::from([root]);
        while let Some(parent) = nodes[root].parent {
            if !visited.insert(parent) {
                return Err(TreeError::Cycle(nodes[parent].id.clone()));
            }
            root = parent;
        }

        let roots: Vec<GenotypeId> = nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id.clone())
            .collect();
        if roots.len() > 1 {
            return Err(TreeError::MultipleRoots(roots));
        }

        let phantom = nodes.len();
        nodes.push(GenotypeNode {
            id: GenotypeId::from(PHANTOM_ROOT),
            parent: None,
            children: vec![root],
            phantom: true,
        });
        nodes[root].parent = Some(phantom);
        index.insert(GenotypeId::from(PHANTOM_ROOT), phantom);

        let order = preorder(&nodes, phantom);
        if order.len() != nodes.len() {
            let reached: HashSet<usize> = order.iter().copied().collect();
            let stray = (0..nodes.len()).find(|i| !reached.contains(i)).unwrap_or(root);
            return Err(TreeError::Disconnected(nodes[stray].id.clone()));
        }

        let indices = derive_indices(&nodes, &order, phantom);
        let preorder = order
            .iter()
            .filter(|&&i| i != phantom)
            .map(|&i| nodes[i].id.clone())
            .collect();

        tracing::debug!(
            genotypes = nodes.len() - 1,
            root = %nodes[root].id,
            height = indices.height,
            "built genotype tree"
        );

        Ok(Self {
            nodes,
            index,
            phantom,
            root,
            preorder,
            indices,
        })
    }

    /// The real (first non-synthetic) root.
    pub fn root(&self) -> &GenotypeId {
        &self.nodes[self.root].id
    }

    pub fn phantom_root(&self) -> &GenotypeId {
        &self.nodes[self.phantom].id
    }

    pub fn is_phantom(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| n.phantom)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GenotypeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Real genotypes in pre-order, tree order among siblings.
    pub fn genotypes(&self) -> &[GenotypeId] {
        &self.preorder
    }

    pub fn descendants_of(&self, id: &str) -> &[GenotypeId] {
        self.indices.descendants.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn ancestors_of(&self, id: &str) -> &[GenotypeId] {
        self.indices.ancestors.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn children_of(&self, id: &str) -> &[GenotypeId] {
        self.indices.children.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn parent_of(&self, id: &str) -> Option<&GenotypeId> {
        self.indices.parent.get(id)
    }

    pub fn siblings_of(&self, id: &str) -> &[GenotypeId] {
        self.indices.siblings.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn linear_chains(&self) -> &[LinearChain] {
        &self.indices.chains
    }

    /// Longest ancestor list over all nodes (the phantom root counts).
    pub fn height(&self) -> usize {
        self.indices.height
    }

    pub fn indices(&self) -> &TreeIndices {
        &self.indices
    }
}

fn preorder(nodes: &[GenotypeNode], start: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(nodes[i].children.iter().rev());
    }
    order
}

fn derive_indices(nodes: &[GenotypeNode], order: &[usize], phantom: usize) -> TreeIndices {
    let id = |i: usize| nodes[i].id.clone();
    let mut indices = TreeIndices::default();

    for &i in order {
        let below = preorder(nodes, i);
        indices
            .descendants
            .insert(id(i), below[1..].iter().map(|&d| id(d)).collect());
        indices.ancestors.insert(id(i), Vec::new());
        indices
            .children
            .insert(id(i), nodes[i].children.iter().map(|&c| id(c)).collect());
        if let Some(p) = nodes[i].parent {
            indices.parent.insert(id(i), id(p));
        }
        let siblings = match nodes[i].parent {
            Some(p) => nodes[p]
                .children
                .iter()
                .filter(|&&s| s != i)
                .map(|&s| id(s))
                .collect(),
            None => Vec::new(),
        };
        indices.siblings.insert(id(i), siblings);
    }

    // Ancestry is the inverse of descent, so the two relations cannot drift.
    for &i in order {
        let node_id = id(i);
        let descendants = indices.descendants[&node_id].clone();
        for d in descendants {
            if let Some(list) = indices.ancestors.get_mut(&d) {
                list.push(node_id.clone());
            }
        }
    }

    indices.height = indices.ancestors.values().map(Vec::len).max().unwrap_or(0);
    collect_chains(nodes, phantom, None, &mut indices.chains);
    indices
}

fn collect_chains(
    nodes: &[GenotypeNode],
    node: usize,
    chain: Option<usize>,
    chains: &mut Vec<LinearChain>,
) {
    let chain = match chain {
        Some(c) => {
            chains[c].members.push(nodes[node].id.clone());
            c
        }
        None => {
            chains.push(LinearChain {
                root: nodes[node].id.clone(),
                members: Vec::new(),
            });
            chains.len() - 1
        }
    };

    match nodes[node].children.as_slice() {
        [only] => collect_chains(nodes, *only, Some(chain), chains),
        children => {
            for &child in children {
                collect_chains(nodes, child, None, chains);
            }
        }
    }
}
