use std::path::{Path, PathBuf};

use color_eyre::eyre::Context;
use color_eyre::Result;
use petgraph::prelude::NodeIndex;
use petgraph::Direction;
use petgraph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::io::get_output;

/// A node of the marker hierarchy. Edges point from a parent group to its
/// children; ascending from a leaf widens the neighbor pool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum HierarchyNode {
    /// A single marker.
    Leaf { marker: usize },
    /// A merged group of markers with its dissimilarity height
    /// (`1 - minimum pairwise absolute correlation` of the merge).
    Internal { members: Vec<usize>, height: f64 },
}

impl HierarchyNode {
    pub fn height(&self) -> f64 {
        match self {
            Self::Leaf { .. } => 0.0,
            Self::Internal { height, .. } => *height,
        }
    }

    pub fn members(&self) -> &[usize] {
        match self {
            Self::Leaf { marker } => std::slice::from_ref(marker),
            Self::Internal { members, .. } => members,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Metadata {
    pub markers: Vec<String>,
    pub source: PathBuf,
}

/// A rooted tree over markers, built externally from a dendrogram of
/// correlation distances and consumed read-only during imputation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Hierarchy {
    pub tree: Graph<HierarchyNode, ()>,
    pub metadata: Metadata,

    // Marker to leaf lookup, rebuilt after deserialization
    #[serde(skip)]
    leaves: Vec<NodeIndex>,
}

impl Hierarchy {
    pub fn new(tree: Graph<HierarchyNode, ()>, metadata: Metadata) -> Result<Self, Error> {
        let mut hierarchy = Self {
            tree,
            metadata,
            leaves: vec![],
        };
        hierarchy.index_leaves()?;
        Ok(hierarchy)
    }

    pub fn nmarkers(&self) -> usize {
        self.metadata.markers.len()
    }

    /// The leaf holding `marker`. O(1) after `index_leaves`.
    pub fn leaf_of(&self, marker: usize) -> NodeIndex {
        self.leaves[marker]
    }

    /// The parent group, or None at the root.
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree
            .neighbors_directed(node, Direction::Incoming)
            .next()
    }

    pub fn height(&self, node: NodeIndex) -> f64 {
        self.tree[node].height()
    }

    pub fn members(&self, node: NodeIndex) -> &[usize] {
        self.tree[node].members()
    }

    /// Enumerate leaves and check the tree invariants: one root, every
    /// marker in exactly one leaf, group members inside the marker range,
    /// heights in [0, 1] and non-decreasing toward the root.
    fn index_leaves(&mut self) -> Result<(), Error> {
        let nmarkers = self.metadata.markers.len();

        let roots = self
            .tree
            .node_indices()
            .filter(|idx| {
                self.tree
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .count();
        if roots != 1 {
            return Err(Error::RootCount { n: roots });
        }

        let mut leaves: Vec<Option<NodeIndex>> = vec![None; nmarkers];

        for idx in self.tree.node_indices() {
            match &self.tree[idx] {
                HierarchyNode::Leaf { marker } => {
                    let slot = leaves
                        .get_mut(*marker)
                        .ok_or(Error::HierarchyCoverage { marker: *marker })?;
                    if slot.replace(idx).is_some() {
                        return Err(Error::DuplicateLeaf { marker: *marker });
                    }
                }
                HierarchyNode::Internal { members, height } => {
                    if !(0.0..=1.0).contains(height) {
                        return Err(Error::HeightRange {
                            node: idx.index(),
                            height: *height,
                        });
                    }
                    // Member indices feed straight into matrix column
                    // lookups during imputation
                    if let Some(&marker) = members.iter().find(|&&m| m >= nmarkers) {
                        return Err(Error::MemberRange {
                            node: idx.index(),
                            marker,
                            nmarkers,
                        });
                    }
                }
            }
        }

        for edge in self.tree.edge_indices() {
            let (parent, child) = self.tree.edge_endpoints(edge).expect("edge endpoints");
            let (parent_height, child_height) = (self.height(parent), self.height(child));
            if parent_height < child_height {
                return Err(Error::HeightOrder {
                    parent: parent.index(),
                    parent_height,
                    child: child.index(),
                    child_height,
                });
            }
        }

        self.leaves = leaves
            .into_iter()
            .enumerate()
            .map(|(marker, slot)| slot.ok_or(Error::HierarchyCoverage { marker }))
            .collect::<Result<Vec<NodeIndex>, Error>>()?;

        Ok(())
    }
}

// Io
impl Hierarchy {
    pub fn write_to_file(&self, path: PathBuf) -> Result<()> {
        tracing::info!("Hierarchy output: {path:?}.");
        let mut output = get_output(Some(path))?;

        let mut writer = bgzip::BGZFWriter::new(&mut output, bgzip::Compression::default());

        serde_json::to_writer(&mut writer, &self)?;

        writer.close()?;

        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Hierarchy> {
        let file = std::fs::File::open(path).wrap_err(Error::Io {
            path: path.to_path_buf(),
        })?;
        let reader = bgzip::BGZFReader::new(file)?;
        let mut hierarchy: Hierarchy = serde_json::from_reader(reader)?;

        hierarchy.index_leaves()?;

        Ok(hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(nmarkers: usize) -> Metadata {
        Metadata {
            markers: (0..nmarkers).map(|m| format!("rs{m}")).collect(),
            source: PathBuf::new(),
        }
    }

    /// Root over { leaf 0, internal [1, 2] }.
    fn three_marker_tree() -> Graph<HierarchyNode, ()> {
        let mut tree = Graph::new();
        let root = tree.add_node(HierarchyNode::Internal {
            members: vec![0, 1, 2],
            height: 0.3,
        });
        let pair = tree.add_node(HierarchyNode::Internal {
            members: vec![1, 2],
            height: 0.05,
        });
        let l0 = tree.add_node(HierarchyNode::Leaf { marker: 0 });
        let l1 = tree.add_node(HierarchyNode::Leaf { marker: 1 });
        let l2 = tree.add_node(HierarchyNode::Leaf { marker: 2 });
        tree.add_edge(root, l0, ());
        tree.add_edge(root, pair, ());
        tree.add_edge(pair, l1, ());
        tree.add_edge(pair, l2, ());
        tree
    }

    #[test]
    fn test_navigation() {
        let hierarchy = Hierarchy::new(three_marker_tree(), metadata(3)).unwrap();

        let leaf = hierarchy.leaf_of(1);
        assert_eq!(&[1], hierarchy.members(leaf));
        assert_eq!(0.0, hierarchy.height(leaf));

        let pair = hierarchy.parent(leaf).unwrap();
        assert_eq!(&[1, 2], hierarchy.members(pair));
        assert_eq!(0.05, hierarchy.height(pair));

        let root = hierarchy.parent(pair).unwrap();
        assert_eq!(&[0, 1, 2], hierarchy.members(root));
        assert_eq!(0.3, hierarchy.height(root));

        // Widening past the root signals exhaustion
        assert_eq!(None, hierarchy.parent(root));
    }

    #[test]
    fn test_every_marker_needs_a_leaf() {
        let err = Hierarchy::new(three_marker_tree(), metadata(4));
        assert!(matches!(err, Err(Error::HierarchyCoverage { marker: 3 })));
    }

    #[test]
    fn test_group_members_must_be_in_range() {
        let mut tree = Graph::new();
        let root = tree.add_node(HierarchyNode::Internal {
            members: vec![0, 1, 5],
            height: 0.4,
        });
        let l0 = tree.add_node(HierarchyNode::Leaf { marker: 0 });
        let l1 = tree.add_node(HierarchyNode::Leaf { marker: 1 });
        tree.add_edge(root, l0, ());
        tree.add_edge(root, l1, ());

        // An out-of-range member would otherwise reach matrix column
        // lookups during resolution
        let err = Hierarchy::new(tree, metadata(2));
        assert!(matches!(
            err,
            Err(Error::MemberRange { marker: 5, nmarkers: 2, .. })
        ));
    }

    #[test]
    fn test_single_root_required() {
        let mut tree = three_marker_tree();
        tree.add_node(HierarchyNode::Leaf { marker: 3 });
        let err = Hierarchy::new(tree, metadata(4));
        assert!(matches!(err, Err(Error::RootCount { n: 2 })));
    }

    #[test]
    fn test_heights_must_not_decrease() {
        let mut tree = Graph::new();
        let root = tree.add_node(HierarchyNode::Internal {
            members: vec![0, 1],
            height: 0.1,
        });
        let inner = tree.add_node(HierarchyNode::Internal {
            members: vec![0, 1],
            height: 0.4,
        });
        let l0 = tree.add_node(HierarchyNode::Leaf { marker: 0 });
        let l1 = tree.add_node(HierarchyNode::Leaf { marker: 1 });
        tree.add_edge(root, inner, ());
        tree.add_edge(inner, l0, ());
        tree.add_edge(inner, l1, ());

        let err = Hierarchy::new(tree, metadata(2));
        assert!(matches!(err, Err(Error::HeightOrder { .. })));
    }
}
