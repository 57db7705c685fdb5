#![allow(dead_code)]
use std::path::PathBuf;

use color_eyre::Result;
use petgraph::Graph;

use snpfill::args::StandardArgs;
use snpfill::hierarchy::{Hierarchy, HierarchyNode, Metadata};

pub const TEST_MATRIX: &str = "tests/data/test_genotypes.csv";
pub const TEST_CLUSTERS: &str = "tests/data/test_clusters.csv";
pub const OUTDIR: &str = "tests/results";

pub fn standard_args(hierarchy: PathBuf, prefix: &str) -> StandardArgs {
    StandardArgs {
        file: PathBuf::from(TEST_MATRIX),
        clusters: PathBuf::from(TEST_CLUSTERS),
        hierarchy,
        output: PathBuf::from(OUTDIR),
        prefix: Some(prefix.to_string()),
    }
}

#[cfg(feature = "clap")]
pub fn silent_verbosity() -> snpfill::clap::LogAndVerbosity {
    snpfill::clap::LogAndVerbosity {
        verbosity: 1,
        log_file: None,
        silent: false,
    }
}

/// Write the test hierarchy to a uniquely named file so tests can run in
/// parallel: rs2 and rs3 merge at 0.05, rs1 joins them at the 0.3 root.
pub fn write_test_hierarchy(name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(OUTDIR)?;

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

    let hierarchy = Hierarchy::new(
        tree,
        Metadata {
            markers: vec!["rs1".into(), "rs2".into(), "rs3".into()],
            source: PathBuf::from(TEST_MATRIX),
        },
    )?;

    let path = PathBuf::from(format!("{OUTDIR}/{name}.tree.gz"));
    hierarchy.write_to_file(path.clone())?;
    Ok(path)
}
