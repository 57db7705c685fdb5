use std::path::PathBuf;

use thiserror::Error as ThisError;

#[rustfmt::skip]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Failed to open file: {path:?}")]
    Io { path: PathBuf },

    #[error("File contains zero rows: {path:?}")]
    EmptyFile { path: PathBuf },

    #[error("Unrecognized genotype code {value:?} for marker {marker}. Allowed codes are 0, 1, 2 and NA")]
    GenotypeParse { value: String, marker: String },

    #[error("Row {row} has {found} genotype fields, the header names {expected} markers")]
    RowLength { row: usize, found: usize, expected: usize },

    #[error("The genotype matrix has {matrix} markers but the {input} covers {found}")]
    MarkerCount { input: &'static str, matrix: usize, found: usize },

    #[error("The hierarchy was built for different marker names than the genotype matrix")]
    MarkerNames,

    #[error("The cluster file does not assign marker {marker} to any cluster")]
    ClusterCoverage { marker: String },

    #[error("The cluster file names an unknown marker {marker}")]
    UnknownMarker { marker: String },

    #[error("The cluster file assigns marker {marker} more than once")]
    DuplicateMarker { marker: String },

    #[error("Cluster {cluster} has {found} medoids, exactly one is required")]
    MedoidCount { cluster: usize, found: usize },

    #[error("Cluster assignment covers {markers} markers but carries {flags} medoid flags")]
    FlagCount { markers: usize, flags: usize },

    #[error("Medoid marker {marker} has zero observed genotypes and cannot anchor imputation")]
    NoObservedCalls { marker: String },

    #[error("The hierarchy has no leaf for marker {marker}")]
    HierarchyCoverage { marker: usize },

    #[error("Hierarchy node {node} lists marker {marker}, the matrix has only {nmarkers} markers")]
    MemberRange { node: usize, marker: usize, nmarkers: usize },

    #[error("Marker {marker} appears in more than one hierarchy leaf")]
    DuplicateLeaf { marker: usize },

    #[error("The hierarchy has {n} root nodes, exactly one is required")]
    RootCount { n: usize },

    #[error("Hierarchy height {height} at node {node} is outside [0, 1]")]
    HeightRange { node: usize, height: f64 },

    #[error("Hierarchy heights decrease from node {child} ({child_height}) to its parent {parent} ({parent_height})")]
    HeightOrder { parent: usize, parent_height: f64, child: usize, child_height: f64 },

    #[error("Medoid column {marker} still has missing genotypes after resolution")]
    UnresolvedMedoid { marker: String },

    #[error("File type: {ext} is not supported")]
    FileNotSupported { ext: String },
}
