/// The hierarchy-guided imputation algorithm and its full-matrix entry point
pub mod impute;

/// Medoid-only imputation entry point
pub mod impute_medoids;

/// Output marker names from matrix or hierarchy files
pub mod list_markers;

/// Shortcut to read matrix sample names
pub mod list_samples;
