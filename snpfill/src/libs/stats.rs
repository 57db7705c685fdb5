use ndarray::ArrayView1;

use crate::structs::{Genotype, GenotypeMatrix};

/// Per-marker histogram of the four genotype codes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenotypeCounts {
    pub hom_ref: usize,
    pub het: usize,
    pub hom_alt: usize,
    pub missing: usize,
}

impl GenotypeCounts {
    pub fn from_column(column: ArrayView1<Genotype>) -> Self {
        let mut counts = Self::default();
        for genotype in column {
            match genotype {
                Genotype::HomRef => counts.hom_ref += 1,
                Genotype::Het => counts.het += 1,
                Genotype::HomAlt => counts.hom_alt += 1,
                Genotype::Missing => counts.missing += 1,
            }
        }
        counts
    }

    pub fn observed(&self) -> usize {
        self.hom_ref + self.het + self.hom_alt
    }

    pub fn total(&self) -> usize {
        self.observed() + self.missing
    }

    pub fn missing_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.missing as f64 / total as f64,
        }
    }

    /// Frequency of `HomRef` among observed calls. An all-missing column
    /// yields 0.0.
    pub fn hom_ref_frequency(&self) -> f64 {
        match self.observed() {
            0 => 0.0,
            observed => self.hom_ref as f64 / observed as f64,
        }
    }

    /// Alt-allele frequency over observed calls.
    pub fn alt_allele_frequency(&self) -> f64 {
        match self.observed() {
            0 => 0.0,
            observed => (self.het + 2 * self.hom_alt) as f64 / (2 * observed) as f64,
        }
    }

    /// The orientation flag: true when `HomRef` is the minor genotype.
    /// Two markers with differing flags need a flip when copying calls
    /// between them.
    pub fn ref_is_minor(&self) -> bool {
        self.hom_ref_frequency() <= 0.5
    }

    /// Sampling weights for the frequency fallback, in
    /// `[HomRef, Het, HomAlt]` order.
    pub fn as_weights(&self) -> [usize; 3] {
        [self.hom_ref, self.het, self.hom_alt]
    }
}

/// Orientation flags for every marker, computed once per run over the
/// observed calls of the input matrix.
pub fn orientation_flags(matrix: &GenotypeMatrix) -> Vec<bool> {
    (0..matrix.nmarkers())
        .map(|marker| matrix.genotype_counts(marker).ref_is_minor())
        .collect()
}
