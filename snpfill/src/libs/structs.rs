use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::stats::GenotypeCounts;

/// One genotype call. `HomRef` and `HomAlt` swap under an orientation
/// flip, `Het` and `Missing` are flip-invariant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Genotype {
    Missing,
    HomRef,
    Het,
    HomAlt,
}

impl Genotype {
    pub fn is_missing(self) -> bool {
        self == Self::Missing
    }

    /// The same call under the opposite allele orientation.
    pub fn flipped(self) -> Self {
        match self {
            Self::HomRef => Self::HomAlt,
            Self::HomAlt => Self::HomRef,
            other => other,
        }
    }

    pub fn from_field(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::HomRef),
            "1" => Some(Self::Het),
            "2" => Some(Self::HomAlt),
            "NA" | "." | "" => Some(Self::Missing),
            _ => None,
        }
    }

    /// Alt-allele dosage code used in csv output. 255 marks a missing call.
    pub fn to_dosage(self) -> u8 {
        match self {
            Self::HomRef => 0,
            Self::Het => 1,
            Self::HomAlt => 2,
            Self::Missing => 255,
        }
    }

    pub fn to_field(self) -> &'static str {
        match self {
            Self::HomRef => "0",
            Self::Het => "1",
            Self::HomAlt => "2",
            Self::Missing => "NA",
        }
    }
}

/// A genotype matrix, samples as rows and markers as columns.
#[derive(Debug, Clone)]
pub struct GenotypeMatrix {
    samples: Vec<String>,
    markers: Vec<String>,
    pub genotypes: Array2<Genotype>,
}

impl GenotypeMatrix {
    pub fn new(
        samples: Vec<String>,
        markers: Vec<String>,
        genotypes: Array2<Genotype>,
    ) -> Result<Self, Error> {
        if genotypes.ncols() != markers.len() {
            return Err(Error::MarkerCount {
                input: "genotype rows",
                matrix: markers.len(),
                found: genotypes.ncols(),
            });
        }
        if genotypes.nrows() != samples.len() {
            return Err(Error::RowLength {
                row: 0,
                found: genotypes.nrows(),
                expected: samples.len(),
            });
        }
        Ok(Self {
            samples,
            markers,
            genotypes,
        })
    }

    pub fn nsamples(&self) -> usize {
        self.genotypes.nrows()
    }

    pub fn nmarkers(&self) -> usize {
        self.genotypes.ncols()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn marker_name(&self, marker: usize) -> &str {
        &self.markers[marker]
    }

    pub fn column(&self, marker: usize) -> ArrayView1<'_, Genotype> {
        self.genotypes.column(marker)
    }

    pub fn set_column(&mut self, marker: usize, calls: &[Genotype]) {
        for (slot, call) in self.genotypes.column_mut(marker).iter_mut().zip(calls) {
            *slot = *call;
        }
    }

    pub fn genotype_counts(&self, marker: usize) -> GenotypeCounts {
        GenotypeCounts::from_column(self.column(marker))
    }

    pub fn has_missing(&self, marker: usize) -> bool {
        self.column(marker).iter().any(|g| g.is_missing())
    }

    pub fn nmissing(&self) -> usize {
        self.genotypes.iter().filter(|g| g.is_missing()).count()
    }

    /// Dosage-coded copy for .npy output.
    pub fn to_dosage_array(&self) -> Array2<u8> {
        self.genotypes.map(|g| g.to_dosage())
    }
}

/// Marker-to-cluster mapping with one designated medoid per cluster.
///
/// Member lists keep the enumeration order of the cluster file; candidate
/// order during imputation follows it.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    cluster_of: Vec<usize>,
    members: IndexMap<usize, Vec<usize>>,
    medoid_of: IndexMap<usize, usize>,
    medoids: Vec<usize>,
    is_medoid: Vec<bool>,
}

impl ClusterAssignment {
    pub fn new(cluster_of: Vec<usize>, medoid_flags: Vec<bool>) -> Result<Self, Error> {
        if medoid_flags.len() != cluster_of.len() {
            return Err(Error::FlagCount {
                markers: cluster_of.len(),
                flags: medoid_flags.len(),
            });
        }

        let mut members: IndexMap<usize, Vec<usize>> = IndexMap::new();
        let mut medoid_of: IndexMap<usize, usize> = IndexMap::new();
        let mut medoids = vec![];

        for (marker, &cluster) in cluster_of.iter().enumerate() {
            members.entry(cluster).or_default().push(marker);
            if medoid_flags[marker] {
                medoids.push(marker);
                if medoid_of.insert(cluster, marker).is_some() {
                    return Err(Error::MedoidCount { cluster, found: 2 });
                }
            }
        }

        for &cluster in members.keys() {
            if !medoid_of.contains_key(&cluster) {
                return Err(Error::MedoidCount { cluster, found: 0 });
            }
        }

        Ok(Self {
            cluster_of,
            members,
            medoid_of,
            medoids,
            is_medoid: medoid_flags,
        })
    }

    pub fn nmarkers(&self) -> usize {
        self.cluster_of.len()
    }

    pub fn nclusters(&self) -> usize {
        self.members.len()
    }

    pub fn cluster_of(&self, marker: usize) -> usize {
        self.cluster_of[marker]
    }

    pub fn members(&self, cluster: usize) -> &[usize] {
        &self.members[&cluster]
    }

    /// Medoid markers in cluster-file enumeration order.
    pub fn medoids(&self) -> &[usize] {
        &self.medoids
    }

    pub fn medoid_of(&self, cluster: usize) -> usize {
        self.medoid_of[&cluster]
    }

    pub fn is_medoid(&self, marker: usize) -> bool {
        self.is_medoid[marker]
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_flip_is_an_involution() {
        for g in [Genotype::Missing, Genotype::HomRef, Genotype::Het, Genotype::HomAlt] {
            assert_eq!(g, g.flipped().flipped());
        }
        assert_eq!(Genotype::HomAlt, Genotype::HomRef.flipped());
        assert_eq!(Genotype::HomRef, Genotype::HomAlt.flipped());
        assert_eq!(Genotype::Het, Genotype::Het.flipped());
        assert_eq!(Genotype::Missing, Genotype::Missing.flipped());
    }

    #[test]
    fn test_genotype_fields() {
        assert_eq!(Some(Genotype::HomRef), Genotype::from_field("0"));
        assert_eq!(Some(Genotype::Het), Genotype::from_field("1"));
        assert_eq!(Some(Genotype::HomAlt), Genotype::from_field("2"));
        assert_eq!(Some(Genotype::Missing), Genotype::from_field("NA"));
        assert_eq!(Some(Genotype::Missing), Genotype::from_field("."));
        assert_eq!(None, Genotype::from_field("3"));

        for g in [Genotype::HomRef, Genotype::Het, Genotype::HomAlt, Genotype::Missing] {
            assert_eq!(Some(g), Genotype::from_field(g.to_field()));
        }
    }

    #[test]
    fn test_cluster_assignment() {
        let clusters = ClusterAssignment::new(
            vec![0, 1, 1, 0],
            vec![true, true, false, false],
        ).unwrap();

        assert_eq!(2, clusters.nclusters());
        assert_eq!(&[0, 3], clusters.members(0));
        assert_eq!(&[1, 2], clusters.members(1));
        assert_eq!(&[0, 1], clusters.medoids());
        assert_eq!(1, clusters.medoid_of(1));
        assert!(clusters.is_medoid(1));
        assert!(!clusters.is_medoid(2));
    }

    #[test]
    fn test_cluster_assignment_flag_length() {
        let err = ClusterAssignment::new(vec![0, 0, 1], vec![true, true]);
        assert!(matches!(err, Err(Error::FlagCount { markers: 3, flags: 2 })));
    }

    #[test]
    fn test_cluster_assignment_requires_one_medoid() {
        let missing = ClusterAssignment::new(vec![0, 0], vec![false, false]);
        assert!(matches!(missing, Err(Error::MedoidCount { cluster: 0, found: 0 })));

        let twice = ClusterAssignment::new(vec![0, 0], vec![true, true]);
        assert!(matches!(twice, Err(Error::MedoidCount { cluster: 0, found: 2 })));
    }
}
