use std::collections::HashSet;

use color_eyre::Result;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;

use crate::error::Error;
use crate::hierarchy::Hierarchy;
use crate::stats::GenotypeCounts;
use crate::structs::{ClusterAssignment, Genotype, GenotypeMatrix};

/// Copy orientation-corrected calls from `candidates` into the
/// still-missing slots of `target`, earlier candidates first. Returns
/// whether any slot is still missing.
///
/// A candidate that is itself missing at a queried position contributes
/// `Missing` there, which leaves the slot untouched for later candidates.
pub fn fill_from_candidates(
    target: &mut [Genotype],
    matrix: &GenotypeMatrix,
    candidates: &[usize],
    target_flip: bool,
    flips: &[bool],
) -> bool {
    for &candidate in candidates {
        if !target.iter().any(|g| g.is_missing()) {
            break;
        }

        let calls = matrix.column(candidate);
        let flip = flips[candidate] != target_flip;

        for (slot, call) in target.iter_mut().zip(calls) {
            if slot.is_missing() {
                *slot = match flip {
                    true => call.flipped(),
                    false => *call,
                };
            }
        }
    }

    target.iter().any(|g| g.is_missing())
}

/// Resolve one medoid marker's column to a fully observed vector.
///
/// Candidates are tried in three stages: markers of the same cluster
/// (zero clustering distance), then the hierarchy ancestor groups of the
/// marker's leaf while their height stays within `1 - min_abs_cor`, and
/// finally draws from the marker's own observed genotype distribution.
pub fn resolve_marker(
    matrix: &GenotypeMatrix,
    clusters: &ClusterAssignment,
    hierarchy: &Hierarchy,
    flips: &[bool],
    marker: usize,
    min_abs_cor: f64,
    rng: &mut StdRng,
) -> Result<Vec<Genotype>> {
    let mut column: Vec<Genotype> = matrix.column(marker).to_vec();
    if !column.iter().any(|g| g.is_missing()) {
        return Ok(column);
    }

    let max_height = 1.0 - min_abs_cor;
    let mut tried: HashSet<usize> = HashSet::new();
    tried.insert(marker);

    // Markers the clustering judged identical to this one
    let siblings: Vec<usize> = clusters
        .members(clusters.cluster_of(marker))
        .iter()
        .copied()
        .filter(|&m| m != marker)
        .collect();
    let mut unsolved = fill_from_candidates(&mut column, matrix, &siblings, flips[marker], flips);
    tried.extend(siblings);

    // Widen through the ancestor groups until resolved, the height
    // exceeds the correlation threshold or the root is exhausted
    let mut node = hierarchy.parent(hierarchy.leaf_of(marker));
    while unsolved {
        let Some(group) = node else { break };
        if hierarchy.height(group) > max_height {
            break;
        }

        let candidates: Vec<usize> = hierarchy
            .members(group)
            .iter()
            .copied()
            .filter(|m| !tried.contains(m))
            .collect();
        unsolved = fill_from_candidates(&mut column, matrix, &candidates, flips[marker], flips);
        tried.extend(candidates);

        node = hierarchy.parent(group);
    }

    if unsolved {
        frequency_fallback(
            &mut column,
            matrix.genotype_counts(marker),
            matrix.marker_name(marker),
            rng,
        )?;
    }

    Ok(column)
}

/// Replace the remaining missing slots with independent draws from the
/// marker's own observed genotype distribution.
fn frequency_fallback(
    column: &mut [Genotype],
    counts: GenotypeCounts,
    marker: &str,
    rng: &mut StdRng,
) -> Result<()> {
    if counts.observed() == 0 {
        return Err(Error::NoObservedCalls {
            marker: marker.to_string(),
        })?;
    }

    let weighted = WeightedIndex::new(counts.as_weights())?;

    for slot in column.iter_mut().filter(|g| g.is_missing()) {
        *slot = match weighted.sample(rng) {
            0 => Genotype::HomRef,
            1 => Genotype::Het,
            _ => Genotype::HomAlt,
        };
    }

    Ok(())
}
