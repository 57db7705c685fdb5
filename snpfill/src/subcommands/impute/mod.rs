pub mod resolver;

use color_eyre::eyre::ensure;
use color_eyre::Result;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::args::StandardArgs;
use crate::error::Error;
use crate::hierarchy::Hierarchy;
use crate::io::open_csv_writer;
use crate::io::push_to_output;
use crate::io::read_cluster_assignment;
use crate::io::read_genotype_matrix;
use crate::io::write_genotype_matrix;
use crate::io::write_genotype_matrix_npy;
use crate::stats::orientation_flags;
use crate::structs::{ClusterAssignment, Genotype, GenotypeMatrix};

use resolver::resolve_marker;

#[derive(Debug, Clone, Copy)]
pub struct ImputeParams {
    /// Smallest absolute correlation still accepted while widening the
    /// neighbor search; ascent stops once a group's height exceeds
    /// `1 - min_abs_cor`.
    pub min_abs_cor: f64,
    /// Base seed for the frequency fallback. Each medoid column derives
    /// its own sub-stream from it, so a fixed seed gives bit-identical
    /// output at any thread count. None seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ImputeParams {
    fn default() -> Self {
        Self {
            min_abs_cor: 0.1,
            seed: None,
        }
    }
}

#[doc(hidden)]
pub fn run(args: StandardArgs, min_abs_cor: f64, seed: Option<u64>, npy: bool) -> Result<()> {
    let now = std::time::Instant::now();

    let matrix = read_genotype_matrix(&args.file)?;
    tracing::info!(
        "Read {} samples x {} markers with {} missing genotypes.",
        matrix.nsamples(),
        matrix.nmarkers(),
        matrix.nmissing()
    );

    let clusters = read_cluster_assignment(&args.clusters, matrix.markers())?;
    let hierarchy = Hierarchy::from_file(&args.hierarchy)?;
    ensure!(
        hierarchy.metadata.markers.as_slice() == matrix.markers(),
        Error::MarkerNames
    );

    let params = ImputeParams { min_abs_cor, seed };
    let imputed = impute(&matrix, &clusters, &hierarchy, &params)?;
    tracing::info!("Imputation finished in {:?}.", now.elapsed());

    let mut output = args.output.clone();
    push_to_output(&args, &mut output, "imputed", "csv");
    write_genotype_matrix(&imputed, open_csv_writer(output)?)?;

    if npy {
        let mut output = args.output.clone();
        push_to_output(&args, &mut output, "imputed", "npy");
        write_genotype_matrix_npy(&imputed, output)?;
    }

    Ok(())
}

/// Impute every missing genotype: resolve all medoid columns, then fill
/// the remaining markers of each cluster from their resolved medoid.
///
/// The input matrix is read-only; a fully populated copy is returned.
pub fn impute(
    matrix: &GenotypeMatrix,
    clusters: &ClusterAssignment,
    hierarchy: &Hierarchy,
    params: &ImputeParams,
) -> Result<GenotypeMatrix> {
    validate_inputs(matrix, clusters, hierarchy)?;

    // Orientation flags are derived from the observed input calls and
    // shared by both passes
    let flips = orientation_flags(matrix);

    let mut imputed = resolve_with_flips(matrix, clusters, hierarchy, &flips, params)?;
    propagate_clusters(&mut imputed, clusters, &flips)?;

    Ok(imputed)
}

/// The medoid-only entry point: resolve every representative column and
/// leave the other markers untouched.
pub fn resolve_medoids(
    matrix: &GenotypeMatrix,
    clusters: &ClusterAssignment,
    hierarchy: &Hierarchy,
    params: &ImputeParams,
) -> Result<GenotypeMatrix> {
    validate_inputs(matrix, clusters, hierarchy)?;
    let flips = orientation_flags(matrix);
    resolve_with_flips(matrix, clusters, hierarchy, &flips, params)
}

/// Resolve all medoid columns as an independent parallel map over the
/// read-only input and reassemble in the original column order. Any
/// column failure aborts the whole batch.
fn resolve_with_flips(
    matrix: &GenotypeMatrix,
    clusters: &ClusterAssignment,
    hierarchy: &Hierarchy,
    flips: &[bool],
    params: &ImputeParams,
) -> Result<GenotypeMatrix> {
    let base_seed = match params.seed {
        Some(seed) => seed,
        None => rand::thread_rng().gen(),
    };

    let columns = clusters
        .medoids()
        .par_iter()
        .map(|&marker| {
            // Per-column sub-stream: results do not depend on scheduling
            let mut rng = rand::rngs::StdRng::seed_from_u64(base_seed.wrapping_add(marker as u64));
            resolve_marker(
                matrix,
                clusters,
                hierarchy,
                flips,
                marker,
                params.min_abs_cor,
                &mut rng,
            )
            .map(|column| (marker, column))
        })
        .collect::<Result<Vec<(usize, Vec<Genotype>)>>>()?;

    let mut imputed = matrix.clone();
    for (marker, column) in columns {
        imputed.set_column(marker, &column);
    }

    tracing::info!("Resolved {} medoid markers.", clusters.medoids().len());

    Ok(imputed)
}

/// Fill every non-medoid marker's missing slots from its cluster's
/// resolved medoid, orientation-corrected. A single-candidate copy pass
/// with no hierarchy ascent.
pub fn propagate_clusters(
    matrix: &mut GenotypeMatrix,
    clusters: &ClusterAssignment,
    flips: &[bool],
) -> Result<()> {
    for marker in 0..matrix.nmarkers() {
        if clusters.is_medoid(marker) || !matrix.has_missing(marker) {
            continue;
        }

        let medoid = clusters.medoid_of(clusters.cluster_of(marker));
        ensure!(
            !matrix.has_missing(medoid),
            Error::UnresolvedMedoid {
                marker: matrix.marker_name(medoid).to_string(),
            }
        );

        let calls: Vec<Genotype> = matrix.column(medoid).to_vec();
        let flip = flips[medoid] != flips[marker];

        let mut column = matrix.column(marker).to_vec();
        for (slot, call) in column.iter_mut().zip(&calls) {
            if slot.is_missing() {
                *slot = match flip {
                    true => call.flipped(),
                    false => *call,
                };
            }
        }
        matrix.set_column(marker, &column);
    }

    Ok(())
}

/// Fail fast before any imputation work: shapes must agree and every
/// medoid needs at least one observed call to anchor its fallback.
fn validate_inputs(
    matrix: &GenotypeMatrix,
    clusters: &ClusterAssignment,
    hierarchy: &Hierarchy,
) -> Result<()> {
    ensure!(
        clusters.nmarkers() == matrix.nmarkers(),
        Error::MarkerCount {
            input: "cluster assignment",
            matrix: matrix.nmarkers(),
            found: clusters.nmarkers(),
        }
    );
    ensure!(
        hierarchy.nmarkers() == matrix.nmarkers(),
        Error::MarkerCount {
            input: "hierarchy",
            matrix: matrix.nmarkers(),
            found: hierarchy.nmarkers(),
        }
    );

    for &medoid in clusters.medoids() {
        if matrix.genotype_counts(medoid).observed() == 0 {
            return Err(Error::NoObservedCalls {
                marker: matrix.marker_name(medoid).to_string(),
            })?;
        }
    }

    Ok(())
}
