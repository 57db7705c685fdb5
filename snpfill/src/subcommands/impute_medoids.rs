use color_eyre::eyre::ensure;
use color_eyre::Result;

use crate::args::StandardArgs;
use crate::error::Error;
use crate::hierarchy::Hierarchy;
use crate::io::{open_csv_writer, push_to_output, read_cluster_assignment, read_genotype_matrix, write_genotype_matrix};
use crate::subcommands::impute::{resolve_medoids, ImputeParams};

#[doc(hidden)]
pub fn run(args: StandardArgs, min_abs_cor: f64, seed: Option<u64>) -> Result<()> {
    let now = std::time::Instant::now();

    let matrix = read_genotype_matrix(&args.file)?;
    let clusters = read_cluster_assignment(&args.clusters, matrix.markers())?;
    let hierarchy = Hierarchy::from_file(&args.hierarchy)?;
    ensure!(
        hierarchy.metadata.markers.as_slice() == matrix.markers(),
        Error::MarkerNames
    );

    let params = ImputeParams { min_abs_cor, seed };
    let resolved = resolve_medoids(&matrix, &clusters, &hierarchy, &params)?;
    tracing::info!(
        "Resolved {} medoid markers in {:?}.",
        clusters.medoids().len(),
        now.elapsed()
    );

    let mut output = args.output.clone();
    push_to_output(&args, &mut output, "imputed_medoids", "csv");
    write_genotype_matrix(&resolved, open_csv_writer(output)?)?;

    Ok(())
}
