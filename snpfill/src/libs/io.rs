use std::collections::HashMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use csv::{Reader, ReaderBuilder, Writer, WriterBuilder};
use itertools::Itertools;
use ndarray::Array2;
use serde::Deserialize;

use crate::args::StandardArgs;
use crate::error::Error;
use crate::structs::{ClusterAssignment, Genotype, GenotypeMatrix};

#[allow(clippy::upper_case_acronyms)]
pub enum FileType {
    CSV,
    TSV,
    Tree,
}

impl FileType {
    pub fn from_path(path: &PathBuf) -> Result<Self> {
        let extension: &str = Path::new(&path)
            .extension()
            .and_then(OsStr::to_str)
            .ok_or_else(|| eyre!("No filetype in path"))?;

        let extension = match extension {
            "gz" | "bgz" => return_double_extension_filetype(path, extension)?,
            _ => extension.to_string(),
        };

        Ok(match extension.as_str() {
            "tree.gz" | "tree" => Self::Tree,
            "csv" | "csv.gz" => Self::CSV,
            "tsv" | "tsv.gz" => Self::TSV,
            ext => {
                return Err(Error::FileNotSupported {
                    ext: ext.to_string(),
                })?
            }
        })
    }
}

pub fn return_double_extension_filetype(path: &Path, e1: &str) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| eyre!("file has no stem"))?;
    let e2 = Path::new(&stem)
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| eyre!("file has no other filetype"))?;
    Ok(format!("{e2}.{e1}"))
}

pub fn get_input(filename: Option<PathBuf>) -> Result<Box<dyn io::Read>> {
    let input: Box<dyn io::Read> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdin()),
            Some(name) => {
                let r = match niffler::from_path(name) {
                    Ok(x) => x.0,
                    Err(err) => {
                        let msg = format!("failed to open \"{name}\": {err}");
                        return Err(eyre!(msg))?;
                    }
                };
                Box::new(r)
            }
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdin()),
    };
    Ok(input)
}

pub fn get_output(filename: Option<PathBuf>) -> Result<Box<dyn io::Write>> {
    let output: Box<dyn io::Write> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdout()),
            Some(name) => Box::new(
                match std::fs::File::options()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(name)
                {
                    Ok(x) => x,
                    Err(err) => return Err(eyre!("failed to open \"{name}\": {err}"))?,
                },
            ),
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdout()),
    };
    Ok(output)
}

pub fn get_csv_reader<R: io::Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .from_reader(input)
}

pub fn get_tsv_reader<R: io::Read>(input: R, has_headers: bool) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(false)
        .from_reader(input)
}

pub fn get_csv_writer<W: io::Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_writer(output)
}

pub fn open_csv_writer(name: PathBuf) -> Result<Writer<Box<dyn io::Write>>> {
    Ok(get_csv_writer(get_output(Some(name))?))
}

pub fn push_to_output(args: &StandardArgs, output: &mut PathBuf, name: &str, suffix: &str) {
    match args.prefix.as_deref().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => output.push(format!("{prefix}_{name}.{suffix}")),
        _ => output.push(format!("{name}.{suffix}")),
    }
}

/// Read a genotype matrix csv. The header row names the markers; each
/// following row is a sample name and its genotype codes.
pub fn read_genotype_matrix(path: &PathBuf) -> Result<GenotypeMatrix> {
    let input = get_input(Some(path.clone()))?;
    let mut rdr = get_csv_reader(input);

    let markers: Vec<String> = rdr.headers()?.iter().skip(1).map(String::from).collect();

    let mut samples: Vec<String> = vec![];
    let mut calls: Vec<Genotype> = Vec::new();

    for (row, line) in rdr.records().enumerate() {
        let record = line?;
        if record.len() != markers.len() + 1 {
            return Err(Error::RowLength {
                row: row + 1,
                found: record.len().saturating_sub(1),
                expected: markers.len(),
            })?;
        }

        samples.push(record[0].to_string());

        for (column, field) in record.iter().skip(1).enumerate() {
            let genotype = Genotype::from_field(field).ok_or_else(|| Error::GenotypeParse {
                value: field.to_string(),
                marker: markers[column].clone(),
            })?;
            calls.push(genotype);
        }
    }

    if samples.is_empty() || markers.is_empty() {
        return Err(Error::EmptyFile { path: path.clone() })?;
    }

    let genotypes = Array2::from_shape_vec((samples.len(), markers.len()), calls)?;
    Ok(GenotypeMatrix::new(samples, markers, genotypes)?)
}

pub fn write_genotype_matrix(
    matrix: &GenotypeMatrix,
    mut writer: csv::Writer<Box<dyn io::Write>>,
) -> Result<()> {
    let mut header = vec!["sample"];
    header.extend(matrix.markers().iter().map(String::as_str));
    writer.write_record(header)?;

    for (row, sample) in matrix.samples().iter().enumerate() {
        let mut record = vec![sample.as_str()];
        record.extend(matrix.genotypes.row(row).iter().map(|g| g.to_field()));
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the matrix as a dosage-coded .npy (0/1/2, missing as 255).
pub fn write_genotype_matrix_npy(matrix: &GenotypeMatrix, path: PathBuf) -> Result<()> {
    tracing::info!("Matrix output: {path:?}.");
    ndarray_npy::write_npy(path, &matrix.to_dosage_array())?;
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
struct ClusterRow {
    marker: String,
    cluster: usize,
    medoid: u8,
}

/// Read a cluster assignment csv (columns marker,cluster,medoid) and
/// match it against the matrix marker names. Every marker must be
/// assigned exactly once and every cluster must have one medoid.
pub fn read_cluster_assignment(path: &PathBuf, markers: &[String]) -> Result<ClusterAssignment> {
    let input = get_input(Some(path.clone()))?;
    let mut rdr = match FileType::from_path(path)? {
        FileType::TSV => get_tsv_reader(input, true),
        _ => get_csv_reader(input),
    };

    let mut rows: Vec<ClusterRow> = vec![];
    for line in rdr.records() {
        let record = line?;
        rows.push(record.deserialize(None)?);
    }

    if rows.is_empty() {
        return Err(Error::EmptyFile { path: path.clone() })?;
    }

    if let Some(marker) = rows.iter().map(|row| &row.marker).duplicates().next() {
        return Err(Error::DuplicateMarker {
            marker: marker.clone(),
        })?;
    }

    let index: HashMap<&str, usize> = markers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut cluster_of: Vec<Option<usize>> = vec![None; markers.len()];
    let mut medoid_flags = vec![false; markers.len()];

    for row in &rows {
        let &marker = index.get(row.marker.as_str()).ok_or_else(|| Error::UnknownMarker {
            marker: row.marker.clone(),
        })?;
        cluster_of[marker] = Some(row.cluster);
        medoid_flags[marker] = row.medoid != 0;
    }

    let cluster_of = cluster_of
        .into_iter()
        .enumerate()
        .map(|(marker, cluster)| {
            cluster.ok_or_else(|| Error::ClusterCoverage {
                marker: markers[marker].clone(),
            })
        })
        .collect::<Result<Vec<usize>, Error>>()?;

    Ok(ClusterAssignment::new(cluster_of, medoid_flags)?)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_push_to_output() {
        let mut output = std::path::PathBuf::new();
        let args = StandardArgs::default();
        push_to_output(&args, &mut output, "imputed", "csv");
        assert_eq!(output, std::path::PathBuf::from("imputed.csv"));

        let mut output = std::path::PathBuf::from("./foo");
        let args = StandardArgs {
            prefix: Some("run1".to_string()),
            ..Default::default()
        };
        push_to_output(&args, &mut output, "imputed", "csv");
        assert_eq!(output, std::path::PathBuf::from("./foo/run1_imputed.csv"));
    }

    #[test]
    fn test_filetype() {
        assert!(matches!(FileType::from_path(&PathBuf::from("a/b.csv")), Ok(FileType::CSV)));
        assert!(matches!(FileType::from_path(&PathBuf::from("b.tree.gz")), Ok(FileType::Tree)));
        assert!(matches!(FileType::from_path(&PathBuf::from("b.vcf")), Err(_)));
        assert!(matches!(FileType::from_path(&PathBuf::from("b.ids")), Err(_)));
    }
}
