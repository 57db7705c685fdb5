use std::path::PathBuf;

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct StandardArgs {
    /// Genotype matrix csv: samples as rows, markers as columns, codes 0/1/2/NA
    pub file: PathBuf,

    /// Marker cluster assignment csv (marker,cluster,medoid)
    #[cfg_attr(feature = "clap", arg(short = 'c', long))]
    pub clusters: PathBuf,

    /// Marker hierarchy file built from the clustering dendrogram (.tree.gz)
    #[cfg_attr(feature = "clap", arg(short = 'H', long))]
    pub hierarchy: PathBuf,

    /// Output directory
    #[cfg_attr(feature = "clap", arg(short = 'o', long="outdir", default_value_os_t = PathBuf::from("./"), value_hint = clap::ValueHint::DirPath))]
    pub output: PathBuf,

    /// Output filename prefix
    #[cfg_attr(feature = "clap", arg(short = 'p', long))]
    pub prefix: Option<String>,
}
