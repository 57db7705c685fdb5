#![allow(
    clippy::too_many_arguments,
    clippy::new_without_default,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc,
    clippy::too_many_lines,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::match_bool,
    clippy::single_match_else,
    clippy::cast_precision_loss,
    clippy::float_cmp,
    clippy::needless_pass_by_value,
    clippy::return_self_not_must_use
)]

// SNPFILL - Genotype imputation toolkit
// Copyright (C) 2025  The SNPFILL authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! SNPFILL - Genotype imputation toolkit
//!
//! Fills missing genotype calls in a SNP-by-sample matrix by propagating
//! observed alleles from correlated neighbor markers. A precomputed
//! hierarchical clustering of the markers is used as the search structure:
//! each cluster medoid is resolved by widening the neighbor pool through
//! successive ancestor groups of the hierarchy, and the remaining markers
//! of a cluster are then filled from their resolved medoid.
//!
//! To print the available commands use:
//! ```bash
//! snpfill --help
//! ```
//! A typical full run:
//! ```bash
//! snpfill impute genotypes.csv -c clusters.csv -H markers.tree.gz -o out/
//! ```

pub mod libs;
pub use libs::{args, error, hierarchy, io, stats, structs};

#[cfg(feature = "clap")]
pub use libs::clap;

/// SNPFILL commands
pub mod subcommands;
