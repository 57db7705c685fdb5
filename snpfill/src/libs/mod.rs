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

#[doc(hidden)]
pub mod args;

#[doc(hidden)]
pub mod error;

/// The marker hierarchy consumed as the neighbor-search structure
pub mod hierarchy;

#[doc(hidden)]
pub mod io;

/// Per-marker genotype statistics and the allele-orientation model
pub mod stats;

/// SNPFILL structs
pub mod structs;

#[cfg(feature = "clap")]
pub mod clap;
