// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! The `citlr_bus` crate renders the [GTFS](http://gtfs.org/) feed of the
//! Le Richelain bus agency (CITLR) into normalized MTransit files.
//!
//! The agency specific rules live in [`le_richelain`]; they plug into the
//! generic extension points of [`agency_tools::AgencyTools`], which the
//! [`exporter`] drives record by record.

#![deny(missing_docs)]

pub mod agency_tools;
pub mod clean_utils;
mod error;
pub mod exporter;
pub mod gtfs;
pub mod le_richelain;
pub mod mt;
pub mod objects;
pub mod read_utils;
pub(crate) mod serde_utils;
pub mod service_ids;
pub mod split_utils;
#[doc(hidden)]
pub mod test_utils;

pub use crate::error::{AgencyError, StopIdIssue};

lazy_static::lazy_static! {
    /// Current date, used as default reference date of the service filter
    pub static ref CURRENT_DATE: String = chrono::Local::now().format("%Y%m%d").to_string();
}

/// The corresponding result type used by the crate.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

pub use crate::agency_tools::AgencyTools;
pub use crate::le_richelain::LeRichelainBusAgencyTools;
