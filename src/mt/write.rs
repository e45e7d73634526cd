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

use super::MSpec;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

fn write_objects<'a, T, I>(path: &Path, file: &str, objects: I) -> Result<()>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    info!(file_name = %file, "Writing");
    let path = path.join(file);
    let mut wtr =
        csv::Writer::from_path(&path).with_context(|| format!("Error writing {:?}", path))?;
    for object in objects {
        wtr.serialize(object)
            .with_context(|| format!("Error serializing {:?}", path))?;
    }
    wtr.flush()
        .with_context(|| format!("Error writing {:?}", path))?;
    Ok(())
}

/// Write the MTransit files into `path`, every file name starting with `files_prefix`.
///
/// Nothing is written when the agency is absent.
pub fn write<P: AsRef<Path>>(spec: &MSpec, path: P, files_prefix: &str) -> Result<()> {
    let path = path.as_ref();
    let agency = match &spec.agency {
        Some(agency) => agency,
        None => {
            info!("Nothing to write");
            return Ok(());
        }
    };
    fs::create_dir_all(path).with_context(|| format!("Error creating {:?}", path))?;
    let file_name = |name: &str| format!("{}{}", files_prefix, name);
    write_objects(path, &file_name("agency.txt"), std::iter::once(agency))?;
    write_objects(path, &file_name("routes.txt"), &spec.routes)?;
    write_objects(path, &file_name("trips.txt"), &spec.trips)?;
    write_objects(path, &file_name("stops.txt"), &spec.stops)?;
    write_objects(path, &file_name("trip_stops.txt"), &spec.trip_stops)?;
    write_objects(path, &file_name("service_dates.txt"), &spec.service_dates)?;
    Ok(())
}
