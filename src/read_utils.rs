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

//! Access to the files of a feed, whether it is a directory or a zip archive.

use crate::{exporter::Configuration, Result};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use tracing::info;

/// Read the export configuration from a JSON file.
///
/// Without a file, the default configuration is used.
pub fn read_config<P: AsRef<Path>>(config_path: Option<P>) -> Result<Configuration> {
    match config_path {
        Some(config_path) => {
            let config_path = config_path.as_ref();
            info!("Reading configuration from {:?}", config_path);
            let json_config_file = File::open(config_path)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            let configuration: Configuration = serde_json::from_reader(json_config_file)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            Ok(configuration)
        }
        None => Ok(Configuration::default()),
    }
}

/// Allows files in a directory or ZipArchive to be read either
pub trait FileHandler
where
    Self: std::marker::Sized,
{
    /// Reader
    type Reader: Read;

    /// Return a file if exist
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)>;

    /// Return a file or an error if not exist
    fn get_file(self, name: &str) -> Result<(Self::Reader, PathBuf)> {
        let (reader, path) = self.get_file_if_exists(name)?;
        Ok((
            reader.ok_or_else(|| anyhow!("file {:?} not found", path))?,
            path,
        ))
    }
}

/// PathFileHandler is used to read files for a directory
pub struct PathFileHandler<P: AsRef<Path>> {
    base_path: P,
}

impl<P: AsRef<Path>> PathFileHandler<P> {
    /// Constructs a new PathFileHandler
    pub fn new(path: P) -> Self {
        PathFileHandler { base_path: path }
    }
}

impl<'a, P: AsRef<Path>> FileHandler for &'a mut PathFileHandler<P> {
    type Reader = File;
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)> {
        let f = self.base_path.as_ref().join(name);
        if f.exists() {
            Ok((
                Some(File::open(&f).with_context(|| format!("Error reading {:?}", &f))?),
                f,
            ))
        } else {
            Ok((None, f))
        }
    }
}

/// ZipHandler is a wrapper around a ZipArchive
/// It provides a way to access the archive's file by their names
///
/// Unlike ZipArchive, it gives access to a file by its name not regarding its path in the ZipArchive
/// It thus cannot be correct if there are 2 files with the same name in the archive,
/// but for transport data if will make it possible to handle a zip with a sub directory
pub struct ZipHandler {
    archive: zip::ZipArchive<File>,
    archive_path: PathBuf,
    index_by_name: BTreeMap<String, usize>,
}

impl ZipHandler {
    /// Opens the archive at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut archive = zip::ZipArchive::new(file)?;
        Ok(ZipHandler {
            index_by_name: Self::files_by_name(&mut archive),
            archive,
            archive_path: path.as_ref().to_path_buf(),
        })
    }

    fn files_by_name(archive: &mut zip::ZipArchive<File>) -> BTreeMap<String, usize> {
        (0..archive.len())
            .filter_map(|i| {
                let file = archive.by_index(i).ok()?;
                // we get the name of the file, not regarding its path in the ZipArchive
                let real_name = Path::new(file.name()).file_name()?;
                let real_name: String = real_name.to_str()?.into();
                Some((real_name, i))
            })
            .collect()
    }
}

impl<'a> FileHandler for &'a mut ZipHandler {
    type Reader = Cursor<Vec<u8>>;
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)> {
        let p = self.archive_path.join(name);
        match self.index_by_name.get(name) {
            None => Ok((None, p)),
            Some(i) => {
                let mut content = Vec::new();
                self.archive
                    .by_index(*i)?
                    .read_to_end(&mut content)
                    .with_context(|| format!("Error reading {:?}", p))?;
                Ok((Some(Cursor::new(content)), p))
            }
        }
    }
}

/// Read a vector of objects from a file_handler
pub fn read_objects<H, O>(file_handler: &mut H, file_name: &str) -> Result<Vec<O>>
where
    for<'a> &'a mut H: FileHandler,
    O: for<'de> serde::Deserialize<'de>,
{
    let (reader, path) = file_handler.get_file(file_name)?;
    info!(file_name = %file_name, "Reading");
    deserialize_objects(reader, &path)
}

/// Read a vector of objects from a file_handler, an absent file giving no object
pub fn read_opt_objects<H, O>(file_handler: &mut H, file_name: &str) -> Result<Vec<O>>
where
    for<'a> &'a mut H: FileHandler,
    O: for<'de> serde::Deserialize<'de>,
{
    let (reader, path) = file_handler.get_file_if_exists(file_name)?;
    match reader {
        None => {
            info!(file_name = %file_name, "Skipping");
            Ok(vec![])
        }
        Some(reader) => {
            info!(file_name = %file_name, "Reading");
            deserialize_objects(reader, &path)
        }
    }
}

fn deserialize_objects<R, O>(reader: R, path: &Path) -> Result<Vec<O>>
where
    R: Read,
    O: for<'de> serde::Deserialize<'de>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize()
        .collect::<StdResult<_, _>>()
        .with_context(|| format!("Error reading {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        word: String,
    }

    #[test]
    fn path_file_handler() {
        test_in_tmp_dir(|path| {
            create_file_with_content(path, "hello.txt", "word\nhello\n");
            let mut file_handler = PathFileHandler::new(path.to_path_buf());

            let greetings: Vec<Greeting> = read_objects(&mut file_handler, "hello.txt").unwrap();
            assert_eq!(
                vec![Greeting {
                    word: "hello".to_string()
                }],
                greetings
            );

            let err = read_objects::<_, Greeting>(&mut file_handler, "world.txt").unwrap_err();
            assert!(err.to_string().contains("not found"));

            let none: Vec<Greeting> = read_opt_objects(&mut file_handler, "world.txt").unwrap();
            assert!(none.is_empty());
        });
    }

    #[test]
    fn zip_file_handler() {
        test_in_tmp_dir(|path| {
            let zip_path = path.join("feed.zip");
            create_zip_with_content(&zip_path, &[("feed/hello.txt", "word\n hello \n")]);
            let mut file_handler = ZipHandler::new(&zip_path).unwrap();

            let greetings: Vec<Greeting> = read_objects(&mut file_handler, "hello.txt").unwrap();
            assert_eq!("hello", greetings[0].word);
        });
    }

    #[test]
    fn default_configuration_without_file() {
        let configuration = read_config(None::<&str>).unwrap();
        assert_eq!(Configuration::default(), configuration);
    }

    #[test]
    fn configuration_from_json() {
        test_in_tmp_dir(|path| {
            create_file_with_content(
                path,
                "config.json",
                r#"{"files_prefix": "ca_le_richelain_citlr_bus_", "reference_date": "20240115"}"#,
            );
            let configuration = read_config(Some(path.join("config.json"))).unwrap();
            assert_eq!("ca_le_richelain_citlr_bus_", configuration.files_prefix);
            assert_eq!(
                Some(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
                configuration.reference_date
            );
            assert!(configuration.filter_useless_services);
        });
    }
}
