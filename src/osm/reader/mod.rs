// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use log::debug;
use road_builder::RoadBuilder;

use crate::osm::Profile;
use crate::MemoryMapData;

mod model;
mod road_builder;
mod xml;

pub use road_builder::{node_road_id, way_road_id};

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file based on its first few bytes.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(b"\x1F\x8B") {
            FileFormat::XmlGz
        } else if header.starts_with(b"BZh") {
            FileFormat::XmlBz2
        } else {
            FileFormat::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as [Roads](crate::Road).
#[derive(Debug)]
pub struct Options<'a> {
    /// How OSM features should be interpreted and converted into [Roads](crate::Road).
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,
}

/// Error which can occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Parse OSM features from a reader into [MemoryMapData] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn load_from_io<R: io::Read>(options: &Options, reader: R) -> Result<MemoryMapData, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => {
            let detected = FileFormat::detect(b.fill_buf()?);
            debug!("detected input format: {:?}", detected);
            detected
        }
        f => f,
    };

    let data = match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let r = xml::Reader::from_io(b, options.profile);
            RoadBuilder::new(options).add_elements(r)?
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d), options.profile);
            RoadBuilder::new(options).add_elements(r)?
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d), options.profile);
            RoadBuilder::new(options).add_elements(r)?
        }
    };
    Ok(data)
}

/// Parse OSM features from a file at the provided path into [MemoryMapData]
/// as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<MemoryMapData, Error> {
    let f = File::open(path)?;
    load_from_io(options, f)
}

/// Parse OSM features from a static buffer into [MemoryMapData] as per the provided [Options].
pub fn load_from_buffer(options: &Options, data: &[u8]) -> Result<MemoryMapData, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let r = xml::Reader::from_buffer(data, options.profile);
        Ok(RoadBuilder::new(options).add_elements(r)?)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        load_from_io(options, io::Cursor::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect() {
        assert_eq!(FileFormat::detect(b"<?xml version"), FileFormat::Xml);
        assert_eq!(FileFormat::detect(b"\x1F\x8B\x08\x00"), FileFormat::XmlGz);
        assert_eq!(FileFormat::detect(b"BZh91AY&SY"), FileFormat::XmlBz2);
        assert_eq!(FileFormat::detect(b""), FileFormat::Xml);
    }
}
