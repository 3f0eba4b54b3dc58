// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::info;
use tileroute;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct MapLoadError(PathBuf, #[source] tileroute::osm::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    Car,
    Bicycle,
    Foot,
}

impl ProfileName {
    fn profile(self) -> &'static tileroute::osm::Profile<'static> {
        match self {
            ProfileName::Car => &tileroute::osm::CAR_PROFILE,
            ProfileName::Bicycle => &tileroute::osm::BICYCLE_PROFILE,
            ProfileName::Foot => &tileroute::osm::FOOT_PROFILE,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Unknown,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for tileroute::osm::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Unknown => tileroute::osm::FileFormat::Unknown,
            Format::Xml => tileroute::osm::FileFormat::Xml,
            Format::XmlGz => tileroute::osm::FileFormat::XmlGz,
            Format::XmlBz2 => tileroute::osm::FileFormat::XmlBz2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// How to interpret the OSM data
    #[arg(short, long, value_enum, default_value_t = ProfileName::Car)]
    profile: ProfileName,

    /// Format of the OSM file
    #[arg(short, long, value_enum, default_value_t = Format::Unknown)]
    format: Format,

    /// Zoom level of the lazily loaded tiles
    #[arg(long, default_value_t = 13)]
    zoom: u32,

    /// Maximum number of segments to visit
    #[arg(long, default_value_t = tileroute::DEFAULT_STEP_LIMIT)]
    step_limit: usize,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();
    let profile = cli.profile.profile();

    let data = load_map_data(&cli.osm_file, profile, cli.format.into())?;
    info!("loaded {} roads", data.len());

    let config = tileroute::RoutingConfig {
        zoom_to_load_tiles: cli.zoom.min(tileroute::MAX_ZOOM),
        step_limit: cli.step_limit,
        ..Default::default()
    };
    let mut ctx = tileroute::RoutingContext::new(&data, profile, config);
    let route = tileroute::find_route(
        &mut ctx,
        tileroute::LatLon::new(cli.start_lat, cli.start_lon),
        tileroute::LatLon::new(cli.end_lat, cli.end_lon),
    )?;

    info!(
        "visited {} segments, loaded {} tiles in {:?}, searched in {:?}",
        route.metrics.visited_segments,
        route.metrics.loaded_tiles,
        route.metrics.load_time,
        route.metrics.search_time,
    );
    if route.is_empty() {
        return Err("no route found".into());
    }

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");

    let mut segments = route.segments.iter().peekable();
    while let Some(segment) = segments.next() {
        println!("    {{");
        println!("      \"type\": \"Feature\",");
        println!("      \"properties\": {{");
        println!("        \"road_id\": {},", segment.road.id);
        println!("        \"distance\": {:.1},", segment.distance);
        println!("        \"time\": {:.1}", segment.time);
        println!("      }},");

        println!("      \"geometry\": {{");
        println!("        \"type\": \"LineString\",");
        println!("        \"coordinates\": [");

        let mut points = segment.points().into_iter().peekable();
        while let Some(point) = points.next() {
            let suffix = if points.peek().is_some() { "," } else { "" };
            let at = point.to_lat_lon();
            println!("          [{}, {}]{}", at.lon, at.lat, suffix);
        }

        println!("        ]");
        println!("      }}");
        let suffix = if segments.peek().is_some() { "," } else { "" };
        println!("    }}{}", suffix);
    }

    println!("  ]");
    println!("}}");

    Ok(())
}

fn load_map_data<P: AsRef<Path>>(
    path: P,
    profile: &tileroute::osm::Profile,
    file_format: tileroute::osm::FileFormat,
) -> Result<tileroute::MemoryMapData, MapLoadError> {
    let options = tileroute::osm::Options {
        profile,
        file_format,
    };
    match tileroute::osm::load_from_file(&options, path.as_ref()) {
        Ok(data) => Ok(data),
        Err(e) => Err(MapLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
