// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading [Roads](crate::Road) from [OpenStreetMap](https://www.openstreetmap.org/) data.

mod profile;
mod reader;

pub use profile::{
    Obstacle, Profile, RoadClass, Tags, BICYCLE_PROFILE, CAR_PROFILE, FOOT_PROFILE,
};
pub use reader::{
    load_from_buffer, load_from_file, load_from_io, node_road_id, way_road_id, Error, FileFormat,
    Options,
};
