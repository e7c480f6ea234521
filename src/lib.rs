//! Roadowner - finds the road nearest a point on an ArcGIS roads layer and
//! reports who owns it.
//!
//! This library provides the ArcGIS client, data model and road lookup used by
//! the `road-owner` binary.

pub mod arcgis;
pub mod config;
pub mod error;
pub mod models;
pub mod roads;

pub use error::{Error, Result};
pub use models::{Extent, Feature, SpatialReference};
pub use roads::{RoadFinder, RoadLookup};
