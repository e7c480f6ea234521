//! Nearest-road lookup and ownership resolution.

use tracing::{debug, info};

use crate::arcgis::{ArcGisClient, FeatureLayer, FeatureSource, GeometryServer, GeometryService};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Extent, Feature, FeatureQuery, SpatialFilter, SpatialReference};

/// Half-size of the search square, in degrees (~10 meters)
pub const SEARCH_DELTA_DEG: f64 = 0.0001;
pub const OWNERSHIP_FIELD: &str = "OWNERSHP";
pub const UNKNOWN_OWNER: &str = "UNKNOWN";

/// Outcome of a road search
#[derive(Debug, Clone, PartialEq)]
pub enum RoadLookup {
    Found(Feature),
    NotFound,
}

/// Finds roads near a point on a roads layer stored in a projected system
pub struct RoadFinder<G, L> {
    geometry: G,
    roads: L,
    roads_sr: SpatialReference,
}

impl RoadFinder<GeometryServer, FeatureLayer> {
    /// Finder over the configured geometry service and roads layer
    pub fn from_config(client: &ArcGisClient, config: &Config) -> Result<Self> {
        Ok(Self::new(
            client.geometry_service(),
            client.feature_layer(&config.roads_url)?,
            SpatialReference::new(config.roads_wkid),
        ))
    }
}

impl<G: GeometryService, L: FeatureSource> RoadFinder<G, L> {
    pub fn new(geometry: G, roads: L, roads_sr: SpatialReference) -> Self {
        Self {
            geometry,
            roads,
            roads_sr,
        }
    }

    /// Intersects query for the search square, already in the layer's system
    pub fn road_query(&self, projected: Extent) -> FeatureQuery {
        FeatureQuery::new(SpatialFilter::intersects(projected, self.roads_sr))
            .out_fields([OWNERSHIP_FIELD])
            .return_geometry(true)
            .record_count(1)
    }

    /// First road whose geometry intersects a small square around (lat, lon)
    pub async fn find_nearby_road(&self, lat: f64, lon: f64) -> Result<RoadLookup> {
        let extent = Extent::around(lon, lat, SEARCH_DELTA_DEG);

        let projected = self
            .geometry
            .project(&[extent], SpatialReference::WGS84, self.roads_sr)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("project returned no geometry".into()))?;
        debug!("Search extent in {}: {:?}", self.roads_sr.wkid, projected);

        let result = self.roads.query(&self.road_query(projected)).await?;
        Ok(match result.into_first() {
            Some(road) => RoadLookup::Found(road),
            None => RoadLookup::NotFound,
        })
    }

    /// Owner of the nearest road, `UNKNOWN` when the road has no ownership value
    pub async fn find_nearby_road_owner(&self, lat: f64, lon: f64) -> Result<String> {
        match self.find_nearby_road(lat, lon).await? {
            RoadLookup::Found(road) => {
                let owner = road.attribute_or(OWNERSHIP_FIELD, UNKNOWN_OWNER);
                info!("Road near ({}, {}) owned by {}", lat, lon, owner);
                Ok(owner)
            }
            RoadLookup::NotFound => Err(Error::NoRoadFound { lat, lon }),
        }
    }
}
