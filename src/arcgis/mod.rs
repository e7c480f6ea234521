//! ArcGIS REST client: session, geometry service and feature layers.

mod client;
mod geometry;
mod layer;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Extent, FeatureQuery, FeatureSet, SpatialReference};

pub use client::{ArcGisClient, PortalInfo};
pub use geometry::GeometryServer;
pub use layer::FeatureLayer;

/// Reprojects geometries between coordinate systems
#[async_trait]
pub trait GeometryService: Send + Sync {
    /// Project `geometries` from `in_sr` to `out_sr`, one-to-one and in order
    async fn project(
        &self,
        geometries: &[Extent],
        in_sr: SpatialReference,
        out_sr: SpatialReference,
    ) -> Result<Vec<Extent>>;
}

/// Something that answers spatial feature queries
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn query(&self, query: &FeatureQuery) -> Result<FeatureSet>;
}
