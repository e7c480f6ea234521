//! ArcGIS REST data model: extents, filters, features.

pub mod extent;
pub mod feature;
pub mod query;

pub use extent::{Extent, SpatialReference};
pub use feature::{AttributeValue, Feature, FeatureSet, Geometry};
pub use query::{FeatureQuery, SpatialFilter, SpatialRel};
