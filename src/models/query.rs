//! Spatial filters and layer query parameters.

use super::{Extent, SpatialReference};
use crate::error::Result;

/// Spatial relationship used to match features against the filter geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialRel {
    Intersects,
}

impl SpatialRel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpatialRel::Intersects => "esriSpatialRelIntersects",
        }
    }
}

/// Geometry + relationship + coordinate system for a layer query
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    pub geometry: Extent,
    pub spatial_rel: SpatialRel,
    pub sr: SpatialReference,
}

impl SpatialFilter {
    pub fn intersects(geometry: Extent, sr: SpatialReference) -> Self {
        Self {
            geometry,
            spatial_rel: SpatialRel::Intersects,
            sr,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    pub filter: SpatialFilter,
    pub where_clause: String,
    pub out_fields: Vec<String>,
    pub return_geometry: bool,
    pub result_record_count: Option<u32>,
}

impl FeatureQuery {
    pub fn new(filter: SpatialFilter) -> Self {
        Self {
            filter,
            where_clause: "1=1".to_string(),
            out_fields: vec!["*".to_string()],
            return_geometry: true,
            result_record_count: None,
        }
    }

    pub fn out_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn return_geometry(mut self, yes: bool) -> Self {
        self.return_geometry = yes;
        self
    }

    pub fn record_count(mut self, count: u32) -> Self {
        self.result_record_count = Some(count);
        self
    }

    /// Query-string parameters for `<layer>/query`, without `f` and `token`
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>> {
        let geometry = Extent {
            spatial_reference: None,
            ..self.filter.geometry
        };
        let mut params = vec![
            ("where", self.where_clause.clone()),
            ("geometry", serde_json::to_string(&geometry)?),
            ("geometryType", "esriGeometryEnvelope".to_string()),
            ("inSR", self.filter.sr.wkid.to_string()),
            ("spatialRel", self.filter.spatial_rel.as_str().to_string()),
            ("outFields", self.out_fields.join(",")),
            ("returnGeometry", self.return_geometry.to_string()),
        ];
        if let Some(count) = self.result_record_count {
            params.push(("resultRecordCount", count.to_string()));
        }
        Ok(params)
    }
}
