//! Features returned by a layer query.

use geo_types::{Coord, LineString, MultiLineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Extent, SpatialReference};

/// Attribute value as it appears in ArcGIS JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Number(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

/// Feature geometry. Only the shapes a road layer can return are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Envelope(Extent),
    Polyline { paths: Vec<Vec<Vec<f64>>> },
    Polygon { rings: Vec<Vec<Vec<f64>>> },
    Point { x: f64, y: f64 },
}

impl Geometry {
    /// Convert to a `geo-types` geometry; z/m values are dropped.
    ///
    /// Polygons take the first ring as exterior and the rest as holes.
    pub fn to_geo(&self) -> Option<geo_types::Geometry<f64>> {
        match self {
            Geometry::Envelope(extent) => Some(extent.rect().into()),
            Geometry::Point { x, y } => Some(Point::new(*x, *y).into()),
            Geometry::Polyline { paths } => {
                let mut lines: Vec<LineString<f64>> =
                    paths.iter().map(Vec::as_slice).map(to_line).collect();
                match lines.len() {
                    0 => None,
                    1 => lines.pop().map(Into::into),
                    _ => Some(MultiLineString::new(lines).into()),
                }
            }
            Geometry::Polygon { rings } => {
                let mut rings = rings.iter().map(Vec::as_slice).map(to_line);
                let exterior = rings.next()?;
                Some(Polygon::new(exterior, rings.collect()).into())
            }
        }
    }
}

fn to_line(path: &[Vec<f64>]) -> LineString<f64> {
    path.iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Display form of attribute `name`, or `default` when absent or null
    pub fn attribute_or(&self, name: &str, default: &str) -> String {
        match self.attribute(name) {
            None | Some(AttributeValue::Null) => default.to_string(),
            Some(value) => value.to_string(),
        }
    }
}

/// Body of a successful layer query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

impl FeatureSet {
    pub fn into_first(self) -> Option<Feature> {
        self.features.into_iter().next()
    }
}
