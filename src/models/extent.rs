//! Extents and spatial references in ArcGIS JSON form.

use geo_types::{coord, Point, Rect};
use serde::{Deserialize, Serialize};

/// Coordinate system identified by its well-known ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
    #[serde(rename = "latestWkid", default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// WGS84 geographic coordinates (degrees)
    pub const WGS84: SpatialReference = SpatialReference::new(4326);

    pub const fn new(wkid: u32) -> Self {
        Self {
            wkid,
            latest_wkid: None,
        }
    }
}

/// Axis-aligned rectangle in some coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(
        rename = "spatialReference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spatial_reference: Option<SpatialReference>,
}

impl Extent {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            spatial_reference: None,
        }
    }

    /// Square WGS84 extent of half-size `delta_deg` centered on (lon, lat).
    ///
    /// A negative delta is treated as its magnitude so the extent stays
    /// well-formed (`xmin <= xmax`, `ymin <= ymax`).
    pub fn around(lon: f64, lat: f64, delta_deg: f64) -> Self {
        let d = delta_deg.abs();
        Self::new(lon - d, lat - d, lon + d, lat + d)
            .with_spatial_reference(SpatialReference::WGS84)
    }

    pub fn with_spatial_reference(mut self, sr: SpatialReference) -> Self {
        self.spatial_reference = Some(sr);
        self
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> Point<f64> {
        self.rect().center().into()
    }

    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.xmin, y: self.ymin },
            coord! { x: self.xmax, y: self.ymax },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_around_is_centered() {
        let points = [
            (-78.776689, 35.791766),
            (0.0, 0.0),
            (179.9999, -89.9999),
            (-0.00005, 0.00005),
        ];
        for (lon, lat) in points {
            let extent = Extent::around(lon, lat, 0.0001);
            assert!((extent.width() - 0.0002).abs() < EPS);
            assert!((extent.height() - 0.0002).abs() < EPS);

            let center = extent.center();
            assert!((center.x() - lon).abs() < EPS);
            assert!((center.y() - lat).abs() < EPS);
            assert_eq!(extent.spatial_reference, Some(SpatialReference::WGS84));
        }
    }

    #[test]
    fn test_around_negative_delta() {
        let extent = Extent::around(10.0, 20.0, -0.5);
        assert!(extent.xmin <= extent.xmax);
        assert!(extent.ymin <= extent.ymax);
        assert_eq!(extent.width(), 1.0);
    }

    #[test]
    fn test_extent_json() {
        let extent = Extent::new(1.0, 2.0, 3.0, 4.0).with_spatial_reference(SpatialReference::new(102719));
        let json = serde_json::to_value(extent).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "xmin": 1.0, "ymin": 2.0, "xmax": 3.0, "ymax": 4.0,
                "spatialReference": { "wkid": 102719 }
            })
        );

        let bare: Extent =
            serde_json::from_str(r#"{"xmin":1,"ymin":2,"xmax":3,"ymax":4}"#).unwrap();
        assert_eq!(bare.spatial_reference, None);
    }
}
