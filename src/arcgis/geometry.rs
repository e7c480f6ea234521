//! Geometry service: server-side reprojection.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::client::endpoint;
use super::{ArcGisClient, GeometryService};
use crate::error::{Error, Result};
use crate::models::{Extent, SpatialReference};

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    geometries: Vec<Extent>,
}

/// Handle to a `GeometryServer` REST endpoint
#[derive(Clone)]
pub struct GeometryServer {
    client: ArcGisClient,
    url: Url,
}

impl GeometryServer {
    pub fn new(client: ArcGisClient, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Parameters for `project`, extents sent without their own spatial reference
fn project_params(
    geometries: &[Extent],
    in_sr: SpatialReference,
    out_sr: SpatialReference,
) -> Result<Vec<(&'static str, String)>> {
    let bare: Vec<Extent> = geometries
        .iter()
        .map(|e| Extent {
            spatial_reference: None,
            ..*e
        })
        .collect();
    let geometries = json!({
        "geometryType": "esriGeometryEnvelope",
        "geometries": bare,
    });
    Ok(vec![
        ("inSR", in_sr.wkid.to_string()),
        ("outSR", out_sr.wkid.to_string()),
        ("geometries", serde_json::to_string(&geometries)?),
    ])
}

#[async_trait]
impl GeometryService for GeometryServer {
    async fn project(
        &self,
        geometries: &[Extent],
        in_sr: SpatialReference,
        out_sr: SpatialReference,
    ) -> Result<Vec<Extent>> {
        if geometries.is_empty() {
            return Ok(Vec::new());
        }

        let params = project_params(geometries, in_sr, out_sr)?;
        let url = endpoint(&self.url, &["project"])?;
        let response: ProjectResponse = self.client.get_json(url, &params).await?;

        let projected = projected_extents(response, geometries.len(), out_sr)?;
        debug!(
            "Projected {} extents from {} to {} via {}",
            projected.len(),
            in_sr.wkid,
            out_sr.wkid,
            self.url().path()
        );
        Ok(projected)
    }
}

/// Output of `project`, checked one-to-one against the input and stamped with `out_sr`
fn projected_extents(
    response: ProjectResponse,
    expected: usize,
    out_sr: SpatialReference,
) -> Result<Vec<Extent>> {
    if response.geometries.len() != expected {
        return Err(Error::MalformedResponse(format!(
            "project returned {} geometries for {} inputs",
            response.geometries.len(),
            expected
        )));
    }
    Ok(response
        .geometries
        .into_iter()
        .map(|e| e.with_spatial_reference(out_sr))
        .collect())
}
