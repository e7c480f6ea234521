//! Feature layer queries.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::client::endpoint;
use super::{ArcGisClient, FeatureSource};
use crate::error::Result;
use crate::models::{FeatureQuery, FeatureSet};

/// Handle to one layer of a MapServer or FeatureServer
#[derive(Clone)]
pub struct FeatureLayer {
    client: ArcGisClient,
    url: Url,
}

impl FeatureLayer {
    pub fn new(client: ArcGisClient, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl FeatureSource for FeatureLayer {
    async fn query(&self, query: &FeatureQuery) -> Result<FeatureSet> {
        let params = query.to_params()?;
        let url = endpoint(&self.url, &["query"])?;
        let set: FeatureSet = self.client.get_json(url, &params).await?;
        debug!(
            "Layer {} returned {} features",
            self.url().path(),
            set.features.len()
        );
        Ok(set)
    }
}
