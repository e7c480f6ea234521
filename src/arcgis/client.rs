//! Authenticated handle to an ArcGIS portal and its REST services.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{FeatureLayer, GeometryServer};
use crate::config::{Config, Credential};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("roadowner/", env!("CARGO_PKG_VERSION"));

/// Portal description returned by `sharing/rest/portals/self`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// Shared HTTP client plus credential. Cheap to clone.
#[derive(Clone)]
pub struct ArcGisClient {
    http: Client,
    portal_url: Url,
    geometry_url: Url,
    credential: Credential,
}

impl ArcGisClient {
    pub fn connect(config: &Config, credential: Credential) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let client = Self {
            http,
            portal_url: Url::parse(&config.portal_url)?,
            geometry_url: Url::parse(&config.geometry_service_url)?,
            credential,
        };
        info!("ArcGIS session ready for {}", client.portal_url);
        Ok(client)
    }

    pub fn geometry_service(&self) -> GeometryServer {
        GeometryServer::new(self.clone(), self.geometry_url.clone())
    }

    pub fn feature_layer(&self, url: &str) -> Result<FeatureLayer> {
        Ok(FeatureLayer::new(self.clone(), Url::parse(url)?))
    }

    /// Verify the credential by fetching the portal's own description
    pub async fn check_portal(&self) -> Result<PortalInfo> {
        let url = endpoint(&self.portal_url, &["sharing", "rest", "portals", "self"])?;
        let info: PortalInfo = self.get_json(url, &[]).await?;
        info!(
            "Portal {} accepted credential",
            info.name.as_deref().unwrap_or("(unnamed)")
        );
        Ok(info)
    }

    /// GET `url` with `f=json` and `params`, decoding the JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.request_url(url, params);
        debug!(
            "GET {}{} ({} params)",
            url.origin().ascii_serialization(),
            url.path(),
            params.len()
        );

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        decode_response(&body)
    }

    /// `url` with `f=json`, `params` and, for ArcGIS-hosted endpoints, the token
    pub(crate) fn request_url(&self, mut url: Url, params: &[(&str, String)]) -> Url {
        let with_token = self.sends_token_to(&url);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("f", "json");
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            if with_token {
                pairs.append_pair("token", self.credential.token());
            }
        }
        url
    }

    /// The key belongs to the portal; only the portal and its geometry service see it
    fn sends_token_to(&self, url: &Url) -> bool {
        let host = url.host_str();
        host.is_some()
            && (host == self.portal_url.host_str() || host == self.geometry_url.host_str())
    }
}

/// `base` with `segments` appended to its path
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("{} cannot be a base url", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decode a REST body, surfacing the `{"error": {...}}` envelope as a service error
pub(crate) fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let mut value: serde_json::Value = serde_json::from_str(body)?;
    if let Some(error) = value.get_mut("error").map(serde_json::Value::take) {
        let error: ServiceErrorBody = serde_json::from_value(error)?;
        return Err(Error::Service {
            code: error.code,
            message: error.message,
            details: error.details,
        });
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureSet;

    fn test_client() -> ArcGisClient {
        let credential = Credential::from_value(Some("secret-key".to_string())).unwrap();
        ArcGisClient::connect(&Config::default(), credential).unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_request_url_to_geometry_service() {
        let client = test_client();
        let url = endpoint(client.geometry_service().url(), &["project"]).unwrap();
        let url = client.request_url(url, &[("inSR", "4326".to_string())]);

        assert_eq!(
            pairs(&url),
            vec![
                ("f".to_string(), "json".to_string()),
                ("inSR".to_string(), "4326".to_string()),
                ("token".to_string(), "secret-key".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_url_to_portal_has_token() {
        let client = test_client();
        let url = endpoint(&client.portal_url, &["sharing", "rest", "portals", "self"]).unwrap();
        let url = client.request_url(url, &[]);
        assert!(pairs(&url).iter().any(|(k, v)| k == "token" && v == "secret-key"));
    }

    #[test]
    fn test_request_url_to_foreign_layer_has_no_token() {
        let client = test_client();
        let layer = client.feature_layer(crate::config::DEFAULT_ROADS_URL).unwrap();
        let url = endpoint(layer.url(), &["query"]).unwrap();
        let url = client.request_url(url, &[("where", "1=1".to_string())]);

        let pairs = pairs(&url);
        assert!(pairs.iter().all(|(k, _)| k != "token"));
        assert_eq!(pairs[0], ("f".to_string(), "json".to_string()));
        assert_eq!(url.host_str(), Some("maps.townofcary.org"));
        assert!(url.path().ends_with("/MapServer/19/query"));
    }

    #[test]
    fn test_service_error_envelope() {
        let body = r#"{"error":{"code":498,"message":"Invalid token.","details":["Token expired"]}}"#;
        match decode_response::<FeatureSet>(body) {
            Err(Error::Service {
                code,
                message,
                details,
            }) => {
                assert_eq!(code, 498);
                assert_eq!(message, "Invalid token.");
                assert_eq!(details, vec!["Token expired".to_string()]);
            }
            other => panic!("expected service error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            decode_response::<FeatureSet>("<html>gateway timeout</html>"),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_success_body() {
        let set: FeatureSet = decode_response(r#"{"features":[{"attributes":{}}]}"#).unwrap();
        assert_eq!(set.features.len(), 1);
    }

    #[test]
    fn test_endpoint_join() {
        let base = Url::parse("https://www.arcgis.com").unwrap();
        let url = endpoint(&base, &["sharing", "rest", "portals", "self"]).unwrap();
        assert_eq!(url.as_str(), "https://www.arcgis.com/sharing/rest/portals/self");

        let layer = Url::parse("https://example.com/arcgis/rest/services/Roads/MapServer/19/").unwrap();
        let url = endpoint(&layer, &["query"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/arcgis/rest/services/Roads/MapServer/19/query"
        );
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let config = Config {
            portal_url: "not a url".to_string(),
            ..Config::default()
        };
        let credential = Credential::from_value(Some("key".to_string())).unwrap();
        assert!(matches!(
            ArcGisClient::connect(&config, credential),
            Err(Error::Url(_))
        ));
    }
}
