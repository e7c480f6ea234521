//! Service endpoints and credential loading.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable holding the ArcGIS API key
pub const API_KEY_VAR: &str = "ARCGIS_API_KEY";

pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";
pub const DEFAULT_GEOMETRY_SERVICE_URL: &str =
    "https://utility.arcgisonline.com/arcgis/rest/services/Geometry/GeometryServer";
pub const DEFAULT_ROADS_URL: &str =
    "https://maps.townofcary.org/arcgis/rest/services/Transportation/Transportation/MapServer/19";
/// NAD 1983 StatePlane North Carolina (US feet), native system of the roads layer
pub const DEFAULT_ROADS_WKID: u32 = 102719;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub portal_url: String,
    pub geometry_service_url: String,
    pub roads_url: String,
    pub roads_wkid: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            geometry_service_url: DEFAULT_GEOMETRY_SERVICE_URL.to_string(),
            roads_url: DEFAULT_ROADS_URL.to_string(),
            roads_wkid: DEFAULT_ROADS_WKID,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise fall back to the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// API key used to authenticate against the portal and its services
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Read the key from the process environment, after loading any `.env` file
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_value(std::env::var(API_KEY_VAR).ok())
    }

    pub fn from_value(value: Option<String>) -> Result<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(Self(v.trim().to_string())),
            _ => Err(Error::MissingCredential(API_KEY_VAR)),
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_credential() {
        assert!(matches!(
            Credential::from_value(None),
            Err(Error::MissingCredential(API_KEY_VAR))
        ));
        assert!(matches!(
            Credential::from_value(Some("   ".to_string())),
            Err(Error::MissingCredential(_))
        ));
    }

    #[test]
    fn test_credential_is_redacted() {
        let cred = Credential::from_value(Some(" AAPK-secret ".to_string())).unwrap();
        assert_eq!(cred.token(), "AAPK-secret");
        assert_eq!(format!("{:?}", cred), "Credential(***)");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "roads_wkid = 2264").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.roads_wkid, 2264);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.roads_url, DEFAULT_ROADS_URL);
        assert_eq!(config.portal_url, DEFAULT_PORTAL_URL);
    }

    #[test]
    fn test_no_file_is_default() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.roads_wkid, 102719);
    }

    #[test]
    fn test_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "roads_wkid = \"not a number\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(Error::Config(_))
        ));
    }
}
